// src/noyau/erreur.rs
//
// Taxonomie des issues d’évaluation.
// Ce sont des issues NORMALES (jamais de panique sur une saisie utilisateur).

use num_rational::BigRational;
use thiserror::Error;

/// Échec d’une évaluation (division par zéro, expression malformée, dépassement).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurEval {
    /// Diviseur exactement nul (ou 0 élevé à une puissance négative).
    #[error("division par zéro")]
    DivisionParZero,

    /// Pile vide, jeton inconnu, littéral sans chiffre, √ d’un négatif, parenthèses…
    #[error("expression malformée: {0}")]
    ExpressionMalformee(String),

    /// |valeur| ≥ 10^1000 (plafond du noyau).
    #[error("dépassement de capacité")]
    Depassement,
}

impl ErreurEval {
    pub fn malformee(raison: impl Into<String>) -> Self {
        Self::ExpressionMalformee(raison.into())
    }
}

/// Issue d’une tentative d’évaluation : valeur exacte ou erreur.
pub type Issue = Result<BigRational, ErreurEval>;
