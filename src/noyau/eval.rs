//! Noyau — évaluation (pipeline réel)
//!
//! tokenize -> shunting-yard (deux piles) -> valeur exacte -> format (HALF-UP, précision)
//!
//! Le test d’incomplétude (opérateur final, √ non appliquée, parenthèse ouverte)
//! est fait par l’appelant : voir `garde::est_incomplete`.

use tracing::debug;

use super::erreur::{ErreurEval, Issue};
use super::format::format_resultat;
use super::jetons::{format_jetons, tokenize};
use super::rpn::evaluate;

/// Évalue une expression en valeur exacte (non arrondie).
pub fn evaluer_expression(expr_str: &str) -> Issue {
    let jetons = tokenize(expr_str)?;
    debug!(jetons = %format_jetons(&jetons), "jetons");

    let issue = evaluate(&jetons);
    if let Err(e) = &issue {
        debug!(expression = expr_str, erreur = %e, "évaluation en échec");
    }
    issue
}

/// API publique : évalue puis formate à `precision` décimales.
pub fn calculer(expr_str: &str, precision: u8) -> Result<String, ErreurEval> {
    let valeur = evaluer_expression(expr_str)?;
    Ok(format_resultat(&valeur, precision))
}
