//! src/noyau/session.rs
//!
//! Session de calcul (une par écran de calculatrice).
//!
//! Rôle : posséder le tampon, le faire muter UNIQUEMENT via la garde,
//! déclencher l’aperçu, et valider ("=") avec écriture dans l’historique.
//!
//! Contrats :
//! - La saisie ne fait jamais d’arithmétique (l’aperçu tourne en arrière-plan).
//! - "=" est synchrone : succès => historique + tampon remplacé par le résultat ;
//!   échec => tampon intact, aperçu "Error", rien dans l’historique.

use std::io;
use std::sync::Arc;

use tracing::{debug, info, trace};

use super::apercu::{PlanificateurApercu, APERCU_ERREUR};
use super::erreur::ErreurEval;
use super::eval::calculer;
use super::garde::{self, est_incomplete, Touche};
use super::historique::PuitsHistorique;
use super::precision::SourcePrecision;

/// Issue de "=".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validation {
    /// Tampon vide ou incomplet : rien n’a été fait.
    Ignoree,
    Reussie {
        expression: String,
        resultat: String,
    },
    Echec(ErreurEval),
}

pub struct Session {
    tampon: String,
    precision: Arc<dyn SourcePrecision>,
    historique: Arc<dyn PuitsHistorique>,
    apercu: PlanificateurApercu,
}

impl Session {
    pub fn nouvelle(
        precision: Arc<dyn SourcePrecision>,
        historique: Arc<dyn PuitsHistorique>,
    ) -> io::Result<Self> {
        let apercu = PlanificateurApercu::demarrer(Arc::clone(&precision))?;
        Ok(Self {
            tampon: String::new(),
            precision,
            historique,
            apercu,
        })
    }

    /* ------------------------ Saisie ------------------------ */

    /// Applique une touche. Retourne false si la garde l’a refusée (no-op silencieux).
    pub fn appliquer_touche(&mut self, touche: Touche) -> bool {
        match touche {
            Touche::Effacer => {
                self.effacer();
                true
            }
            _ => self.muter(touche),
        }
    }

    /// ⌫ : retire le dernier caractère (no-op si vide).
    pub fn retour(&mut self) -> bool {
        self.muter(Touche::Retour)
    }

    /// C : tampon et aperçu vidés, tâches en vol périmées.
    pub fn effacer(&mut self) {
        self.tampon.clear();
        self.apercu.imposer("");
    }

    fn muter(&mut self, touche: Touche) -> bool {
        match garde::appliquer(&self.tampon, touche) {
            Some(nouveau) => {
                self.tampon = nouveau;
                self.apercu.planifier(&self.tampon);
                true
            }
            None => {
                trace!(?touche, tampon = %self.tampon, "touche refusée");
                false
            }
        }
    }

    /// Recharge une expression passée (depuis l’historique) et relance l’aperçu.
    /// Refusée (false, tampon intact) si elle viole les invariants de la garde.
    pub fn charger_expression(&mut self, expression: &str) -> bool {
        if !garde::respecte_invariants(expression) {
            debug!(%expression, "expression chargée refusée");
            return false;
        }
        self.tampon = expression.to_string();
        self.apercu.planifier(&self.tampon);
        true
    }

    /* ------------------------ "=" ------------------------ */

    pub fn valider(&mut self) -> Validation {
        if est_incomplete(&self.tampon) {
            return Validation::Ignoree;
        }

        match calculer(&self.tampon, self.precision.precision()) {
            Ok(resultat) => {
                let expression = std::mem::replace(&mut self.tampon, resultat.clone());
                self.historique.inserer(&expression, &resultat);
                self.apercu.imposer("");
                info!(%expression, %resultat, "calcul validé");
                Validation::Reussie {
                    expression,
                    resultat,
                }
            }
            Err(e) => {
                debug!(expression = %self.tampon, erreur = %e, "validation refusée");
                self.apercu.imposer(APERCU_ERREUR);
                Validation::Echec(e)
            }
        }
    }

    /* ------------------------ Lecture ------------------------ */

    pub fn expression(&self) -> &str {
        &self.tampon
    }

    pub fn apercu(&self) -> String {
        self.apercu.apercu()
    }

    /// Voir `PlanificateurApercu::abonner`.
    pub fn abonner(&self, f: impl Fn(&str) + Send + Sync + 'static) {
        self.apercu.abonner(f);
    }
}
