//! Noyau de la calculatrice (saisie + évaluation + aperçu)
//!
//! Organisation interne :
//! - erreur.rs      : taxonomie (division par zéro / malformée / dépassement)
//! - jetons.rs      : tokenisation
//! - format.rs      : littéraux décimaux exacts + arrondi HALF-UP à la précision
//! - calcul.rs      : √ et ^ sur rationnels, plafond de magnitude
//! - rpn.rs         : shunting-yard à deux piles -> valeur exacte
//! - eval.rs        : pipeline complet
//! - garde.rs       : garde de saisie (touche -> tampon)
//! - precision.rs   : source de précision (réglages)
//! - historique.rs  : puits d’historique
//! - apercu.rs      : aperçu vivant (travailleur, dernière édition gagne)
//! - session.rs     : tampon + aperçu + "="

pub mod apercu;
pub mod calcul;
pub mod erreur;
pub mod eval;
pub mod format;
pub mod garde;
pub mod historique;
pub mod jetons;
pub mod precision;
pub mod rpn;
pub mod session;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use garde::Touche;
pub use historique::{Enregistrement, HistoriqueMemoire};
pub use jetons::OpBinaire;
pub use precision::{PrecisionPartagee, SourcePrecision, PRECISION_DEFAUT, PRECISION_MAX};
pub use session::{Session, Validation};
