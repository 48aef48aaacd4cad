// src/noyau/precision.rs
//
// Source de précision : lue à CHAQUE formatage (abonnement vivant, pas une lecture unique).

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Précision par défaut (décimales affichées).
pub const PRECISION_DEFAUT: u8 = 6;

/// Garde-fou : on borne la précision.
pub const PRECISION_MAX: u8 = 16;

/// Fournisseur de précision (réglages), non possédé par le noyau.
pub trait SourcePrecision: Send + Sync {
    fn precision(&self) -> u8;
}

/// Précision partagée entre l’hôte (réglage) et le travailleur d’aperçu.
#[derive(Clone, Debug)]
pub struct PrecisionPartagee(Arc<AtomicU8>);

impl PrecisionPartagee {
    pub fn new(precision: u8) -> Self {
        Self(Arc::new(AtomicU8::new(precision.min(PRECISION_MAX))))
    }

    /// Borne dans [0, 16].
    pub fn regler(&self, precision: u8) {
        self.0.store(precision.min(PRECISION_MAX), Ordering::Relaxed);
    }
}

impl Default for PrecisionPartagee {
    fn default() -> Self {
        Self::new(PRECISION_DEFAUT)
    }
}

impl SourcePrecision for PrecisionPartagee {
    fn precision(&self) -> u8 {
        self.0.load(Ordering::Relaxed).min(PRECISION_MAX)
    }
}
