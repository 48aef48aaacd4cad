// src/noyau/historique.rs
//
// Puits d’historique : le noyau n’appelle QUE `inserer` (tir-et-oublie), sur succès de "=".
// `HistoriqueMemoire` sert l’hôte egui et les tests (pas de persistance).

use std::sync::{Arc, Mutex};

use tracing::warn;

/// Reçoit les couples (expression, résultat) validés.
/// Un échec de stockage est l’affaire du puits, jamais du noyau.
pub trait PuitsHistorique: Send + Sync {
    fn inserer(&self, expression: &str, resultat: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enregistrement {
    pub id: u64,
    pub expression: String,
    pub resultat: String,
    pub note: String,
}

#[derive(Default, Debug)]
struct Registre {
    prochain_id: u64,
    enregistrements: Vec<Enregistrement>,
}

/// Historique en mémoire (clonable, partagé).
#[derive(Clone, Default, Debug)]
pub struct HistoriqueMemoire {
    registre: Arc<Mutex<Registre>>,
}

impl HistoriqueMemoire {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tous les enregistrements, le plus récent d’abord.
    pub fn lister(&self) -> Vec<Enregistrement> {
        match self.registre.lock() {
            Ok(r) => r.enregistrements.iter().rev().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn supprimer(&self, id: u64) {
        if let Ok(mut r) = self.registre.lock() {
            r.enregistrements.retain(|e| e.id != id);
        }
    }

    pub fn vider(&self) {
        if let Ok(mut r) = self.registre.lock() {
            r.enregistrements.clear();
        }
    }
}

impl PuitsHistorique for HistoriqueMemoire {
    fn inserer(&self, expression: &str, resultat: &str) {
        let Ok(mut r) = self.registre.lock() else {
            warn!("historique verrouillé (empoisonné) : enregistrement perdu");
            return;
        };
        r.prochain_id += 1;
        let id = r.prochain_id;
        r.enregistrements.push(Enregistrement {
            id,
            expression: expression.to_string(),
            resultat: resultat.to_string(),
            note: String::new(),
        });
    }
}
