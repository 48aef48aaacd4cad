//! src/noyau/apercu.rs
//!
//! Aperçu vivant : recalcul hors du chemin de saisie, « la dernière édition gagne ».
//!
//! Modèle :
//! - chaque recalcul est une tâche étiquetée (génération, instantané du tampon) ;
//! - un seul travailleur en arrière-plan, nourri par une file `flume` ;
//! - publication sous verrou, SEULEMENT si la génération est encore la plus récente
//!   (sinon le résultat est jeté, jamais fusionné) ;
//! - tampon vide / incomplet : aperçu vide publié tout de suite, sans évaluer.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, trace, warn};

use super::eval::calculer;
use super::garde::est_incomplete;
use super::precision::SourcePrecision;

/// Aperçu affiché pour toute issue en erreur.
pub const APERCU_ERREUR: &str = "Error";

type Abonne = Box<dyn Fn(&str) + Send + Sync>;

/// Recalcul étiqueté par l’instantané du tampon à l’émission.
struct Tache {
    generation: u64,
    instantane: String,
}

#[derive(Default)]
struct Publication {
    generation: u64,
    texte: String,
}

#[derive(Default)]
struct Partage {
    generation: AtomicU64,
    publication: Mutex<Publication>,
    abonnes: Mutex<Vec<Abonne>>,
}

impl Partage {
    fn courante(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Nouvelle génération : toute tâche plus ancienne devient périmée.
    fn reserver(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publie `texte` si `generation` est toujours la plus récente.
    /// Les abonnés sont notifiés sous le verrou (ordre de publication préservé).
    fn publier(&self, generation: u64, texte: String) -> bool {
        let Ok(mut p) = self.publication.lock() else {
            warn!("aperçu verrouillé (empoisonné)");
            return false;
        };

        if generation != self.courante() || generation < p.generation {
            trace!(generation, courante = self.courante(), "aperçu périmé jeté");
            return false;
        }

        p.generation = generation;
        p.texte = texte;

        if let Ok(abonnes) = self.abonnes.lock() {
            for abonne in abonnes.iter() {
                abonne(&p.texte);
            }
        }
        true
    }

    fn texte(&self) -> String {
        self.publication
            .lock()
            .map(|p| p.texte.clone())
            .unwrap_or_default()
    }
}

/// Planificateur des recalculs d’aperçu (un par session).
pub struct PlanificateurApercu {
    partage: Arc<Partage>,
    envoi: Option<flume::Sender<Tache>>,
    travailleur: Option<JoinHandle<()>>,
}

impl PlanificateurApercu {
    /// Démarre le travailleur. La précision est relue à chaque recalcul.
    pub fn demarrer(precision: Arc<dyn SourcePrecision>) -> io::Result<Self> {
        let partage = Arc::new(Partage::default());
        let (envoi, reception) = flume::unbounded::<Tache>();

        let p = Arc::clone(&partage);
        let travailleur = thread::Builder::new()
            .name("apercu".to_string())
            .spawn(move || boucle(reception, p, precision))?;

        Ok(Self {
            partage,
            envoi: Some(envoi),
            travailleur: Some(travailleur),
        })
    }

    /// Programme un recalcul pour l’instantané donné (appelé à chaque mutation acceptée).
    pub fn planifier(&self, instantane: &str) {
        let generation = self.partage.reserver();

        if est_incomplete(instantane) {
            self.partage.publier(generation, String::new());
            return;
        }

        let tache = Tache {
            generation,
            instantane: instantane.to_string(),
        };
        let envoye = self
            .envoi
            .as_ref()
            .is_some_and(|envoi| envoi.send(tache).is_ok());
        if !envoye {
            warn!(generation, "travailleur d’aperçu indisponible");
        }
    }

    /// Publie directement `texte` (effacement, échec de "=") et périme toute tâche en vol.
    pub fn imposer(&self, texte: &str) {
        let generation = self.partage.reserver();
        self.partage.publier(generation, texte.to_string());
    }

    pub fn apercu(&self) -> String {
        self.partage.texte()
    }

    /// Abonnement : `f` reçoit chaque aperçu publié, dans l’ordre.
    /// `f` est appelée sous le verrou de publication : elle ne doit pas relire l’aperçu.
    pub fn abonner(&self, f: impl Fn(&str) + Send + Sync + 'static) {
        match self.partage.abonnes.lock() {
            Ok(mut abonnes) => abonnes.push(Box::new(f)),
            Err(_) => warn!("abonnés verrouillés (empoisonné) : abonnement ignoré"),
        }
    }
}

impl Drop for PlanificateurApercu {
    fn drop(&mut self) {
        // fermer la file => le travailleur sort de sa boucle
        self.envoi.take();
        if let Some(t) = self.travailleur.take() {
            if t.join().is_err() {
                warn!("travailleur d’aperçu terminé en panique");
            }
        }
    }
}

fn boucle(
    reception: flume::Receiver<Tache>,
    partage: Arc<Partage>,
    precision: Arc<dyn SourcePrecision>,
) {
    debug!("travailleur d’aperçu démarré");

    while let Ok(mut tache) = reception.recv() {
        // seules les tâches les plus récentes comptent
        for plus_recente in reception.try_iter() {
            tache = plus_recente;
        }
        if tache.generation != partage.courante() {
            trace!(generation = tache.generation, "tâche périmée avant calcul");
            continue;
        }

        let texte = match calculer(&tache.instantane, precision.precision()) {
            Ok(s) => s,
            Err(e) => {
                debug!(expression = %tache.instantane, erreur = %e, "aperçu en erreur");
                APERCU_ERREUR.to_string()
            }
        };
        partage.publier(tache.generation, texte);
    }

    debug!("travailleur d’aperçu arrêté");
}
