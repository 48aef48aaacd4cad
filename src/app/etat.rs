//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : posséder la session du noyau, l’historique et la précision partagée,
//! et offrir des actions simples aux boutons / au clavier.
//!
//! Contrats :
//! - Aucune évaluation ici : tout passe par `Session` (garde, aperçu, "=").
//! - L’aperçu arrive d’un autre thread : l’abonnement ne fait que `request_repaint`.

use std::io;
use std::sync::Arc;

use tracing::debug;

use crate::noyau::{
    Enregistrement, HistoriqueMemoire, PrecisionPartagee, Session, SourcePrecision, Touche,
    Validation,
};
use crate::reglages::Reglages;

pub struct AppCalc {
    pub(super) session: Session,
    pub(super) historique: HistoriqueMemoire,
    pub(super) precision: PrecisionPartagee,
}

impl AppCalc {
    pub fn new(cc: &eframe::CreationContext<'_>, reglages: &Reglages) -> io::Result<Self> {
        let precision = PrecisionPartagee::new(reglages.precision);
        let historique = HistoriqueMemoire::new();

        let session = Session::nouvelle(
            Arc::new(precision.clone()),
            Arc::new(historique.clone()),
        )?;

        let ctx = cc.egui_ctx.clone();
        session.abonner(move |_| ctx.request_repaint());

        Ok(Self {
            session,
            historique,
            precision,
        })
    }

    /* ------------------------ Actions ------------------------ */

    pub fn toucher(&mut self, touche: Touche) {
        self.session.appliquer_touche(touche);
    }

    pub fn retour(&mut self) {
        self.session.retour();
    }

    /// C : tampon + aperçu vidés.
    pub fn effacer(&mut self) {
        self.session.effacer();
    }

    pub fn valider(&mut self) {
        match self.session.valider() {
            Validation::Reussie {
                expression,
                resultat,
            } => debug!(%expression, %resultat, "résultat affiché"),
            Validation::Echec(e) => debug!(erreur = %e, "\"=\" en échec"),
            Validation::Ignoree => {}
        }
    }

    /* ------------------------ Précision ------------------------ */

    pub fn precision(&self) -> u8 {
        self.precision.precision()
    }

    /// Prise en compte à la prochaine publication d’aperçu (ou au prochain "=").
    pub fn regler_precision(&mut self, precision: u8) {
        self.precision.regler(precision);
    }

    /* ------------------------ Historique ------------------------ */

    pub fn historique(&self) -> Vec<Enregistrement> {
        self.historique.lister()
    }

    pub fn charger(&mut self, enregistrement: &Enregistrement) {
        if !self.session.charger_expression(&enregistrement.expression) {
            debug!(id = enregistrement.id, "enregistrement non rechargeable");
        }
    }

    pub fn supprimer(&mut self, id: u64) {
        self.historique.supprimer(id);
    }

    pub fn vider_historique(&mut self) {
        self.historique.vider();
    }
}
