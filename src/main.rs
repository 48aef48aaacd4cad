// src/main.rs
//
// Calculatrice à aperçu — point d’entrée NATIF
// --------------------------------------------
// But:
// - journalisation (RUST_LOG) avant tout
// - réglages (reglages.toml + CALCULATRICE_PRECISION)
// - eframe::run_native + NativeOptions
//
// Pas de cible web : l’aperçu tourne sur un thread natif.

use eframe::egui;
use tracing_subscriber::EnvFilter;

mod app;
mod noyau;
mod reglages;

use app::AppCalc;
use reglages::Reglages;

/// Titre unique (fenêtre + app_id).
const TITRE_APP: &str = "Calculatrice";

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let reglages = Reglages::charger();
    tracing::info!(precision = reglages.precision, "démarrage");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([360.0, 560.0])
            .with_min_inner_size([300.0, 460.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(move |cc| {
            // session (et son travailleur) démarrée avec le contexte egui prêt
            let app = AppCalc::new(cc, &reglages)?;
            Ok(Box::new(app))
        }),
    )
}
