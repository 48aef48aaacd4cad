// src/app.rs
//
// Calculatrice — module App (racine)
// ----------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs: use crate::app::AppCalc;)
// - Fournir l’impl eframe::App + le clavier physique
//
// Clavier :
// - caractères tapés -> touches (via Touche::depuis_caractere, donc via la garde)
// - Enter ou '=' valide, Backspace efface un caractère, Escape = C
// - rien n’est intercepté quand un widget (ex: DragValue) veut le clavier

pub mod etat;
pub mod vue;

// Ré-export pratique : `use crate::app::AppCalc;`
pub use etat::AppCalc;

use eframe::egui;

use crate::noyau::Touche;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !ctx.wants_keyboard_input() {
            self.clavier(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui); // méthode publique (dans vue.rs)
        });
    }
}

impl AppCalc {
    fn clavier(&mut self, ctx: &egui::Context) {
        let evenements = ctx.input(|i| i.events.clone());

        for ev in evenements {
            match ev {
                egui::Event::Text(texte) => {
                    for c in texte.chars() {
                        if c == '=' {
                            self.valider();
                        } else if let Some(touche) = Touche::depuis_caractere(c) {
                            self.toucher(touche);
                        }
                    }
                }
                egui::Event::Key {
                    key, pressed: true, ..
                } => match key {
                    egui::Key::Enter => self.valider(),
                    egui::Key::Backspace => self.retour(),
                    egui::Key::Escape => self.effacer(),
                    _ => {}
                },
                _ => {}
            }
        }
    }
}
