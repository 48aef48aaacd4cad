// src/app/vue.rs
//
// Vue (UI egui)
// -------------
// Objectifs :
// - Écran : expression (tampon) + aperçu ("0" si vide)
// - Pavé : % ^ √ ÷ / 7 8 9 × / 4 5 6 − / 1 2 3 + / 0 . C = , puis ( ) ⌫
// - Précision (0..=16) liée à la source vivante
// - Historique repliable : recharger / supprimer / tout effacer
//
// Note :
// - la vue ne mute jamais le tampon elle-même : chaque bouton devient une Touche

use eframe::egui;

use super::etat::AppCalc;
use crate::noyau::{OpBinaire, Touche, PRECISION_MAX};

#[derive(Clone, Copy, Debug)]
enum Bouton {
    Touche(Touche),
    Effacer,
    Retour,
    Valider,
}

const PAVE: [[(&str, Bouton); 4]; 5] = [
    [
        ("%", Bouton::Touche(Touche::Pourcent)),
        ("^", Bouton::Touche(Touche::Operateur(OpBinaire::Puissance))),
        ("√", Bouton::Touche(Touche::Racine)),
        ("÷", Bouton::Touche(Touche::Operateur(OpBinaire::Divise))),
    ],
    [
        ("7", Bouton::Touche(Touche::Chiffre(7))),
        ("8", Bouton::Touche(Touche::Chiffre(8))),
        ("9", Bouton::Touche(Touche::Chiffre(9))),
        ("×", Bouton::Touche(Touche::Operateur(OpBinaire::Fois))),
    ],
    [
        ("4", Bouton::Touche(Touche::Chiffre(4))),
        ("5", Bouton::Touche(Touche::Chiffre(5))),
        ("6", Bouton::Touche(Touche::Chiffre(6))),
        ("−", Bouton::Touche(Touche::Operateur(OpBinaire::Moins))),
    ],
    [
        ("1", Bouton::Touche(Touche::Chiffre(1))),
        ("2", Bouton::Touche(Touche::Chiffre(2))),
        ("3", Bouton::Touche(Touche::Chiffre(3))),
        ("+", Bouton::Touche(Touche::Operateur(OpBinaire::Plus))),
    ],
    [
        ("0", Bouton::Touche(Touche::Chiffre(0))),
        (".", Bouton::Touche(Touche::Point)),
        ("C", Bouton::Effacer),
        ("=", Bouton::Valider),
    ],
];

const EXTRA: [(&str, Bouton); 3] = [
    ("(", Bouton::Touche(Touche::ParenOuvrante)),
    (")", Bouton::Touche(Touche::ParenFermante)),
    ("⌫", Bouton::Retour),
];

const TAILLE_TOUCHE: [f32; 2] = [64.0, 44.0];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.ui_ecran(ui);

                ui.add_space(8.0);
                self.ui_pave(ui);

                ui.add_space(8.0);
                ui.separator();
                self.ui_precision(ui);

                ui.add_space(8.0);
                self.ui_historique(ui);
            });
    }

    fn ui_ecran(&mut self, ui: &mut egui::Ui) {
        let expression = self.session.expression().to_string();
        let apercu = self.session.apercu();

        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    let texte = if expression.is_empty() { "0" } else { &expression };
                    ui.label(egui::RichText::new(texte).monospace().size(26.0));

                    // aperçu vide => ligne réservée, l’écran ne saute pas
                    ui.label(
                        egui::RichText::new(if apercu.is_empty() { " " } else { &apercu })
                            .monospace()
                            .size(18.0)
                            .weak(),
                    );
                });
            });
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_calculatrice")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for rangee in PAVE {
                    for (label, bouton) in rangee {
                        self.bouton(ui, label, bouton);
                    }
                    ui.end_row();
                }
                for (label, bouton) in EXTRA {
                    self.bouton(ui, label, bouton);
                }
                ui.end_row();
            });
    }

    fn bouton(&mut self, ui: &mut egui::Ui, label: &str, bouton: Bouton) {
        let resp = ui.add_sized(TAILLE_TOUCHE, egui::Button::new(label));
        if !resp.clicked() {
            return;
        }
        match bouton {
            Bouton::Touche(t) => self.toucher(t),
            Bouton::Effacer => self.effacer(),
            Bouton::Retour => self.retour(),
            Bouton::Valider => self.valider(),
        }
    }

    fn ui_precision(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Précision :");
            let mut p = self.precision();
            let resp = ui.add(
                egui::DragValue::new(&mut p)
                    .speed(0.1)
                    .range(0..=PRECISION_MAX)
                    .suffix(" décimales"),
            );
            if resp.changed() {
                self.regler_precision(p);
            }
        });
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Historique")
            .default_open(false)
            .show(ui, |ui| {
                let enregistrements = self.historique();
                if enregistrements.is_empty() {
                    ui.weak("aucun calcul");
                    return;
                }

                if ui.button("Tout effacer").clicked() {
                    self.vider_historique();
                    return;
                }

                for e in &enregistrements {
                    ui.push_id(e.id, |ui| {
                        ui.horizontal(|ui| {
                            let ligne = format!("{} = {}", e.expression, e.resultat);
                            if ui
                                .add(egui::Button::new(egui::RichText::new(ligne).monospace()).frame(false))
                                .on_hover_text(if e.note.is_empty() {
                                    "Recharger l’expression"
                                } else {
                                    e.note.as_str()
                                })
                                .clicked()
                            {
                                self.charger(e);
                            }
                            if ui.small_button("✖").on_hover_text("Supprimer").clicked() {
                                self.supprimer(e.id);
                            }
                        });
                    });
                }
            });
    }
}
