//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler garde + évaluation sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - séquences de touches bornées
//! - budget temps global
//! - invariant clé : la garde ne produit JAMAIS un tampon hors invariants,
//!   et l’évaluation ne sort JAMAIS de la taxonomie d’erreurs (pas de panique)

use std::time::{Duration, Instant};

use super::erreur::ErreurEval;
use super::eval::calculer;
use super::garde::{appliquer, est_incomplete, respecte_invariants, Touche};
use super::jetons::OpBinaire;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération de touches ------------------------ */

const OPERATEURS: [OpBinaire; 5] = [
    OpBinaire::Plus,
    OpBinaire::Moins,
    OpBinaire::Fois,
    OpBinaire::Divise,
    OpBinaire::Puissance,
];

fn gen_touche(rng: &mut Rng) -> Touche {
    // chiffres sur-représentés : sinon presque tout est refusé
    match rng.pick(20) {
        0..=7 => Touche::Chiffre(rng.pick(10) as u8),
        8 | 9 => Touche::Point,
        10..=13 => Touche::Operateur(OPERATEURS[rng.pick(5) as usize]),
        14 => Touche::Racine,
        15 => Touche::Pourcent,
        16 => Touche::ParenOuvrante,
        17 => Touche::ParenFermante,
        18 => Touche::Retour,
        _ => {
            if rng.pick(8) == 0 {
                Touche::Effacer
            } else {
                Touche::Chiffre(rng.pick(10) as u8)
            }
        }
    }
}

fn est_operateur(c: char) -> bool {
    OpBinaire::depuis_caractere(c).is_some()
}

/* ------------------------ Invariants du tampon ------------------------ */

fn check_invariants(tampon: &str) {
    let chars: Vec<char> = tampon.chars().collect();

    for w in chars.windows(2) {
        assert!(
            !(est_operateur(w[0]) && est_operateur(w[1])),
            "deux opérateurs consécutifs: {tampon:?}"
        );
        assert!(!(w[0] == '√' && w[1] == '√'), "√√ dans {tampon:?}");
    }

    if let Some(&c) = chars.first() {
        assert!(!est_operateur(c), "opérateur en tête: {tampon:?}");
    }

    for (i, &c) in chars.iter().enumerate() {
        if c == '%' {
            let avant = if i > 0 { Some(chars[i - 1]) } else { None };
            assert!(
                matches!(avant, Some(p) if p.is_ascii_digit() || p == ')'),
                "'%' mal placé dans {tampon:?}"
            );
        }
    }

    // la vérification du chargement accepte tout ce que la garde produit
    assert!(respecte_invariants(tampon), "tampon garde-produit refusé: {tampon:?}");

    // au plus un '.' par suite de chiffres/points
    for nombre in tampon.split(|c: char| !(c.is_ascii_digit() || c == '.')) {
        assert!(
            nombre.matches('.').count() <= 1,
            "deux '.' dans un nombre: {tampon:?}"
        );
    }
}

fn check_issue(tampon: &str, precision: u8) -> bool {
    match calculer(tampon, precision) {
        Ok(s) => {
            assert!(!s.is_empty(), "résultat vide pour {tampon:?}");
            assert_ne!(s, "-0", "zéro négatif pour {tampon:?}");
            true
        }
        Err(
            ErreurEval::DivisionParZero
            | ErreurEval::ExpressionMalformee(_)
            | ErreurEval::Depassement,
        ) => false,
    }
}

/* ------------------------ Campagnes ------------------------ */

#[test]
fn fuzz_garde_invariants_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0xC0FFEE);
    let mut acceptees = 0usize;
    let mut refusees = 0usize;

    for _ in 0..400 {
        let mut tampon = String::new();
        for _ in 0..24 {
            budget(t0, max);
            let touche = gen_touche(&mut rng);
            match appliquer(&tampon, touche) {
                Some(t) => {
                    acceptees += 1;
                    tampon = t;
                }
                None => refusees += 1,
            }
            check_invariants(&tampon);
        }
    }

    assert!(acceptees > 0, "aucune touche acceptée");
    assert!(refusees > 0, "aucune touche refusée");
}

#[test]
fn fuzz_evaluation_taxonomie_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let mut rng = Rng::new(42);
    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..300 {
        let mut tampon = String::new();
        let longueur = 1 + rng.pick(16);
        for _ in 0..longueur {
            if let Some(t) = appliquer(&tampon, gen_touche(&mut rng)) {
                tampon = t;
            }
        }
        budget(t0, max);

        if est_incomplete(&tampon) {
            continue;
        }
        let precision = rng.pick(17) as u8;
        if check_issue(&tampon, precision) {
            seen_ok += 1;
        } else {
            seen_err += 1;
        }
    }

    assert!(seen_ok > 0, "aucun calcul réussi");
    assert!(seen_err > 0, "aucune erreur rencontrée");
}

#[test]
fn fuzz_texte_brut_safe() {
    // hors garde : l’évaluateur doit tenir face à n’importe quoi
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let alphabet: Vec<char> = "0123456789.+-*/^×÷−√%() x,".chars().collect();
    let mut rng = Rng::new(7);

    for _ in 0..500 {
        budget(t0, max);
        let longueur = rng.pick(20) as usize;
        let expr: String = (0..longueur)
            .map(|_| alphabet[rng.pick(alphabet.len() as u32) as usize])
            .collect();
        check_issue(&expr, 6);
    }
}

#[test]
fn fuzz_determinisme() {
    let gen = |seed: u64| {
        let mut rng = Rng::new(seed);
        let mut tampon = String::new();
        for _ in 0..24 {
            if let Some(t) = appliquer(&tampon, gen_touche(&mut rng)) {
                tampon = t;
            }
        }
        let issue = if est_incomplete(&tampon) {
            None
        } else {
            Some(calculer(&tampon, 6))
        };
        (tampon, issue)
    };

    for seed in [1u64, 2, 3, 99, 1234] {
        assert_eq!(gen(seed), gen(seed), "seed={seed}");
    }
}
