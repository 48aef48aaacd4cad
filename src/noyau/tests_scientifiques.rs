//! Tests scientifiques (campagne) : propriétés du moteur + limites contrôlées.
//!
//! But : vérifier les contrats de bout en bout (garde -> jetons -> évaluation -> format)
//! sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées
//! - précision bornée à [0, 16]

use std::time::{Duration, Instant};

use super::erreur::ErreurEval;
use super::eval::{calculer, evaluer_expression};
use super::format::{format_resultat, vers_decimal};
use super::garde::{appliquer, Touche};
use super::jetons::OpBinaire;
use super::precision::PRECISION_MAX;

fn calc_ok(expr: &str, precision: u8) -> String {
    calculer(expr, precision).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_calc(expr: &str, precision: u8, attendu: &str) {
    assert_eq!(calc_ok(expr, precision), attendu, "expr={expr:?} p={precision}");
}

/// Budget global anti-gel (scientifique + safe).
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Division ------------------------ */

#[test]
fn sci_division_half_up() {
    assert_calc("1/3", 6, "0.333333");
    assert_calc("22/7", 4, "3.1429");
    assert_calc("1/8", 2, "0.13");
    assert_calc("-5/8", 2, "-0.63");
    assert_calc("0.1/0.3", 3, "0.333");
    assert_calc("10/4", 0, "3");
    assert_calc("1/7", 16, "0.1428571428571429");
}

#[test]
fn sci_division_par_zero_pour_tout_a() {
    for a in ["0", "1", "7", "0.5", "123456789", "√2", "50%", "(2+3)", "-4"] {
        let expr = format!("{a}/0");
        assert_eq!(
            evaluer_expression(&expr),
            Err(ErreurEval::DivisionParZero),
            "expr={expr:?}"
        );
    }
}

/* ------------------------ Précédence ------------------------ */

#[test]
fn sci_precedence() {
    assert_calc("2+3*4", 6, "14");
    assert_calc("2^3+1", 6, "9");
    assert_calc("√9+1", 6, "4");
    assert_calc("2×3^2", 6, "18");
    assert_calc("√16÷2", 6, "2");
}

#[test]
fn sci_pourcent() {
    assert_calc("50%", 6, "0.5");
    assert_calc("12.5%", 6, "0.125");
    assert_calc("200×15%", 6, "30");
}

#[test]
fn sci_pas_de_derive_binaire() {
    // arithmétique décimale exacte : pas de 0.30000000000000004
    assert_calc("0.1+0.2", 16, "0.3");
    assert_calc("1.1×1.1", 16, "1.21");
    assert_calc("0.3−0.1", 16, "0.2");
}

/* ------------------------ Garde ------------------------ */

#[test]
fn sci_garde_remplacement_operateur() {
    let t = appliquer("5+", Touche::Operateur(OpBinaire::Fois));
    assert_eq!(t.as_deref(), Some("5×"));
    // le tampon garde-produit reste évaluable une fois complété
    assert_calc("5×2", 6, "10");
}

#[test]
fn sci_garde_point_decimal() {
    assert_eq!(appliquer("3.14", Touche::Point), None);
}

/* ------------------------ Format : idempotence ------------------------ */

#[test]
fn sci_format_idempotent() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    let valeurs = [
        "0",
        "1",
        "-1",
        "0.5",
        "2/3",
        "-2/3",
        "1/7",
        "√2",
        "123456789.987654321",
        "-0.00000000000000005",
        "99999999999999999.99999999999999999",
        "2^0.5",
        "10^-20",
    ];

    for expr in valeurs {
        let v = evaluer_expression(expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
        for p in 0..=PRECISION_MAX {
            budget(t0, max);

            let une_fois = format_resultat(&v, p);
            let relu = vers_decimal(&une_fois)
                .unwrap_or_else(|e| panic!("relecture de {une_fois:?} impossible: {e}"));
            let deux_fois = format_resultat(&relu, p);
            assert_eq!(une_fois, deux_fois, "expr={expr:?} p={p}");
        }
    }
}

#[test]
fn sci_format_plus_court() {
    // jamais de zéro final ni de '.' final
    for p in 0..=PRECISION_MAX {
        for expr in ["1/4", "3", "2.50", "1/3", "-7/2"] {
            let s = calc_ok(expr, p);
            if s.contains('.') {
                assert!(!s.ends_with('0') && !s.ends_with('.'), "s={s:?}");
            }
        }
    }
}

/* ------------------------ Taxonomie ------------------------ */

#[test]
fn sci_erreurs_distinguees() {
    assert_eq!(evaluer_expression("10^1001"), Err(ErreurEval::Depassement));
    assert!(matches!(
        evaluer_expression("√(0-4)"),
        Err(ErreurEval::ExpressionMalformee(_))
    ));
    assert!(matches!(
        evaluer_expression("."),
        Err(ErreurEval::ExpressionMalformee(_))
    ));
    // jamais un zéro silencieux
    assert_ne!(calculer("5/0", 6), Ok("0".to_string()));
}

/* ------------------------ Petites magnitudes : jamais un zéro silencieux ------------------------ */

#[test]
fn sci_petites_puissances_exactes() {
    assert_calc("1÷0.1^60", 6, &format!("1{}", "0".repeat(60)));
    assert_calc("0.1^60×10^60", 6, "1");
    assert_calc("0.1^40×10^40", 6, "1");
    assert_calc("2^-100×2^100", 6, "1");
}

#[test]
fn sci_petite_racine_inversible() {
    // √(2·10^-100) ≈ 1.414…·10^-50 => son inverse ≈ 7.07…·10^49
    let s = calc_ok("1÷√(2÷10^100)", 6);
    let entier = s.split('.').next().unwrap_or_default();
    assert_eq!(entier.len(), 50, "s={s:?}");
    assert!(entier.starts_with("707106781186547524"), "s={s:?}");

    assert_calc("√(10^-100)×10^50", 6, "1");
}

#[test]
fn sci_petite_puissance_approchee() {
    // 10^-60.5 × 10^60 = 1/√10
    assert_calc("0.1^60.5×10^60", 10, "0.316227766");
    assert_ne!(evaluer_expression("1÷0.1^60.5"), Err(ErreurEval::DivisionParZero));
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_taille_somme_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut expr = String::new();
    for k in 0..400 {
        if k > 0 {
            expr.push('+');
        }
        expr.push_str("0.5");
        budget(t0, max);
    }

    // 400 × 0.5 = 200 ; deux piles plates, aucune récursion
    assert_calc(&expr, 6, "200");
}

#[test]
fn sci_stress_racines_imbriquees() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // √√√…√65536 via parenthèses : 65536 -> 256 -> 16 -> 4 -> 2
    let mut expr = "65536".to_string();
    for _ in 0..4 {
        expr = format!("√({expr})");
        budget(t0, max);
    }
    assert_calc(&expr, 6, "2");
}

#[test]
fn sci_stress_bigint_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let big = "9".repeat(100);
    let expr = format!("{big}/7+1/7");
    budget(t0, max);

    // (10^100 - 1 + 1)/7
    let s = calc_ok(&expr, 0);
    assert_eq!(s.len(), 100);
    assert!(s.starts_with("142857"));
}
