// src/noyau/calcul.rs
//
// Noyaux de calcul hors des 4 opérations exactes :
// - √ : exacte si carré parfait, sinon Newton sur entier “scalé” (×10^k)
// - ^ : exposant entier exact (|n| ≤ 4096), sinon exp(b·ln|a|) en séries scalées
// - plafond de magnitude : |v| ≥ 10^1000 => Depassement
//
// Les valeurs non exactes gardent CHIFFRES_TRAVAIL chiffres SIGNIFICATIFS
// (bien au-delà de la précision d’affichage, bornée à 16) : une petite valeur
// n’est jamais aplatie en 0.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::sync::OnceLock;

use super::erreur::{ErreurEval, Issue};
use super::format::{arrondi_scale, pow10};

/// Décimales de travail pour √ et puissances non entières.
pub const CHIFFRES_TRAVAIL: usize = 40;

/// Plafond : 10^MAGNITUDE_MAX.
pub const MAGNITUDE_MAX: usize = 1000;

/// Au-delà, l’exposant entier passe par la voie exp/ln.
const EXPOSANT_EXACT_MAX: u64 = 4096;

/// Chiffres de garde des séries.
const GARDE: usize = 10;

const LOG10_2: f64 = std::f64::consts::LOG10_2;

/* ------------------------ Plafond ------------------------ */

static LIMITE: OnceLock<BigInt> = OnceLock::new();

fn limite() -> &'static BigInt {
    LIMITE.get_or_init(|| pow10(MAGNITUDE_MAX))
}

/// Vérifie le plafond de magnitude.
pub fn borner(v: BigRational) -> Issue {
    // |v| < 2^(bits(n) - bits(d) + 1) : pas besoin du test exact loin du plafond
    if v.numer().bits() <= v.denom().bits() + 3320 {
        return Ok(v);
    }
    if v.numer().abs() >= limite() * v.denom() {
        return Err(ErreurEval::Depassement);
    }
    Ok(v)
}

/// Ramène une valeur approchée (non nulle) à CHIFFRES_TRAVAIL chiffres significatifs.
fn arrondir_travail(v: &BigRational) -> BigRational {
    if v.is_zero() {
        return BigRational::zero();
    }
    let e = log10_abs(v).floor() as i64;
    let decimales = (CHIFFRES_TRAVAIL as i64 - 1 - e).max(0) as usize;
    BigRational::new(arrondi_scale(v, decimales), pow10(decimales))
}

/* ------------------------ Estimation (garde-fou seulement) ------------------------ */

fn log10_entier(n: &BigInt) -> f64 {
    let decal = n.bits().saturating_sub(64);
    let tete = (n.abs() >> decal).to_f64().unwrap_or(f64::MAX);
    tete.log10() + decal as f64 * LOG10_2
}

/// log10|r| approché (r ≠ 0). Sert uniquement à estimer les magnitudes.
fn log10_abs(r: &BigRational) -> f64 {
    log10_entier(r.numer()) - log10_entier(r.denom())
}

fn vers_f64(r: &BigRational) -> f64 {
    if r.is_zero() {
        return 0.0;
    }
    let m = 10f64.powf(log10_abs(r));
    if r.is_negative() {
        -m
    } else {
        m
    }
}

/* ------------------------ √ ------------------------ */

/// floor(√n) (n ≥ 0), Newton décroissant depuis une borne supérieure.
fn racine_entiere(n: &BigInt) -> BigInt {
    if n.is_zero() {
        return BigInt::zero();
    }

    let mut y = BigInt::one() << n.bits().div_ceil(2);
    loop {
        let y_next = (&y + n / &y) >> 1;
        if y_next >= y {
            return y;
        }
        y = y_next;
    }
}

/// √x ; négatif => ExpressionMalformee (pas de complexes).
pub fn racine(x: &BigRational) -> Issue {
    if x.is_negative() {
        return Err(ErreurEval::malformee("racine d’un nombre négatif"));
    }
    if x.is_zero() {
        return Ok(BigRational::zero());
    }

    let n = x.numer();
    let d = x.denom();

    // carré parfait (n et d déjà réduits) => résultat exact
    let rn = racine_entiere(n);
    let rd = racine_entiere(d);
    if &(&rn * &rn) == n && &(&rd * &rd) == d {
        return Ok(BigRational::new(rn, rd));
    }

    // y = floor( √(n/d) · 10^k ) = floor( √(n·10^(2k) / d) )
    // k suit la magnitude de √x (≈ 10^(log10(x)/2)) : chiffres significatifs constants
    let k = CHIFFRES_TRAVAIL + (-log10_abs(x) / 2.0).max(0.0).ceil() as usize;
    let cible = n * pow10(2 * k) / d;
    Ok(BigRational::new(racine_entiere(&cible), pow10(k)))
}

/* ------------------------ Séries scalées (ln / exp) ------------------------ */

/// atanh(z)·S, z = num/den avec |z| ≤ 1/3 (convergence ≥ 1/9 par terme).
fn atanh_scale(z: &BigRational, scale: &BigInt) -> BigInt {
    let z_s = z.numer() * scale / z.denom();
    let z2 = &z_s * &z_s / scale;

    let mut somme = BigInt::zero();
    let mut puissance = z_s;
    let mut k: u64 = 0;

    loop {
        let terme = &puissance / BigInt::from(2 * k + 1);
        if terme.is_zero() {
            break;
        }
        somme += terme;
        puissance = puissance * &z2 / scale;
        k += 1;
    }

    somme
}

fn ln2_scale(scale: &BigInt) -> BigInt {
    let tiers = BigRational::new(BigInt::one(), BigInt::from(3));
    atanh_scale(&tiers, scale) * 2
}

/// ln(a)·10^chiffres, a > 0.
///
/// a = m·2^e avec m ∈ (1/2, 2) ; ln a = e·ln2 + 2·atanh((m-1)/(m+1)).
fn ln_scale(a: &BigRational, chiffres: usize) -> BigInt {
    let scale = pow10(chiffres + GARDE);

    let e = a.numer().bits() as i64 - a.denom().bits() as i64;
    let m = if e >= 0 {
        BigRational::new(a.numer().clone(), a.denom() << e as u64)
    } else {
        BigRational::new(a.numer() << (-e) as u64, a.denom().clone())
    };

    let un = BigRational::one();
    let z = (&m - &un) / (&m + &un);

    let ln = ln2_scale(&scale) * e + atanh_scale(&z, &scale) * 2;
    ln / pow10(GARDE)
}

/// exp(x), à partir de x·10^chiffres ; précision RELATIVE 10^-chiffres.
///
/// x = q·ln2 + r, |r| < ln2 ; exp(x) = 2^q · Σ r^n/n! (2^q appliqué exactement)
fn exp_relatif(x_s: &BigInt, chiffres: usize) -> Issue {
    let scale = pow10(chiffres + GARDE);
    let x = x_s * pow10(GARDE);
    let ln2 = ln2_scale(&scale);

    let q = &x / &ln2;
    let r = &x - &q * &ln2;
    let q = q.to_i64().ok_or(ErreurEval::Depassement)?;

    let mut somme = scale.clone();
    let mut terme = scale.clone();
    let mut n: u64 = 1;
    loop {
        terme = terme * &r / (&scale * BigInt::from(n));
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        n += 1;
    }

    Ok(if q >= 0 {
        BigRational::new(somme << q as u64, scale)
    } else {
        BigRational::new(somme, scale << (-q) as u64)
    })
}

/* ------------------------ ^ ------------------------ */

/// Exponentiation rapide exacte (exposant entier, négatif => inverse).
fn puissance_entiere(base: &BigRational, exp: i64) -> BigRational {
    if exp < 0 {
        return puissance_entiere(base, -exp).recip();
    }

    let mut e = exp as u64;
    let mut acc = BigRational::one();
    let mut b = base.clone();

    while e > 0 {
        if (e & 1) == 1 {
            acc *= &b;
        }
        e >>= 1;
        if e > 0 {
            b = &b * &b;
        }
    }
    acc
}

/// base^exposant.
/// - 0^0 = 1 ; 0^(négatif) => DivisionParZero
/// - base négative + exposant non entier => ExpressionMalformee
/// - magnitude estimée > 10^1000 => Depassement (avant tout calcul)
/// - magnitude estimée < 10^-1000 => Depassement aussi (jamais un 0 silencieux)
/// - exposant entier |n| ≤ 4096 : exact, aussi petit soit le résultat dans la plage
pub fn puissance(base: &BigRational, exposant: &BigRational) -> Issue {
    if exposant.is_zero() {
        return Ok(BigRational::one());
    }
    if base.is_zero() {
        return if exposant.is_negative() {
            Err(ErreurEval::DivisionParZero)
        } else {
            Ok(BigRational::zero())
        };
    }

    let entier = exposant.is_integer();
    if base.is_negative() && !entier {
        return Err(ErreurEval::malformee(
            "puissance non entière d’un nombre négatif",
        ));
    }

    let impair = entier && !(exposant.numer() % BigInt::from(2)).is_zero();
    let negatif = base.is_negative() && impair;

    if base.abs().is_one() {
        return Ok(if negatif {
            -BigRational::one()
        } else {
            BigRational::one()
        });
    }

    let estimation = vers_f64(exposant) * log10_abs(base);
    // plage symétrique : ni 0 silencieux, ni calcul démesuré
    if estimation.abs() > MAGNITUDE_MAX as f64 {
        return Err(ErreurEval::Depassement);
    }

    if entier {
        if let Some(n) = exposant.numer().to_i64() {
            if n.unsigned_abs() <= EXPOSANT_EXACT_MAX {
                return borner(puissance_entiere(base, n));
            }
        }
    }

    // x = b·ln|a| à 10^-chiffres près : erreur de ln amplifiée par |b|
    let chiffres = log10_abs(exposant).max(0.0).ceil() as usize + CHIFFRES_TRAVAIL + GARDE;

    let ln = ln_scale(&base.abs(), chiffres);
    let x = ln * exposant.numer() / exposant.denom();
    let y = exp_relatif(&x, chiffres)?;

    let v = arrondir_travail(&y);
    borner(if negatif { -v } else { v })
}
