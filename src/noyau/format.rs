// src/noyau/format.rs
//
// Texte décimal <-> rationnel exact.
// - vers_decimal     : littéral "12.50" -> 1250/100 (exact, sans flottant)
// - format_resultat  : arrondi HALF-UP à `precision` décimales, zéros finaux retirés

use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::erreur::ErreurEval;

pub fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Littéral décimal -> rationnel exact.
/// Accepte "12", "12.5", "5.", ".5" et un '-' en tête ; refuse "", ".", "1.2.3".
pub fn vers_decimal(s: &str) -> Result<BigRational, ErreurEval> {
    let (neg, corps) = match s.strip_prefix('-') {
        Some(reste) => (true, reste),
        None => (false, s),
    };

    let (entier, frac) = corps.split_once('.').unwrap_or((corps, ""));

    let chiffres_ok = |t: &str| t.chars().all(|c| c.is_ascii_digit());
    if !chiffres_ok(entier) || !chiffres_ok(frac) {
        return Err(ErreurEval::malformee(format!("littéral invalide: {s:?}")));
    }
    if entier.is_empty() && frac.is_empty() {
        return Err(ErreurEval::malformee(format!("littéral sans chiffre: {s:?}")));
    }

    let tous = format!("{entier}{frac}");
    let n = BigInt::parse_bytes(tous.as_bytes(), 10)
        .ok_or_else(|| ErreurEval::malformee(format!("littéral invalide: {s:?}")))?;
    let n = if neg { -n } else { n };

    Ok(BigRational::new(n, pow10(frac.len())))
}

/// r -> entier “scalé” = round_half_up(r * 10^digits), arrondi à l’écart de zéro.
pub fn arrondi_scale(r: &BigRational, digits: usize) -> BigInt {
    let neg = r.is_negative();
    let n = r.numer().abs();
    let d = r.denom();

    // floor((2·n·10^k + d) / (2·d))
    let deux = BigInt::from(2);
    let q = (&deux * n * pow10(digits) + d) / (&deux * d);

    if neg {
        -q
    } else {
        q
    }
}

/// Arrondit `valeur` à `precision` décimales (HALF-UP), puis retire les zéros finaux
/// (et le '.' final). Jamais de "-0".
pub fn format_resultat(valeur: &BigRational, precision: u8) -> String {
    let digits = precision as usize;
    let scaled = arrondi_scale(valeur, digits);

    if scaled.is_zero() {
        return "0".to_string();
    }

    let neg = scaled.sign() == Sign::Minus;
    let abs = scaled.abs();

    let scale = pow10(digits);
    let int_part = &abs / &scale;
    let frac_part = &abs % &scale;

    let mut out = String::new();
    if neg {
        out.push('-');
    }
    out.push_str(&int_part.to_str_radix(10));

    if digits > 0 && !frac_part.is_zero() {
        let mut frac = frac_part.to_str_radix(10);
        while frac.len() < digits {
            frac.insert(0, '0');
        }
        let frac = frac.trim_end_matches('0');
        out.push('.');
        out.push_str(frac);
    }

    out
}
