//! src/noyau/garde.rs
//!
//! Garde de saisie : valide / transforme chaque touche AVANT qu’elle touche le tampon.
//!
//! Contrats :
//! - Synchrone, O(longueur du tampon), aucune évaluation ici.
//! - Touche refusée => `None` (aucun effet, aucune erreur montrée).
//! - Invariants du tampon : jamais deux opérateurs binaires consécutifs,
//!   au plus un '.' par nombre, jamais "√√", '%' seulement après un chiffre ou ')'.

use super::jetons::OpBinaire;

/// Une unité logique de saisie (le "=" est géré par l’appelant, pas par la garde).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Touche {
    Chiffre(u8),
    Point,
    Operateur(OpBinaire),
    Racine,
    Pourcent,
    ParenOuvrante,
    ParenFermante,
    Effacer,
    Retour,
}

impl Touche {
    /// Clavier physique -> touche (glyphes d’affichage ou symboles ASCII).
    pub fn depuis_caractere(c: char) -> Option<Touche> {
        if let Some(d) = c.to_digit(10) {
            return Some(Touche::Chiffre(d as u8));
        }
        match c {
            '.' | ',' => Some(Touche::Point),
            '√' => Some(Touche::Racine),
            '%' => Some(Touche::Pourcent),
            '(' => Some(Touche::ParenOuvrante),
            ')' => Some(Touche::ParenFermante),
            _ => OpBinaire::depuis_caractere(c).map(Touche::Operateur),
        }
    }
}

fn est_operateur(c: char) -> bool {
    OpBinaire::depuis_caractere(c).is_some()
}

/// Parenthèses ouvertes non refermées.
fn parentheses_ouvertes(tampon: &str) -> usize {
    let mut ouvertes: usize = 0;
    for c in tampon.chars() {
        match c {
            '(' => ouvertes += 1,
            ')' => ouvertes = ouvertes.saturating_sub(1),
            _ => {}
        }
    }
    ouvertes
}

/// Nombre en cours de saisie : plus long suffixe sans opérateur, √, %, ( ou ).
fn nombre_final(tampon: &str) -> &str {
    let debut = tampon
        .char_indices()
        .rev()
        .find(|&(_, c)| est_operateur(c) || matches!(c, '√' | '%' | '(' | ')'))
        .map_or(0, |(i, c)| i + c.len_utf8());
    &tampon[debut..]
}

/// Applique une touche au tampon. `None` = refusée (no-op).
pub fn appliquer(tampon: &str, touche: Touche) -> Option<String> {
    let dernier = tampon.chars().last();

    let ajout = |c: char| {
        let mut s = String::with_capacity(tampon.len() + c.len_utf8());
        s.push_str(tampon);
        s.push(c);
        s
    };

    match touche {
        Touche::Effacer => Some(String::new()),

        Touche::Retour => {
            let mut s = tampon.to_string();
            s.pop()?;
            Some(s)
        }

        Touche::Point => {
            if nombre_final(tampon).contains('.') {
                None
            } else {
                Some(ajout('.'))
            }
        }

        Touche::Operateur(op) => match dernier {
            None => None,
            Some(c) if est_operateur(c) => {
                // dernier opérateur gagne ; jamais d’opérateur seul en tête
                let mut s = tampon.to_string();
                s.pop();
                if s.is_empty() {
                    return None;
                }
                s.push(op.glyphe());
                Some(s)
            }
            Some('√') | Some('(') => None,
            Some(_) => Some(ajout(op.glyphe())),
        },

        Touche::Racine => match dernier {
            Some('√') => None,
            _ => Some(ajout('√')),
        },

        Touche::Pourcent => match dernier {
            Some(c) if c.is_ascii_digit() || c == ')' => Some(ajout('%')),
            _ => None,
        },

        Touche::ParenOuvrante => match dernier {
            None => Some(ajout('(')),
            Some(c) if est_operateur(c) || c == '√' || c == '(' => Some(ajout('(')),
            Some(_) => None,
        },

        Touche::ParenFermante => match dernier {
            Some(c)
                if (c.is_ascii_digit() || c == '%' || c == ')')
                    && parentheses_ouvertes(tampon) > 0 =>
            {
                Some(ajout(')'))
            }
            _ => None,
        },

        Touche::Chiffre(d) => {
            let c = char::from_digit(u32::from(d), 10)?;
            Some(ajout(c))
        }
    }
}

/// Expression incomplète : vide, finit par un opérateur binaire, un √ non appliqué
/// ou une '(' ; ou parenthèses non refermées. L’évaluateur n’est alors PAS appelé.
pub fn est_incomplete(tampon: &str) -> bool {
    let t = tampon.trim_end();
    match t.chars().last() {
        None => true,
        Some(c) if est_operateur(c) || c == '√' || c == '(' => true,
        Some(_) => parentheses_ouvertes(t) > 0,
    }
}

/// Un tampon venu d’ailleurs (historique) respecte-t-il les invariants de la garde ?
///
/// Seule tolérance : un '-' de tête collé à un nombre (résultat négatif réutilisé).
pub fn respecte_invariants(tampon: &str) -> bool {
    let corps = match tampon.strip_prefix('-') {
        Some(reste) if reste.starts_with(|c: char| c.is_ascii_digit() || c == '.') => reste,
        _ => tampon,
    };

    let mut precedent: Option<char> = None;
    let mut points = 0usize;
    let mut ouvertes = 0usize;

    for c in corps.chars() {
        // ',' n’existe qu’au clavier (converti en '.')
        if c == ',' || Touche::depuis_caractere(c).is_none() {
            return false;
        }
        if est_operateur(c)
            && (matches!(precedent, None | Some('√') | Some('('))
                || precedent.is_some_and(est_operateur))
        {
            return false;
        }
        match c {
            '√' if precedent == Some('√') => return false,
            '%' if !matches!(precedent, Some(p) if p.is_ascii_digit() || p == ')') => {
                return false
            }
            '.' => {
                points += 1;
                if points > 1 {
                    return false;
                }
            }
            '(' => ouvertes += 1,
            ')' => {
                if ouvertes == 0 {
                    return false;
                }
                ouvertes -= 1;
            }
            _ => {}
        }
        if !(c.is_ascii_digit() || c == '.') {
            points = 0;
        }
        precedent = Some(c);
    }
    true
}
