// src/noyau/rpn.rs
//
// Shunting-yard à deux piles : jetons -> valeur exacte.
// Pas d’AST : chaque opérateur dépilé est appliqué tout de suite à la pile de sortie.
//
// Règles:
// - Nombre            : littéral validé (au moins un chiffre, un seul '.') puis empilé
// - % (postfixe)      : appliqué sur place au sommet de la sortie (÷ 100), jamais sur la pile ops
// - √ / oppose        : préfixes, empilés sans rien dépiler (précédence 4)
// - binaire op        : dépile tant que p(sommet) >= p(op), puis empile op
// - ( )               : bornes classiques
// - à la fin          : tout dépiler ; il doit rester exactement une valeur

use num_rational::BigRational;
use num_traits::Zero;

use super::calcul::{borner, puissance, racine};
use super::erreur::{ErreurEval, Issue};
use super::format::vers_decimal;
use super::jetons::{Jeton, OpBinaire, OpPostfixe, OpPrefixe};

/// Entrée de la pile d’opérateurs.
#[derive(Clone, Copy, Debug)]
enum Op {
    Binaire(OpBinaire),
    Prefixe(OpPrefixe),
    Paren,
}

impl Op {
    fn precedence(self) -> u8 {
        match self {
            Op::Binaire(op) => op.precedence(),
            Op::Prefixe(op) => op.precedence(),
            Op::Paren => 0,
        }
    }
}

fn depiler(sortie: &mut Vec<BigRational>) -> Result<BigRational, ErreurEval> {
    sortie
        .pop()
        .ok_or_else(|| ErreurEval::malformee("opérande manquant"))
}

/// Applique un opérateur à la pile de sortie.
fn appliquer(op: Op, sortie: &mut Vec<BigRational>) -> Result<(), ErreurEval> {
    let v = match op {
        Op::Prefixe(p) => {
            let x = depiler(sortie)?;
            match p {
                OpPrefixe::Racine => racine(&x)?,
                OpPrefixe::Oppose => -x,
            }
        }

        Op::Binaire(b) => {
            if sortie.len() < 2 {
                return Err(ErreurEval::malformee("opérateur binaire sans deux opérandes"));
            }
            let y = depiler(sortie)?;
            let x = depiler(sortie)?;
            match b {
                OpBinaire::Plus => borner(x + y)?,
                OpBinaire::Moins => borner(x - y)?,
                OpBinaire::Fois => borner(x * y)?,
                OpBinaire::Divise => {
                    if y.is_zero() {
                        return Err(ErreurEval::DivisionParZero);
                    }
                    borner(x / y)?
                }
                OpBinaire::Puissance => puissance(&x, &y)?,
            }
        }

        Op::Paren => return Err(ErreurEval::malformee("parenthèses non fermées")),
    };

    sortie.push(v);
    Ok(())
}

/// Évalue une suite de jetons.
///
/// Exemple:
///   "2+3×4"  -> 14
///   "√9+1"   -> 4   (√ lie plus fort que ^ : √4^2 = (√4)^2)
///   "50%"    -> 0.5
pub fn evaluate(jetons: &[Jeton]) -> Issue {
    let mut sortie: Vec<BigRational> = Vec::new();
    let mut ops: Vec<Op> = Vec::new();

    for jeton in jetons {
        match jeton {
            Jeton::Nombre(litteral) => sortie.push(borner(vers_decimal(litteral)?)?),

            Jeton::Postfixe(OpPostfixe::Pourcent) => {
                let x = sortie
                    .pop()
                    .ok_or_else(|| ErreurEval::malformee("% sans opérande"))?;
                sortie.push(x / BigRational::from_integer(100.into()));
            }

            Jeton::Prefixe(p) => ops.push(Op::Prefixe(*p)),

            Jeton::Binaire(b) => {
                let p = b.precedence();
                while let Some(&sommet) = ops.last() {
                    if matches!(sommet, Op::Paren) || sommet.precedence() < p {
                        break;
                    }
                    ops.pop();
                    appliquer(sommet, &mut sortie)?;
                }
                ops.push(Op::Binaire(*b));
            }

            Jeton::ParenOuvrante => ops.push(Op::Paren),

            Jeton::ParenFermante => loop {
                match ops.pop() {
                    Some(Op::Paren) => break,
                    Some(op) => appliquer(op, &mut sortie)?,
                    None => {
                        return Err(ErreurEval::malformee(
                            "parenthèse fermante sans ouvrante",
                        ))
                    }
                }
            },
        }
    }

    while let Some(op) = ops.pop() {
        appliquer(op, &mut sortie)?;
    }

    if sortie.len() != 1 {
        return Err(ErreurEval::malformee("expression invalide"));
    }
    depiler(&mut sortie)
}
