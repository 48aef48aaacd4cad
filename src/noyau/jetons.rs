// src/noyau/jetons.rs

use super::erreur::ErreurEval;

/// Opérateurs binaires (infixes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBinaire {
    Plus,
    Moins,
    Fois,
    Divise,
    Puissance, // ^
}

impl OpBinaire {
    pub fn precedence(self) -> u8 {
        match self {
            OpBinaire::Plus | OpBinaire::Moins => 1,
            OpBinaire::Fois | OpBinaire::Divise => 2,
            OpBinaire::Puissance => 3,
        }
    }

    /// Glyphe d’affichage (celui que la garde écrit dans le tampon).
    pub fn glyphe(self) -> char {
        match self {
            OpBinaire::Plus => '+',
            OpBinaire::Moins => '−',
            OpBinaire::Fois => '×',
            OpBinaire::Divise => '÷',
            OpBinaire::Puissance => '^',
        }
    }

    /// Reconnaît un opérateur binaire, glyphe d’affichage OU symbole canonique.
    pub fn depuis_caractere(c: char) -> Option<Self> {
        match c {
            '+' => Some(OpBinaire::Plus),
            '-' | '−' => Some(OpBinaire::Moins),
            '*' | '×' => Some(OpBinaire::Fois),
            '/' | '÷' => Some(OpBinaire::Divise),
            '^' => Some(OpBinaire::Puissance),
            _ => None,
        }
    }
}

/// Opérateurs unaires préfixés : √ et le moins d’opposé (ex: "-2" après un résultat négatif).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpPrefixe {
    Racine,
    Oppose,
}

impl OpPrefixe {
    pub fn precedence(self) -> u8 {
        4
    }
}

/// Opérateurs unaires postfixés.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpPostfixe {
    Pourcent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Jeton {
    /// Littéral brut ("3.14", ".5", "."…) : la forme est validée à l’évaluation.
    Nombre(String),
    Binaire(OpBinaire),
    Prefixe(OpPrefixe),
    Postfixe(OpPostfixe),
    ParenOuvrante,
    ParenFermante,
}

impl Jeton {
    /// Vrai si un opérande est attendu APRÈS ce jeton.
    fn attend_operande(&self) -> bool {
        matches!(
            self,
            Jeton::Binaire(_) | Jeton::Prefixe(_) | Jeton::ParenOuvrante
        )
    }
}

/// Glyphes d’affichage -> symboles canoniques (× -> *, ÷ -> /, − -> -).
pub fn normaliser(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            autre => autre,
        })
        .collect()
}

/// Tokenize une expression.
///
/// - chiffres et '.' consécutifs -> un seul `Nombre` (permissif sur la forme)
/// - + - * / ^ -> `Binaire`, sauf '-' en position d’opérande -> `Prefixe(Oppose)`
/// - √ -> `Prefixe(Racine)`, % -> `Postfixe(Pourcent)`, ( ) -> parenthèses
/// - espaces ignorés, tout autre caractère -> `ExpressionMalformee`
pub fn tokenize(s: &str) -> Result<Vec<Jeton>, ErreurEval> {
    let texte = normaliser(s);
    let mut out: Vec<Jeton> = Vec::new();
    let mut nombre = String::new();

    for c in texte.chars() {
        if c.is_ascii_digit() || c == '.' {
            nombre.push(c);
            continue;
        }

        if !nombre.is_empty() {
            out.push(Jeton::Nombre(std::mem::take(&mut nombre)));
        }

        if c.is_whitespace() {
            continue;
        }

        let attend_operande = out.last().map_or(true, Jeton::attend_operande);

        let jeton = match c {
            '-' if attend_operande => Jeton::Prefixe(OpPrefixe::Oppose),
            '√' => Jeton::Prefixe(OpPrefixe::Racine),
            '%' => Jeton::Postfixe(OpPostfixe::Pourcent),
            '(' => Jeton::ParenOuvrante,
            ')' => Jeton::ParenFermante,
            _ => match OpBinaire::depuis_caractere(c) {
                Some(op) => Jeton::Binaire(op),
                None => {
                    return Err(ErreurEval::malformee(format!("caractère inattendu: '{c}'")));
                }
            },
        };
        out.push(jeton);
    }

    if !nombre.is_empty() {
        out.push(Jeton::Nombre(nombre));
    }

    Ok(out)
}

/// Format utilitaire (journalisation) : liste de jetons en texte.
pub fn format_jetons(jetons: &[Jeton]) -> String {
    let mut out = Vec::with_capacity(jetons.len());
    for j in jetons {
        let s = match j {
            Jeton::Nombre(n) => n.clone(),
            Jeton::Binaire(op) => op.glyphe().to_string(),
            Jeton::Prefixe(OpPrefixe::Racine) => "√".to_string(),
            Jeton::Prefixe(OpPrefixe::Oppose) => "neg".to_string(),
            Jeton::Postfixe(OpPostfixe::Pourcent) => "%".to_string(),
            Jeton::ParenOuvrante => "(".to_string(),
            Jeton::ParenFermante => ")".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
