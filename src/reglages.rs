// src/reglages.rs
//
// Réglages de l’hôte : `reglages.toml` dans le dossier de config utilisateur,
// puis surcharge par variable d’environnement.
//
// Jamais bloquant : fichier absent => défauts ; fichier illisible / invalide => warn! + défauts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::noyau::{PRECISION_DEFAUT, PRECISION_MAX};

/// Dossier applicatif sous `dirs::config_dir()`.
const DOSSIER: &str = "calculatrice-apercu";
const FICHIER: &str = "reglages.toml";

/// Surcharge de la précision (ex: CALCULATRICE_PRECISION=10).
pub const VAR_PRECISION: &str = "CALCULATRICE_PRECISION";

#[derive(Debug, Error)]
pub enum ErreurReglages {
    #[error("lecture de {}: {source}", chemin.display())]
    Lecture {
        chemin: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("syntaxe: {0}")]
    Syntaxe(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Reglages {
    /// Décimales affichées, bornées à [0, 16].
    pub precision: u8,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            precision: PRECISION_DEFAUT,
        }
    }
}

impl Reglages {
    /// Chemin par défaut (None si la plateforme n’a pas de dossier de config).
    pub fn chemin_defaut() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(DOSSIER).join(FICHIER))
    }

    /// Charge fichier + environnement. N’échoue jamais.
    pub fn charger() -> Self {
        let base = match Self::chemin_defaut() {
            Some(chemin) => Self::charger_depuis(&chemin),
            None => {
                debug!("pas de dossier de configuration : réglages par défaut");
                Self::default()
            }
        };
        base.surcharger(std::env::var(VAR_PRECISION).ok().as_deref())
    }

    /// Fichier absent => défauts ; toute autre erreur est journalisée.
    pub fn charger_depuis(chemin: &Path) -> Self {
        match Self::lire(chemin) {
            Ok(r) => {
                debug!(chemin = %chemin.display(), precision = r.precision, "réglages lus");
                r
            }
            Err(ErreurReglages::Lecture { source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                debug!(chemin = %chemin.display(), "pas de fichier de réglages");
                Self::default()
            }
            Err(e) => {
                warn!(erreur = %e, "réglages ignorés");
                Self::default()
            }
        }
    }

    pub fn lire(chemin: &Path) -> Result<Self, ErreurReglages> {
        let texte = fs::read_to_string(chemin).map_err(|source| ErreurReglages::Lecture {
            chemin: chemin.to_path_buf(),
            source,
        })?;
        Self::depuis_texte(&texte)
    }

    pub fn depuis_texte(texte: &str) -> Result<Self, ErreurReglages> {
        let r: Reglages = toml::from_str(texte)?;
        Ok(r.bornee())
    }

    /// Applique la valeur de `CALCULATRICE_PRECISION` (si présente et valide).
    pub fn surcharger(self, precision: Option<&str>) -> Self {
        let Some(brut) = precision else {
            return self;
        };
        match brut.trim().parse::<u32>() {
            Ok(p) => Self {
                precision: u8::try_from(p).unwrap_or(u8::MAX),
            }
            .bornee(),
            Err(e) => {
                warn!(variable = VAR_PRECISION, valeur = brut, erreur = %e, "surcharge ignorée");
                self
            }
        }
    }

    fn bornee(self) -> Self {
        Self {
            precision: self.precision.min(PRECISION_MAX),
        }
    }
}
