// FICHIER : src-probe/src/schema/draft.rs

use crate::utils::{AppError, Result};
use std::fmt;
use std::str::FromStr;

/// Versions de JSON Schema reconnues, identifiées par l'URI de leur méta-schéma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaDraft {
    Draft04,
    Draft06,
    Draft07,
    Draft201909,
    Draft202012,
}

impl SchemaDraft {
    pub const ALL: [SchemaDraft; 5] = [
        SchemaDraft::Draft04,
        SchemaDraft::Draft06,
        SchemaDraft::Draft07,
        SchemaDraft::Draft201909,
        SchemaDraft::Draft202012,
    ];

    /// URI canonique, telle qu'écrite dans `$schema`.
    pub fn uri(&self) -> &'static str {
        match self {
            SchemaDraft::Draft04 => "http://json-schema.org/draft-04/schema#",
            SchemaDraft::Draft06 => "http://json-schema.org/draft-06/schema#",
            SchemaDraft::Draft07 => "http://json-schema.org/draft-07/schema#",
            SchemaDraft::Draft201909 => "https://json-schema.org/draft/2019-09/schema",
            SchemaDraft::Draft202012 => "https://json-schema.org/draft/2020-12/schema",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SchemaDraft::Draft04 => "draft-04",
            SchemaDraft::Draft06 => "draft-06",
            SchemaDraft::Draft07 => "draft-07",
            SchemaDraft::Draft201909 => "2019-09",
            SchemaDraft::Draft202012 => "2020-12",
        }
    }

    /// Reconnaît une URI de méta-schéma. Tolère le `#` final et http/https.
    pub fn from_uri(uri: &str) -> Option<Self> {
        let key = uri_key(uri);
        Self::ALL.into_iter().find(|d| uri_key(d.uri()) == key)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "draft-04" | "draft4" | "4" => Some(SchemaDraft::Draft04),
            "draft-06" | "draft6" | "6" => Some(SchemaDraft::Draft06),
            "draft-07" | "draft7" | "7" => Some(SchemaDraft::Draft07),
            "2019-09" | "draft-2019-09" => Some(SchemaDraft::Draft201909),
            "2020-12" | "draft-2020-12" => Some(SchemaDraft::Draft202012),
            _ => None,
        }
    }
}

fn uri_key(uri: &str) -> &str {
    let trimmed = uri.trim().trim_end_matches('#');
    trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed)
}

impl fmt::Display for SchemaDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemaDraft {
    type Err = AppError;

    /// Accepte un nom court (`draft-07`, `7`, `2020-12`) ou une URI connue.
    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
            .or_else(|| Self::from_uri(s))
            .ok_or_else(|| AppError::Config(format!("Version de schéma inconnue : '{}'", s)))
    }
}

/// Cible de réécriture : un nom court devient l'URI canonique, une URI est prise à la lettre.
pub fn resolve_target(raw: &str) -> String {
    SchemaDraft::from_name(raw)
        .map(|d| d.uri().to_string())
        .unwrap_or_else(|| raw.to_string())
}
