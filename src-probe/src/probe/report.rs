// FICHIER : src-probe/src/probe/report.rs

use crate::schema::SchemaDraft;
use std::fmt;

/// Égalité stricte : casse et blancs comptent.
pub fn texts_equal(original: &str, rewritten: &str) -> bool {
    original == rewritten
}

/// Résultat d'une exécution de la sonde.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub path: String,
    pub source_version: Option<String>,
    /// `None` quand la réécriture est désactivée.
    pub target_version: Option<String>,
    pub had_default: bool,
    pub original: String,
    pub rewritten: String,
    pub equal: bool,
}

impl ProbeReport {
    pub fn new(
        path: impl Into<String>,
        source_version: Option<String>,
        target_version: Option<String>,
        had_default: bool,
        original: String,
        rewritten: String,
    ) -> Self {
        let equal = texts_equal(&original, &rewritten);
        Self {
            path: path.into(),
            source_version,
            target_version,
            had_default,
            original,
            rewritten,
            equal,
        }
    }

    pub fn source_draft(&self) -> Option<SchemaDraft> {
        self.source_version.as_deref().and_then(SchemaDraft::from_uri)
    }

    /// Seule sortie observable du programme.
    pub fn line(&self) -> String {
        format!("Equal: {}", self.equal)
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line())
    }
}
