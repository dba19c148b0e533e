// FICHIER : src-probe/src/resources/mod.rs

//! Accès aux documents sources : racine de contenu (disque) ou ressources embarquées.

pub mod content_root;
pub mod embedded;

pub use content_root::ContentRoot;
pub use embedded::EmbeddedResources;

use crate::utils::{AppConfig, AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Flux de lecture d'une ressource, consommé une seule fois.
pub type ResourceStream = Box<dyn AsyncRead + Send + Unpin>;

/// Marque d'ordre d'octets UTF-8, retirée à la lecture texte.
const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    ContentRoot,
    Embedded,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::ContentRoot => f.write_str("content_root"),
            SourceKind::Embedded => f.write_str("embedded"),
        }
    }
}

/// Normalise un chemin logique : séparateurs `/`, sans `./` ni `/` en tête.
/// Les remontées (`..`) et les chemins vides sont refusés.
pub fn normalize(logical: &str) -> Result<String> {
    let unified = logical.replace('\\', "/");
    let mut parts = Vec::new();
    for seg in unified.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                return Err(AppError::ResourceNotFound(format!(
                    "{} (remontée hors racine interdite)",
                    logical
                )))
            }
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return Err(AppError::ResourceNotFound(format!(
            "'{}' (chemin vide)",
            logical
        )));
    }
    Ok(parts.join("/"))
}

/// Source de contenu choisie par la configuration.
#[derive(Debug, Clone)]
pub enum ResourceSource {
    ContentRoot(ContentRoot),
    Embedded(EmbeddedResources),
}

impl ResourceSource {
    pub fn from_config(config: &AppConfig) -> Self {
        match config.probe.source {
            SourceKind::ContentRoot => {
                ResourceSource::ContentRoot(ContentRoot::new(config.content_root.clone()))
            }
            SourceKind::Embedded => ResourceSource::Embedded(EmbeddedResources::bundled()),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            ResourceSource::ContentRoot(_) => SourceKind::ContentRoot,
            ResourceSource::Embedded(_) => SourceKind::Embedded,
        }
    }

    /// Ouvre un nouveau flux indépendant sur la ressource.
    pub async fn open(&self, logical: &str) -> Result<ResourceStream> {
        match self {
            ResourceSource::ContentRoot(root) => {
                let file = root.open(logical).await?;
                Ok(Box::new(file))
            }
            ResourceSource::Embedded(bundle) => Ok(Box::new(bundle.get(logical)?)),
        }
    }

    /// Lit la ressource en entier comme texte UTF-8.
    pub async fn read_to_string(&self, logical: &str) -> Result<String> {
        let stream = self.open(logical).await?;
        read_stream(stream, logical).await
    }
}

/// Consomme un flux jusqu'au bout. Une BOM UTF-8 en tête est retirée.
pub async fn read_stream(mut stream: ResourceStream, logical: &str) -> Result<String> {
    let mut text = String::new();
    stream
        .read_to_string(&mut text)
        .await
        .map_err(|e| AppError::from_io(logical, e))?;
    if text.starts_with(UTF8_BOM) {
        text.remove(0);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_variants() {
        assert_eq!(normalize("schemas/a.json").unwrap(), "schemas/a.json");
        assert_eq!(normalize("./schemas//a.json").unwrap(), "schemas/a.json");
        assert_eq!(normalize("/schemas/a.json").unwrap(), "schemas/a.json");
        assert_eq!(normalize("schemas\\a.json").unwrap(), "schemas/a.json");
    }

    #[test]
    fn test_normalize_rejects_escape_and_empty() {
        assert!(normalize("../etc/passwd").unwrap_err().is_not_found());
        assert!(normalize("schemas/../../x").unwrap_err().is_not_found());
        assert!(normalize("./").unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_read_stream_strips_bom() {
        let raw: &'static [u8] = b"\xEF\xBB\xBF{\"a\":1}";
        let text = read_stream(Box::new(raw), "mem").await.unwrap();
        assert_eq!(text, "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_read_stream_invalid_utf8_is_io() {
        let raw: &'static [u8] = b"\xFF\xFE\x00";
        let err = read_stream(Box::new(raw), "mem").await.unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }
}
