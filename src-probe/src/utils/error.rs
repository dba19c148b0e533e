// FICHIER : src-probe/src/utils/error.rs

use std::io;
use std::path::PathBuf;

// --- RE-EXPORTS ANYHOW (Pour la flexibilité du CLI) ---
pub use anyhow::{anyhow, Context};
// On renomme le Result de anyhow pour ne pas qu'il écrase le nôtre
pub use anyhow::Result as AnyResult;

/// Type de résultat standard de la sonde.
pub type Result<T> = std::result::Result<T, AppError>;

/// Enumération centrale des erreurs.
/// Toutes sont fatales : elles remontent jusqu'à `main` sans reprise.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Erreur de configuration : {0}")]
    Config(String),

    #[error("Ressource introuvable : {0}")]
    ResourceNotFound(String),

    #[error("Erreur d'entrée/sortie sur {path:?} : {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Erreur de parsing du schéma : {0}")]
    Parse(String),

    #[error("Erreur de sérialisation : {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Convertit une erreur I/O en gardant le chemin fautif.
    /// `NotFound` devient `ResourceNotFound` pour que l'opérateur voie le chemin demandé.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            AppError::ResourceNotFound(path.to_string_lossy().to_string())
        } else {
            AppError::Io { path, source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::ResourceNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display_formatting() {
        let err = AppError::Config("Fichier manquant".to_string());
        assert_eq!(
            err.to_string(),
            "Erreur de configuration : Fichier manquant"
        );

        let err = AppError::ResourceNotFound("schemas/absent.schema.jsonc".to_string());
        assert_eq!(
            err.to_string(),
            "Ressource introuvable : schemas/absent.schema.jsonc"
        );
    }

    #[test]
    fn test_from_io_not_found_keeps_path() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "absent");
        let app_err = AppError::from_io("schemas/x.json", io_err);

        match app_err {
            AppError::ResourceNotFound(p) => assert_eq!(p, "schemas/x.json"),
            other => panic!("Devrait être ResourceNotFound, obtenu {other:?}"),
        }
    }

    #[test]
    fn test_from_io_other_kind_is_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "interdit");
        let app_err = AppError::from_io("/root/secret.json", io_err);

        assert!(!app_err.is_not_found());
        match app_err {
            AppError::Io { path, source } => {
                assert_eq!(path, PathBuf::from("/root/secret.json"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("Devrait être Io, obtenu {other:?}"),
        }
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let app_err: AppError = serde_err.into();

        match app_err {
            AppError::Serialization(e) => assert!(e.is_syntax()),
            _ => panic!("Devrait être converti en AppError::Serialization"),
        }
    }
}
