// FICHIER : src-probe/src/resources/content_root.rs

use super::normalize;
use crate::utils::{AppError, Result};
use std::path::PathBuf;
use tokio::fs;
use tracing::instrument;

/// Racine de contenu : tout chemin logique est résolu sous ce dossier, jamais au-dessus.
#[derive(Clone, Debug)]
pub struct ContentRoot {
    root: PathBuf,
}

impl ContentRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Chemin physique d'une ressource logique.
    pub fn resolve(&self, logical: &str) -> Result<PathBuf> {
        let rel = normalize(logical)?;
        Ok(self.root.join(rel))
    }

    /// Ouvre un flux de lecture. Chaque appel ouvre un descripteur distinct.
    #[instrument(skip(self), fields(root = ?self.root))]
    pub async fn open(&self, logical: &str) -> Result<fs::File> {
        let path = self.resolve(logical)?;

        let not_found = || {
            AppError::ResourceNotFound(format!(
                "{} (racine de contenu : {})",
                logical,
                self.root.display()
            ))
        };

        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                not_found()
            } else {
                AppError::from_io(&path, e)
            }
        })?;

        // Vérifié sur le descripteur ouvert : un dossier n'est pas une ressource.
        let meta = file
            .metadata()
            .await
            .map_err(|e| AppError::from_io(&path, e))?;
        if !meta.is_file() {
            return Err(not_found());
        }
        Ok(file)
    }
}
