// FICHIER : src-probe/src/resources/embedded.rs

use super::normalize;
use crate::utils::{AppError, Result};
use include_dir::{include_dir, Dir, DirEntry};

// --- EMBARQUEMENT DES SCHÉMAS ---
static BUNDLED_SCHEMAS: Dir = include_dir!("$CARGO_MANIFEST_DIR/../schemas");

/// Préfixe logique sous lequel le dossier embarqué est monté.
pub const BUNDLED_MOUNT: &str = "schemas";

/// Table chemin logique -> contenu, figée à la compilation.
#[derive(Clone, Debug)]
pub struct EmbeddedResources {
    mount: &'static str,
    dir: &'static Dir<'static>,
}

impl EmbeddedResources {
    /// Les schémas du dépôt, montés sous `schemas/`.
    pub fn bundled() -> Self {
        Self::new(BUNDLED_MOUNT, &BUNDLED_SCHEMAS)
    }

    pub fn new(mount: &'static str, dir: &'static Dir<'static>) -> Self {
        Self { mount, dir }
    }

    /// Contenu brut d'une ressource embarquée.
    pub fn get(&self, logical: &str) -> Result<&'static [u8]> {
        let not_found =
            || AppError::ResourceNotFound(format!("{} (ressource embarquée)", logical));

        let path = normalize(logical)?;
        let inner = path
            .strip_prefix(self.mount)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(not_found)?;

        self.dir
            .get_file(inner)
            .map(|f| f.contents())
            .ok_or_else(not_found)
    }

    /// Tous les chemins logiques disponibles, triés.
    pub fn list(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect(self.dir, &mut |rel| {
            out.push(format!("{}/{}", self.mount, rel));
        });
        out.sort();
        out
    }
}

fn collect(dir: &Dir<'_>, sink: &mut dyn FnMut(String)) {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(sub) => collect(sub, sink),
            DirEntry::File(file) => sink(file.path().to_string_lossy().replace('\\', "/")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_schemas_are_listed() {
        let bundle = EmbeddedResources::bundled();
        let names = bundle.list();
        assert!(names.contains(&"schemas/empty.schema.jsonc".to_string()));
        assert!(names.contains(&"schemas/draft-07.schema.jsonc".to_string()));
        assert!(names.iter().all(|n| n.starts_with("schemas/")));
    }

    #[test]
    fn test_lookup_normalizes_separators() {
        let bundle = EmbeddedResources::bundled();
        let a = bundle.get("schemas/empty.schema.jsonc").unwrap();
        let b = bundle.get("./schemas\\empty.schema.jsonc").unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_missing_embedded_resource() {
        let bundle = EmbeddedResources::bundled();
        let err = bundle.get("schemas/absent.schema.jsonc").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("schemas/absent.schema.jsonc"));

        // Hors du point de montage
        assert!(bundle.get("empty.schema.jsonc").unwrap_err().is_not_found());
    }
}
