// FICHIER : src-probe/src/schema/mod.rs

//! Lecture/écriture de schémas JSON (dialecte avec commentaires, drafts 4 à 2020-12).
//! Aucune validation de documents : seules la version et la valeur par défaut sont exposées.

pub mod document;
pub mod draft;
pub mod jsonc;

pub use document::{SchemaDocument, SerializeStyle};
pub use draft::{resolve_target, SchemaDraft};
