// FICHIER : src-probe/src/schema/document.rs

use super::draft::SchemaDraft;
use super::jsonc;
use crate::resources::{read_stream, ResourceStream};
use crate::utils::json::{self, Map, Value};
use crate::utils::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SCHEMA_KEY: &str = "$schema";
pub const DEFAULT_KEY: &str = "default";

/// Mise en forme du texte produit par `SchemaDocument::to_text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializeStyle {
    /// Aucun blanc.
    #[default]
    Compact,
    /// Indentation de deux espaces.
    Pretty,
}

impl fmt::Display for SerializeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeStyle::Compact => f.write_str("compact"),
            SerializeStyle::Pretty => f.write_str("pretty"),
        }
    }
}

impl FromStr for SerializeStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(SerializeStyle::Compact),
            "pretty" => Ok(SerializeStyle::Pretty),
            other => Err(AppError::Config(format!("Style inconnu : '{}'", other))),
        }
    }
}

/// Schéma JSON en mémoire. L'ordre des propriétés est celui du source.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    root: Map<String, Value>,
}

impl SchemaDocument {
    /// Parse un texte JSON ou JSON-avec-commentaires.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let plain = jsonc::to_plain_json(text)?;
        let value: Value = json::parse(&plain)?;
        Self::from_value(value)
    }

    /// Parse depuis un flux indépendant, consommé en entier.
    pub async fn from_reader(stream: ResourceStream, origin: &str) -> Result<Self> {
        let text = read_stream(stream, origin).await?;
        Self::parse(&text).map_err(|e| match e {
            AppError::Parse(msg) => AppError::Parse(format!("{} : {}", origin, msg)),
            other => other,
        })
    }

    /// Vérifie la méta-structure minimale : racine objet, `$schema` textuel.
    pub fn from_value(value: Value) -> Result<Self> {
        let root = match value {
            Value::Object(root) => root,
            other => {
                return Err(AppError::Parse(format!(
                    "La racine d'un schéma doit être un objet, trouvé : {}",
                    kind_of(&other)
                )))
            }
        };

        if let Some(v) = root.get(SCHEMA_KEY) {
            if !v.is_string() {
                return Err(AppError::Parse(format!(
                    "'{}' doit être une chaîne, trouvé : {}",
                    SCHEMA_KEY,
                    kind_of(v)
                )));
            }
        }

        Ok(Self { root })
    }

    pub fn schema_version(&self) -> Option<&str> {
        self.root.get(SCHEMA_KEY).and_then(Value::as_str)
    }

    /// Draft reconnu d'après `$schema`, s'il y en a un.
    pub fn draft(&self) -> Option<SchemaDraft> {
        self.schema_version().and_then(SchemaDraft::from_uri)
    }

    /// Remplace `$schema` sur place (position conservée) ou l'ajoute en tête.
    pub fn set_schema_version(&mut self, uri: impl Into<String>) {
        let uri = Value::String(uri.into());
        if let Some(slot) = self.root.get_mut(SCHEMA_KEY) {
            *slot = uri;
            return;
        }
        let mut rebuilt = Map::with_capacity(self.root.len() + 1);
        rebuilt.insert(SCHEMA_KEY.to_string(), uri);
        rebuilt.extend(std::mem::take(&mut self.root));
        self.root = rebuilt;
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.root.get(DEFAULT_KEY)
    }

    pub fn property_count(&self) -> usize {
        self.root.len()
    }

    /// Sérialise le document complet. Déterministe pour un document inchangé.
    pub fn to_text(&self, style: SerializeStyle) -> Result<String> {
        match style {
            SerializeStyle::Compact => json::stringify(&self.root),
            SerializeStyle::Pretty => json::stringify_pretty(&self.root),
        }
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "booléen",
        Value::Number(_) => "nombre",
        Value::String(_) => "chaîne",
        Value::Array(_) => "tableau",
        Value::Object(_) => "objet",
    }
}
