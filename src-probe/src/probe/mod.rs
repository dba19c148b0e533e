// FICHIER : src-probe/src/probe/mod.rs

//! Pipeline de la sonde : chargement -> parsing -> réécriture -> sérialisation -> comparaison.

pub mod report;

pub use report::{texts_equal, ProbeReport};

use crate::resources::ResourceSource;
use crate::schema::{resolve_target, SchemaDocument, SchemaDraft, SerializeStyle};
use crate::utils::{AppConfig, Result};
use tracing::instrument;

/// Paramètres d'une exécution.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRequest {
    pub path: String,
    /// URI écrite dans `$schema` ; `None` = round-trip sans réécriture.
    pub target_version: Option<String>,
    pub style: SerializeStyle,
}

impl ProbeRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target_version: Some(SchemaDraft::Draft07.uri().to_string()),
            style: SerializeStyle::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let probe = &config.probe;
        Self {
            path: probe.schema.clone(),
            target_version: probe
                .rewrite
                .then(|| resolve_target(&probe.target_version)),
            style: probe.style,
        }
    }

    pub fn without_rewrite(mut self) -> Self {
        self.target_version = None;
        self
    }

    pub fn with_target(mut self, target: &str) -> Self {
        self.target_version = Some(resolve_target(target));
        self
    }

    pub fn with_style(mut self, style: SerializeStyle) -> Self {
        self.style = style;
        self
    }
}

/// Écrase la version déclarée. Aucune vérification de compatibilité.
pub fn rewrite_version(doc: &mut SchemaDocument, target: &str) {
    doc.set_schema_version(target);
}

/// Exécute la sonde une fois.
/// La ressource est lue deux fois, par deux flux indépendants : le texte comparé
/// est celui du support, jamais une copie retenue par le parseur.
#[instrument(skip(source), fields(kind = %source.kind()))]
pub async fn run(source: &ResourceSource, request: &ProbeRequest) -> Result<ProbeReport> {
    let original = source.read_to_string(&request.path).await?;

    let stream = source.open(&request.path).await?;
    let mut doc = SchemaDocument::from_reader(stream, &request.path).await?;

    let source_version = doc.schema_version().map(str::to_string);
    let had_default = doc.default_value().is_some();
    tracing::debug!(
        version = ?source_version,
        draft = ?doc.draft(),
        default = ?doc.default_value(),
        properties = doc.property_count(),
        "Schéma chargé"
    );

    if let Some(target) = &request.target_version {
        rewrite_version(&mut doc, target);
    }

    let rewritten = doc.to_text(request.style)?;

    let report = ProbeReport::new(
        request.path.clone(),
        source_version,
        request.target_version.clone(),
        had_default,
        original,
        rewritten,
    );

    tracing::info!(
        path = %report.path,
        equal = report.equal,
        original_len = report.original.len(),
        rewritten_len = report.rewritten.len(),
        "Comparaison terminée"
    );
    Ok(report)
}
