use clap::Args;

use schema_probe::probe::{self, ProbeRequest};
use schema_probe::resources::ResourceSource;
use schema_probe::utils::config::AppConfig;
use schema_probe::utils::data::{json, merge, Value};
use schema_probe::utils::error::{AnyResult, Context};

#[derive(Args, Debug, Clone, Default)]
pub struct ProbeArgs {
    /// Chemin logique du schéma (ex: schemas/draft-04.schema.jsonc)
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Lit le schéma dans les ressources embarquées au lieu de la racine de contenu
    #[arg(long)]
    pub embedded: bool,

    /// Version cible écrite dans `$schema` : nom court (draft-07) ou URI
    #[arg(short, long)]
    pub target: Option<String>,

    /// Round-trip simple, sans réécriture de `$schema`
    #[arg(long)]
    pub no_rewrite: bool,

    /// Mise en forme de la sérialisation
    #[arg(long, value_parser = ["compact", "pretty"])]
    pub style: Option<String>,
}

impl ProbeArgs {
    /// Couche "ligne de commande" de la configuration.
    pub fn overrides(&self) -> Value {
        let mut probe = json!({});
        if let Some(schema) = &self.schema {
            merge(&mut probe, json!({ "schema": schema }));
        }
        if self.embedded {
            merge(&mut probe, json!({ "source": "embedded" }));
        }
        if let Some(target) = &self.target {
            merge(&mut probe, json!({ "target_version": target }));
        }
        if self.no_rewrite {
            merge(&mut probe, json!({ "rewrite": false }));
        }
        if let Some(style) = &self.style {
            merge(&mut probe, json!({ "style": style }));
        }
        json!({ "probe": probe })
    }
}

pub async fn handle(config: &AppConfig) -> AnyResult<()> {
    let source = ResourceSource::from_config(config);
    let request = ProbeRequest::from_config(config);

    tracing::debug!(
        path = %request.path,
        source = %source.kind(),
        target = ?request.target_version,
        style = %request.style,
        "Lancement de la sonde"
    );

    let report = probe::run(&source, &request)
        .await
        .with_context(|| format!("Échec de la sonde sur '{}'", request.path))?;

    println!("{}", report.line());
    Ok(())
}
