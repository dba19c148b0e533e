use clap::{Parser, Subcommand};
use std::path::PathBuf;

// On garde le module local des commandes
mod commands;

use schema_probe::{
    user_error,
    utils::{
        context::{self, ConfigLoader}, // Config & Logs
        data::{json, merge, Value},
        error::{AnyResult, Context},
        prelude::*,
    },
};

#[derive(Parser)]
#[command(name = "probe-cli")]
#[command(about = "Sonde de round-trip pour schémas JSON (JSONC → $schema draft-07 → texte)", long_about = None)]
#[command(version)]
struct Cli {
    /// Racine de contenu (prioritaire sur PROBE_CONTENT_ROOT)
    #[arg(long, global = true)]
    content_root: Option<PathBuf>,

    /// Environnement d'exécution : development, staging, production, test
    #[arg(long, global = true)]
    env: Option<String>,

    /// Niveau de logs (syntaxe EnvFilter, ex: debug ou schema_probe=trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    // Sans sous-commande : la sonde est lancée avec la configuration courante
    command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Charge un schéma, réécrit `$schema` et compare le texte produit
    Probe(commands::probe::ProbeArgs),

    /// Liste les schémas embarqués dans le binaire
    List,
}

impl Cli {
    /// Chargeur du processus, avec la racine de contenu passée en argument.
    fn loader(&self) -> ConfigLoader {
        let loader = ConfigLoader::from_process(self.overrides());
        match &self.content_root {
            Some(root) => loader.with_content_root(root),
            None => loader,
        }
    }

    /// Surcharges issues de la ligne de commande, dernière couche de configuration.
    fn overrides(&self) -> Value {
        let mut layer = json!({});
        if let Some(env) = &self.env {
            merge(&mut layer, json!({ "environment": env }));
        }
        if let Some(level) = &self.log_level {
            merge(&mut layer, json!({ "logging": { "level": level } }));
        }
        if let Some(Commands::Probe(args)) = &self.command {
            merge(&mut layer, args.overrides());
        }
        layer
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // 1. Initialisation de la Configuration (CRITIQUE)
    let config = match AppConfig::init(&cli.loader()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ CRITICAL ERROR: Impossible d'initialiser la configuration.");
            eprintln!("   Détails : {}", e);
            std::process::exit(1);
        }
    };

    // 2. Initialisation du Logger
    if let Err(e) = context::init_logging(config) {
        eprintln!("❌ CRITICAL ERROR: Impossible d'initialiser les logs.");
        eprintln!("   Détails : {}", e);
        std::process::exit(1);
    }

    debug!(
        environment = %config.environment,
        content_root = %config.content_root.display(),
        "Configuration chargée"
    );

    // 3. Dispatch
    if let Err(e) = execute_command(cli.command, config).await {
        user_error!("CMD_FAIL", "{:#}", e);
        std::process::exit(1);
    }

    debug!("Fin de l'exécution du CLI");
}

async fn execute_command(command: Option<Commands>, config: &AppConfig) -> AnyResult<()> {
    match command {
        Some(Commands::Probe(_)) | None => commands::probe::handle(config)
            .await
            .context("Commande 'probe'"),
        Some(Commands::List) => commands::list::handle(),
    }
}
