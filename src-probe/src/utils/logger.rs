// FICHIER : src-probe/src/utils/logger.rs

use crate::utils::config::{AppConfig, RuntimeEnvironment};
use crate::utils::{env, AppError, Result};
use std::path::PathBuf;
use std::sync::Once;
use tracing_appender::rolling;
use tracing_subscriber::{
    filter::filter_fn, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

// Sécurité pour éviter la double initialisation (crash fréquent en tests)
static INIT: Once = Once::new();

pub const LOG_FILE_PREFIX: &str = "schema-probe.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Puits de logs disponibles. Aucun n'écrit sur stdout : la ligne `Equal:` y est seule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Sortie compacte pour l'humain (stderr).
    Console,
    /// Sortie détaillée avec fichier/ligne (stderr), Development uniquement.
    Debug,
    /// Fichier JSON journalier pour l'exploitation.
    JsonFile(PathBuf),
}

/// Sélection explicite des puits selon l'environnement.
pub fn sinks_for(config: &AppConfig) -> Vec<LogSink> {
    let mut sinks = match config.environment {
        RuntimeEnvironment::Development => vec![LogSink::Debug],
        RuntimeEnvironment::Staging
        | RuntimeEnvironment::Production
        | RuntimeEnvironment::Test => vec![LogSink::Console],
    };
    if let Some(dir) = &config.logging.directory {
        sinks.push(LogSink::JsonFile(dir.clone()));
    }
    sinks
}

/// Construit le filtre de niveau. `RUST_LOG` reste prioritaire (résolu par l'appelant).
pub fn filter_for(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| AppError::Config(format!("Niveau de log invalide '{}' : {}", level, e)))
}

/// Niveau effectif : `RUST_LOG` s'il est valide, sinon `logging.level`.
/// Retourne aussi la valeur de `RUST_LOG` écartée, à signaler une fois le logger actif.
fn effective_level(rust_log: Option<String>, configured: &str) -> (String, Option<String>) {
    match rust_log {
        Some(raw) if filter_for(&raw).is_ok() => (raw, None),
        Some(raw) => (configured.to_string(), Some(raw)),
        None => (configured.to_string(), None),
    }
}

fn build_layer(sink: &LogSink, level: &str) -> Result<BoxedLayer> {
    // Les macros user_* affichent déjà leur message : pas de doublon en console.
    let anti_double_filter =
        filter_fn(|metadata| !metadata.fields().iter().any(|f| f.name() == "event"));

    let layer: BoxedLayer = match sink {
        LogSink::Console => fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter_for(level)?)
            .with_filter(anti_double_filter)
            .boxed(),
        LogSink::Debug => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .with_filter(filter_for(level)?)
            .with_filter(anti_double_filter)
            .boxed(),
        LogSink::JsonFile(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| AppError::from_io(dir, e))?;
            let file_appender = rolling::daily(dir, LOG_FILE_PREFIX);
            fmt::layer()
                .json()
                .with_writer(file_appender)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_for(level)?)
                .boxed()
        }
    };
    Ok(layer)
}

fn install(config: &AppConfig) -> Result<()> {
    let (level, rejected) = effective_level(env::get_optional("RUST_LOG"), &config.logging.level);
    let sinks = sinks_for(config);

    let layers = sinks
        .iter()
        .map(|sink| build_layer(sink, &level))
        .collect::<Result<Vec<_>>>()?;

    if tracing_subscriber::registry().with(layers).try_init().is_err() {
        tracing::warn!("[Logger] Tentative de ré-initialisation ignorée (subscriber global déjà actif).");
        return Ok(());
    }

    if let Some(raw) = rejected {
        tracing::warn!(
            rust_log = %raw,
            level = %level,
            "⚠️ [Logger] RUST_LOG invalide ignoré, niveau de la configuration appliqué."
        );
    }

    tracing::info!(
        environment = %config.environment,
        sinks = ?sinks,
        "Logger initialisé"
    );
    Ok(())
}

/// Installe le subscriber global une seule fois par processus.
pub fn init_logging(config: &AppConfig) -> Result<()> {
    let mut outcome = Ok(());
    INIT.call_once(|| {
        outcome = install(config);
    });
    outcome
}

// --- TESTS UNITAIRES ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::ConfigLoader;

    fn config_for(env: &str) -> AppConfig {
        ConfigLoader::isolated(std::env::temp_dir())
            .with_vars([("PROBE_ENVIRONMENT", env)])
            .load()
            .expect("config de test")
    }

    #[test]
    fn test_sinks_per_environment() {
        assert_eq!(sinks_for(&config_for("development")), vec![LogSink::Debug]);
        assert_eq!(sinks_for(&config_for("production")), vec![LogSink::Console]);
        assert_eq!(sinks_for(&config_for("test")), vec![LogSink::Console]);
    }

    #[test]
    fn test_json_file_sink_when_directory_configured() {
        let mut cfg = config_for("staging");
        cfg.logging.directory = Some(PathBuf::from("/var/log/probe"));
        assert_eq!(
            sinks_for(&cfg),
            vec![
                LogSink::Console,
                LogSink::JsonFile(PathBuf::from("/var/log/probe"))
            ]
        );
    }

    #[test]
    fn test_filter_levels() {
        assert!(filter_for("warn").is_ok());
        assert!(filter_for("schema_probe=debug").is_ok());
        assert!(matches!(
            filter_for("schema_probe=bavard"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_rust_log_falls_back_to_configured_level() {
        assert_eq!(
            effective_level(Some("schema_probe=bavard".into()), "info"),
            ("info".to_string(), Some("schema_probe=bavard".to_string()))
        );
        assert_eq!(
            effective_level(Some("debug".into()), "info"),
            ("debug".to_string(), None)
        );
        assert_eq!(effective_level(None, "warn"), ("warn".to_string(), None));
    }

    #[test]
    fn test_logger_init_idempotency() {
        let cfg = config_for("test");
        init_logging(&cfg).unwrap();
        init_logging(&cfg).unwrap();
    }
}
