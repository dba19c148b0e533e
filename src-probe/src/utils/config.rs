// FICHIER : src-probe/src/utils/config.rs

use crate::resources::SourceKind;
use crate::schema::{SchemaDraft, SerializeStyle};
use crate::utils::json::{self, json, Value};
use crate::utils::{env, AppError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

/// Singleton global pour la configuration
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Préfixe des variables lues pendant la phase "hôte" (environnement, racine de contenu).
pub const HOST_ENV_PREFIX: &str = "PROBE_";
/// Préfixe des variables applicatives (`SCHEMA_PROBE_LOGGING__LEVEL=debug`).
pub const APP_ENV_PREFIX: &str = "SCHEMA_PROBE_";
/// Fichier de configuration de base, relatif à la racine de contenu.
pub const SETTINGS_FILE: &str = "appsettings.json";
/// Dossier de surcharge utilisateur sous le HOME (Production uniquement).
pub const USER_SETTINGS_DIR: &str = ".schema-probe";
/// Magasin de secrets du développeur (Development uniquement).
pub const DEV_SECRETS_FILE: &str = ".env";

pub const DEFAULT_SCHEMA_PATH: &str = "schemas/empty.schema.jsonc";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// --- ENVIRONNEMENT D'EXÉCUTION ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    Development,
    Staging,
    Production,
    Test,
}

impl RuntimeEnvironment {
    /// Valeur par défaut selon le profil de compilation.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            RuntimeEnvironment::Development
        } else {
            RuntimeEnvironment::Production
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeEnvironment::Development => "development",
            RuntimeEnvironment::Staging => "staging",
            RuntimeEnvironment::Production => "production",
            RuntimeEnvironment::Test => "test",
        }
    }
}

impl fmt::Display for RuntimeEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeEnvironment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeEnvironment::Development),
            "staging" => Ok(RuntimeEnvironment::Staging),
            "production" | "prod" => Ok(RuntimeEnvironment::Production),
            "test" => Ok(RuntimeEnvironment::Test),
            other => Err(AppError::Config(format!(
                "Environnement inconnu : '{}'",
                other
            ))),
        }
    }
}

// --- STRUCTURE DE CONFIGURATION ---

/// Configuration globale, en lecture seule une fois chargée.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(deserialize_with = "deserialize_environment_flexible")]
    pub environment: RuntimeEnvironment,
    /// Fixée par la phase hôte, jamais par les couches JSON.
    #[serde(default)]
    pub content_root: PathBuf,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Active le puits fichier JSON quand renseigné.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    #[serde(default = "default_schema_path")]
    pub schema: String,
    #[serde(default)]
    pub source: SourceKind,
    #[serde(default = "default_target_version")]
    pub target_version: String,
    #[serde(default)]
    pub style: SerializeStyle,
    #[serde(default = "default_true", deserialize_with = "deserialize_bool_flexible")]
    pub rewrite: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            schema: default_schema_path(),
            source: SourceKind::default(),
            target_version: default_target_version(),
            style: SerializeStyle::default(),
            rewrite: true,
        }
    }
}

// --- HELPERS SERDE ---

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_schema_path() -> String {
    DEFAULT_SCHEMA_PATH.to_string()
}
fn default_target_version() -> String {
    SchemaDraft::Draft07.uri().to_string()
}
fn default_true() -> bool {
    true
}

/// Les couches "variables d'environnement" ne produisent que des chaînes :
/// on accepte donc `true` comme `"true"`, `"1"`, `"yes"`...
fn deserialize_bool_flexible<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Value = Deserialize::deserialize(deserializer)?;
    match &v {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(serde::de::Error::custom(format!(
                "Booléen invalide : '{}'",
                s
            ))),
        },
        _ => Err(serde::de::Error::custom(
            "Format booléen invalide : attendu bool ou chaîne",
        )),
    }
}

fn deserialize_environment_flexible<'de, D>(
    deserializer: D,
) -> std::result::Result<RuntimeEnvironment, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

// --- SOURCES DE CONFIGURATION ---

/// Une couche de configuration. L'ordre de la liste fait foi : la dernière gagne.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Fichier JSON optionnel (absent = couche vide).
    JsonFile(PathBuf),
    /// Fichier `.env` du développeur, filtré sur `APP_ENV_PREFIX`.
    DotEnv(PathBuf),
    /// Variables d'environnement applicatives.
    EnvPrefix(String),
    /// Surcharges de la ligne de commande.
    CommandLine,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::JsonFile(p) => write!(f, "json:{}", p.display()),
            ConfigSource::DotEnv(p) => write!(f, "dotenv:{}", p.display()),
            ConfigSource::EnvPrefix(p) => write!(f, "env:{}*", p),
            ConfigSource::CommandLine => f.write_str("cli"),
        }
    }
}

/// Assemble les couches de configuration.
/// Les entrées (variables, HOME, surcharges CLI) sont injectables pour les tests.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    vars: Vec<(String, String)>,
    home: Option<PathBuf>,
    working_dir: PathBuf,
    /// Racine imposée par l'appelant (`--content-root`), prioritaire sur `PROBE_CONTENT_ROOT`.
    content_root: Option<PathBuf>,
    cli: Value,
}

impl ConfigLoader {
    /// Chargeur branché sur le processus courant.
    pub fn from_process(cli: Value) -> Self {
        Self {
            vars: std::env::vars().collect(),
            home: dirs::home_dir(),
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            content_root: None,
            cli,
        }
    }

    /// Chargeur isolé : aucune variable, aucun HOME.
    pub fn isolated(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: Vec::new(),
            home: None,
            working_dir: working_dir.into(),
            content_root: None,
            cli: json!({}),
        }
    }

    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = Some(root.into());
        self
    }

    pub fn with_cli(mut self, cli: Value) -> Self {
        self.cli = cli;
        self
    }

    /// Valeurs en mémoire, première couche.
    fn defaults(&self) -> Value {
        json!({
            "environment": RuntimeEnvironment::for_build().as_str(),
            "logging": { "level": DEFAULT_LOG_LEVEL },
            "probe": {
                "schema": DEFAULT_SCHEMA_PATH,
                "source": SourceKind::default(),
                "target_version": SchemaDraft::Draft07.uri(),
                "style": SerializeStyle::default(),
                "rewrite": true
            }
        })
    }

    /// Phase hôte : fixe l'environnement et la racine de contenu
    /// avant de savoir quels fichiers lire.
    fn host_settings(&self) -> Result<(RuntimeEnvironment, PathBuf)> {
        let mut host = self.defaults();
        json::merge(
            &mut host,
            env::prefixed_from(self.vars.iter().cloned(), HOST_ENV_PREFIX),
        );
        if let Some(v) = self.cli.get("environment") {
            host["environment"] = v.clone();
        }

        let environment: RuntimeEnvironment = match host.get("environment").and_then(|v| v.as_str()) {
            Some(s) => s.parse()?,
            None => RuntimeEnvironment::for_build(),
        };

        let root = match &self.content_root {
            Some(root) => root.clone(),
            None => host
                .get("content_root")
                .and_then(|v| v.as_str())
                .map(PathBuf::from)
                .unwrap_or_else(|| self.working_dir.clone()),
        };
        let root = if root.is_absolute() {
            root
        } else {
            self.working_dir.join(root)
        };

        Ok((environment, root))
    }

    /// Liste ordonnée des couches applicatives pour un environnement donné.
    pub fn plan(&self, environment: RuntimeEnvironment, content_root: &Path) -> Vec<ConfigSource> {
        let mut sources = vec![
            ConfigSource::JsonFile(content_root.join(SETTINGS_FILE)),
            ConfigSource::JsonFile(
                content_root.join(format!("appsettings.{}.json", environment.as_str())),
            ),
        ];

        if environment == RuntimeEnvironment::Development {
            sources.push(ConfigSource::DotEnv(content_root.join(DEV_SECRETS_FILE)));
        }

        if environment == RuntimeEnvironment::Production {
            if let Some(home) = &self.home {
                sources.push(ConfigSource::JsonFile(
                    home.join(USER_SETTINGS_DIR).join(SETTINGS_FILE),
                ));
            }
        }

        sources.push(ConfigSource::EnvPrefix(APP_ENV_PREFIX.to_string()));
        sources.push(ConfigSource::CommandLine);
        sources
    }

    fn read_source(&self, source: &ConfigSource) -> Result<Option<Value>> {
        match source {
            ConfigSource::JsonFile(path) => {
                if !path.is_file() {
                    return Ok(None);
                }
                let content = std::fs::read_to_string(path)
                    .map_err(|e| AppError::from_io(path, e))?;
                let value: Value = serde_json::from_str(&content).map_err(|e| {
                    AppError::Config(format!("Fichier {} invalide : {}", path.display(), e))
                })?;
                if !value.is_object() {
                    return Err(AppError::Config(format!(
                        "Fichier {} invalide : objet JSON attendu à la racine",
                        path.display()
                    )));
                }
                Ok(Some(value))
            }
            ConfigSource::DotEnv(path) => {
                if !path.is_file() {
                    return Ok(None);
                }
                let iter = dotenvy::from_path_iter(path).map_err(|e| {
                    AppError::Config(format!("Lecture de {} : {}", path.display(), e))
                })?;
                let mut pairs = Vec::new();
                for item in iter {
                    let pair = item.map_err(|e| {
                        AppError::Config(format!("Entrée invalide dans {} : {}", path.display(), e))
                    })?;
                    pairs.push(pair);
                }
                Ok(Some(env::prefixed_from(pairs, APP_ENV_PREFIX)))
            }
            ConfigSource::EnvPrefix(prefix) => {
                Ok(Some(env::prefixed_from(self.vars.iter().cloned(), prefix)))
            }
            ConfigSource::CommandLine => Ok(Some(self.cli.clone())),
        }
    }

    /// Fusionne toutes les couches et produit la configuration finale.
    pub fn load(&self) -> Result<AppConfig> {
        let (environment, content_root) = self.host_settings()?;
        let mut merged = self.defaults();

        for source in self.plan(environment, &content_root) {
            if let Some(layer) = self.read_source(&source)? {
                tracing::debug!(source = %source, "Couche de configuration appliquée");
                json::merge(&mut merged, layer);
            }
        }

        // L'environnement et la racine restent ceux de la phase hôte.
        // La racine ne passe pas par le JSON : un chemin non UTF-8 y serait refusé.
        let root = merged.as_object_mut().ok_or_else(|| {
            AppError::Config("La configuration fusionnée doit être un objet JSON".to_string())
        })?;
        root.insert("environment".to_string(), json!(environment.as_str()));
        root.remove("content_root");

        let mut config: AppConfig = json::from_value(merged)?;
        config.content_root = content_root;
        Ok(config)
    }
}

// --- IMPLÉMENTATION PRINCIPALE ---

impl AppConfig {
    /// Charge la configuration et l'installe comme singleton du processus.
    pub fn init(loader: &ConfigLoader) -> Result<&'static AppConfig> {
        if let Some(existing) = CONFIG.get() {
            return Ok(existing);
        }
        let config = loader.load()?;
        Ok(CONFIG.get_or_init(|| config))
    }

    pub fn get() -> Result<&'static AppConfig> {
        CONFIG.get().ok_or_else(|| {
            AppError::Config(
                "AppConfig non initialisé ! Appelez AppConfig::init() au démarrage.".to_string(),
            )
        })
    }
}

// --- TESTS UNITAIRES ---

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            "Production".parse::<RuntimeEnvironment>().unwrap(),
            RuntimeEnvironment::Production
        );
        assert_eq!(
            "dev".parse::<RuntimeEnvironment>().unwrap(),
            RuntimeEnvironment::Development
        );
        assert!("lune".parse::<RuntimeEnvironment>().is_err());
    }

    #[test]
    fn test_defaults_only() {
        let dir = tempdir().unwrap();
        let cfg = ConfigLoader::isolated(dir.path())
            .with_vars([("PROBE_ENVIRONMENT", "test")])
            .load()
            .unwrap();

        assert_eq!(cfg.environment, RuntimeEnvironment::Test);
        assert_eq!(cfg.content_root, dir.path());
        assert_eq!(cfg.logging.level, "warn");
        assert_eq!(cfg.probe.schema, DEFAULT_SCHEMA_PATH);
        assert_eq!(cfg.probe.target_version, "http://json-schema.org/draft-07/schema#");
        assert!(cfg.probe.rewrite);
    }

    #[test]
    fn test_plan_per_environment() {
        let loader = ConfigLoader::isolated("/srv").with_home("/home/alice");
        let root = Path::new("/srv");

        let dev = loader.plan(RuntimeEnvironment::Development, root);
        assert!(dev.contains(&ConfigSource::DotEnv(PathBuf::from("/srv/.env"))));
        assert!(!dev
            .iter()
            .any(|s| *s == ConfigSource::JsonFile(PathBuf::from("/home/alice/.schema-probe/appsettings.json"))));

        let prod = loader.plan(RuntimeEnvironment::Production, root);
        assert_eq!(
            prod,
            vec![
                ConfigSource::JsonFile(PathBuf::from("/srv/appsettings.json")),
                ConfigSource::JsonFile(PathBuf::from("/srv/appsettings.production.json")),
                ConfigSource::JsonFile(PathBuf::from("/home/alice/.schema-probe/appsettings.json")),
                ConfigSource::EnvPrefix(APP_ENV_PREFIX.to_string()),
                ConfigSource::CommandLine,
            ]
        );
    }

    #[test]
    fn test_precedence_files_env_cli() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("appsettings.json"),
            r#"{ "logging": { "level": "info" }, "probe": { "style": "pretty", "schema": "a.json" } }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("appsettings.staging.json"),
            r#"{ "probe": { "schema": "b.json" } }"#,
        )
        .unwrap();

        let cfg = ConfigLoader::isolated(dir.path())
            .with_vars([
                ("PROBE_ENVIRONMENT", "staging"),
                ("SCHEMA_PROBE_LOGGING__LEVEL", "debug"),
                ("SCHEMA_PROBE_PROBE__REWRITE", "false"),
            ])
            .with_cli(json!({ "probe": { "schema": "c.json" } }))
            .load()
            .unwrap();

        assert_eq!(cfg.environment, RuntimeEnvironment::Staging);
        assert_eq!(cfg.probe.style, SerializeStyle::Pretty);
        assert_eq!(cfg.logging.level, "debug");
        assert!(!cfg.probe.rewrite);
        assert_eq!(cfg.probe.schema, "c.json");
    }

    #[test]
    fn test_dotenv_only_in_development() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(".env"),
            "SCHEMA_PROBE_PROBE__SCHEMA=secret.schema.json\nOTHER=1\n",
        )
        .unwrap();

        let dev = ConfigLoader::isolated(dir.path())
            .with_vars([("PROBE_ENVIRONMENT", "development")])
            .load()
            .unwrap();
        assert_eq!(dev.probe.schema, "secret.schema.json");

        let prod = ConfigLoader::isolated(dir.path())
            .with_vars([("PROBE_ENVIRONMENT", "production")])
            .load()
            .unwrap();
        assert_eq!(prod.probe.schema, DEFAULT_SCHEMA_PATH);
    }

    #[test]
    fn test_user_override_only_in_production() {
        let root = tempdir().unwrap();
        let home = tempdir().unwrap();
        let user_dir = home.path().join(USER_SETTINGS_DIR);
        fs::create_dir_all(&user_dir).unwrap();
        fs::write(
            user_dir.join(SETTINGS_FILE),
            r#"{ "probe": { "source": "embedded" } }"#,
        )
        .unwrap();

        let prod = ConfigLoader::isolated(root.path())
            .with_home(home.path())
            .with_vars([("PROBE_ENVIRONMENT", "production")])
            .load()
            .unwrap();
        assert_eq!(prod.probe.source, SourceKind::Embedded);

        let staging = ConfigLoader::isolated(root.path())
            .with_home(home.path())
            .with_vars([("PROBE_ENVIRONMENT", "staging")])
            .load()
            .unwrap();
        assert_eq!(staging.probe.source, SourceKind::ContentRoot);
    }

    #[test]
    fn test_relative_content_root_from_host_env() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        let cfg = ConfigLoader::isolated(dir.path())
            .with_vars([("PROBE_ENVIRONMENT", "test"), ("PROBE_CONTENT_ROOT", "sub")])
            .load()
            .unwrap();
        assert_eq!(cfg.content_root, dir.path().join("sub"));
    }

    #[test]
    fn test_explicit_content_root_beats_host_env() {
        let dir = tempdir().unwrap();
        let other = tempdir().unwrap();
        let cfg = ConfigLoader::isolated(dir.path())
            .with_vars([("PROBE_ENVIRONMENT", "test"), ("PROBE_CONTENT_ROOT", "sub")])
            .with_content_root(other.path())
            .load()
            .unwrap();
        assert_eq!(cfg.content_root, other.path());
    }

    #[test]
    fn test_content_root_in_settings_file_is_ignored() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("appsettings.json"),
            r#"{ "content_root": 42, "probe": { "schema": "a.json" } }"#,
        )
        .unwrap();
        let cfg = ConfigLoader::isolated(dir.path())
            .with_vars([("PROBE_ENVIRONMENT", "test")])
            .load()
            .unwrap();
        assert_eq!(cfg.content_root, dir.path());
        assert_eq!(cfg.probe.schema, "a.json");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_roots_load_without_panic() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let bad = PathBuf::from(OsStr::from_bytes(b"/tmp/schema-probe-\xff"));
        let cfg = ConfigLoader::isolated(&bad)
            .with_vars([("PROBE_ENVIRONMENT", "test")])
            .load()
            .unwrap();
        assert_eq!(cfg.content_root, bad);

        let cfg = ConfigLoader::isolated("/srv")
            .with_vars([("PROBE_ENVIRONMENT", "test")])
            .with_content_root(&bad)
            .load()
            .unwrap();
        assert_eq!(cfg.content_root, bad);
    }

    #[test]
    fn test_invalid_settings_file_is_config_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("appsettings.json"), "{ pas du json").unwrap();
        let err = ConfigLoader::isolated(dir.path())
            .with_vars([("PROBE_ENVIRONMENT", "test")])
            .load()
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_settings_file_root_must_be_object() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("appsettings.json"), "[1, 2]").unwrap();
        let err = ConfigLoader::isolated(dir.path())
            .with_vars([("PROBE_ENVIRONMENT", "test")])
            .load()
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_unknown_environment_is_config_error() {
        let dir = tempdir().unwrap();
        let err = ConfigLoader::isolated(dir.path())
            .with_vars([("PROBE_ENVIRONMENT", "lune")])
            .load()
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
