// FICHIER : src-probe/src/utils/mod.rs

// =========================================================================
//  Foundation Layer : erreurs, configuration, logs, JSON
// =========================================================================

pub mod config;
pub mod env;
pub mod error;
pub mod json;
pub mod logger;
pub mod macros;

// --- FAÇADES SÉMANTIQUES ---

/// **Core Foundation** : Types de base et Erreurs.
pub mod core {
    pub use super::error::{AppError, Result};
}

/// **Data Abstraction** : Manipulation JSON.
pub mod data {
    pub use super::json::{from_value, json, merge, parse, stringify, stringify_pretty, Map, Value};
    pub use serde::{Deserialize, Serialize};
}

/// **Application Context** : Accès global Config/Log/Env.
pub mod context {
    pub use super::config::{AppConfig, ConfigLoader, RuntimeEnvironment};
    pub use super::env::get_optional;
    pub use super::logger::init_logging;
}

/// **Le Prélude** : À utiliser via `use schema_probe::utils::prelude::*;`
pub mod prelude {
    pub use super::context::AppConfig;
    pub use super::core::{AppError, Result};
    pub use super::data::{json, Deserialize, Serialize, Value};
    pub use tracing::{debug, error, info, instrument, warn};
}

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use logger::init_logging;
