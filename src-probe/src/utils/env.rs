// FICHIER : src-probe/src/utils/env.rs

use crate::utils::json::{Map, Value};
use std::env;

/// Séparateur de niveaux dans les noms de variables (`LOGGING__LEVEL` -> logging.level).
pub const NESTING_SEPARATOR: &str = "__";

/// Récupère une variable d'environnement (Optionnel).
pub fn get_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// Projection `PREFIX_SECTION__KEY=val` -> `{ "section": { "key": "val" } }`.
/// Les clés sont passées en minuscules ; les valeurs restent des chaînes.
pub fn prefixed_from<I>(vars: I, prefix: &str) -> Value
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut root = Map::new();

    for (name, value) in vars {
        let Some(rest) = name.strip_prefix(prefix) else {
            continue;
        };
        let segments: Vec<String> = rest
            .split(NESTING_SEPARATOR)
            .map(|s| s.to_ascii_lowercase())
            .collect();
        if segments.iter().any(|s| s.is_empty()) {
            tracing::debug!(variable = %name, "Variable ignorée (segment vide)");
            continue;
        }
        insert_path(&mut root, &segments, Value::String(value));
    }

    Value::Object(root)
}

fn insert_path(map: &mut Map<String, Value>, segments: &[String], value: Value) {
    match segments {
        [] => {}
        [last] => {
            map.insert(last.clone(), value);
        }
        [head, tail @ ..] => {
            let slot = map
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(inner) = slot {
                insert_path(inner, tail, value);
            }
        }
    }
}
