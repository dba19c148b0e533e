// FICHIER : src-probe/src/utils/macros.rs

/// Affiche une info à l'opérateur (stderr) et logue l'événement.
/// stdout est réservé au résultat de la sonde.
#[macro_export]
macro_rules! user_info {
    ($key:expr, $($arg:tt)*) => {{
        let msg = format!($($arg)*);
        eprintln!("{}", msg);
        tracing::info!(event = "user_notification", key = $key, message = %msg);
    }};
}

/// Affiche une erreur à l'opérateur ET logue la structure technique enrichie
#[macro_export]
macro_rules! user_error {
    // Format enrichi : erreur typée + action en cours
    (
        $key:expr,
        error = $err:expr,
        action = $action:expr
    ) => {{
        eprintln!("❌ {}", $err);
        tracing::error!(
            service = "schema-probe", action = $action,
            error = ?$err, event = "user_error", key = $key
        );
    }};

    ($key:expr, $($arg:tt)*) => {{
        let msg = format!($($arg)*);
        eprintln!("❌ {}", msg);
        tracing::error!(event = "user_error", key = $key, message = %msg);
    }};
}

// --- TESTS UNITAIRES ---
#[cfg(test)]
mod tests {
    use crate::utils::error::AppError;

    #[test]
    fn test_macro_user_error_combinations() {
        let sim_err = AppError::ResourceNotFound("schemas/absent.json".to_string());
        user_error!("ERR_PROBE", error = sim_err, action = "PROBE_LOAD");

        user_error!("ERR_PROBE", "{} introuvable", "schemas/absent.json");
        user_info!("PROBE_LIST", "{} ressources", 3);
    }
}
