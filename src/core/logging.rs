//! Logging setup and run identifiers.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with env-filter support.
///
/// Default filter: info level overall, debug for this crate, warn for
/// hyper/reqwest to hide verbose connection logs. `RUST_LOG` overrides the
/// base level; the noise suppression for hyper/reqwest is always appended so
/// a blanket `RUST_LOG=debug` does not flood the output with protocol
/// internals.
pub fn init_logging() {
    let base_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,model_test_console=debug".to_string());
    let filter = format!("{},hyper=warn,reqwest=warn", base_filter);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

/// Generate a new unique run ID using UUID v4.
pub fn generate_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_run_id_is_unique() {
        let id1 = generate_run_id();
        let id2 = generate_run_id();
        assert_eq!(id1.len(), 36);
        assert_ne!(id1, id2);
    }
}
