//! Tracing setup: subscriber initialization and structured event helpers.

pub mod events;

use std::sync::Once;

use entity_core::config::ObservabilityConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Reads the `ENTITY_LOG` environment variable for filtering, e.g.
/// `ENTITY_LOG=entity_sync=debug`. Falls back to `entity_sync=info`.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    init_tracing_with_config(&ObservabilityConfig::default());
}

/// Initialize tracing from config. `ENTITY_LOG` still wins when set and
/// valid; otherwise `config.log_level` applies to this crate.
pub fn init_tracing_with_config(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ENTITY_LOG").unwrap_or_else(|_| {
            EnvFilter::new(format!("entity_sync={}", config.log_level.to_ascii_lowercase()))
        });

        let registry = tracing_subscriber::registry().with(filter);
        let installed = if config.json_logs {
            registry
                .with(fmt::layer().json().with_target(true).with_thread_ids(true))
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
        };
        // Another subscriber may already be installed by the host.
        if let Err(err) = installed {
            events::subscriber_already_installed(&err.to_string());
        }
    });
}
