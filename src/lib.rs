pub mod config;
pub mod models;
pub mod journey;

pub use config::EngineConfig;
pub use journey::{JourneyEngine, JourneyError, JourneyProgress, PhaseValidationResult};
pub use models::{Brand, PhaseData, PhaseId};

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber for host applications that have none.
///
/// Respects `RUST_LOG`, falling back to [`config::default_log_filter`].
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();
    if installed {
        tracing::info!("{} tracing initialised", config::app_banner());
    }
}
