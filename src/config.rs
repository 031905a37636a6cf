use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Engine-level constants
pub const ENGINE_NAME: &str = "Cycleguard";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hard cap applied by the drug-module selector. The regimen-based
/// selector applies no cap; adaptive skip/branch bounds its length.
pub const DEFAULT_TARGET_ITEM_COUNT: usize = 50;

/// Tunables injected into the engine at construction. No process-wide
/// state; two engines with different configs can coexist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of items the drug-module selector returns.
    pub target_item_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_item_count: DEFAULT_TARGET_ITEM_COUNT,
        }
    }
}

pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Initialize tracing for the embedding product. Call once at startup.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        )
        .init();

    tracing::info!("{} engine v{}", ENGINE_NAME, ENGINE_VERSION);
}
