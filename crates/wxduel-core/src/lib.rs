//! Core foundation for wxduel
//!
//! Provides configuration, error types, the injected clock, persistent
//! key-value storage, and a generic expiring cache shared by the other
//! crates.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod storage;

pub use cache::ExpiringCache;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BattleConfig, Config, ForecastConfig, LocationConfig, ValidationResult};
pub use error::{ConfigError, StorageError};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("wxduel core initialized");
    Ok(())
}
