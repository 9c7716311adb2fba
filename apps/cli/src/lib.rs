//! Command-line host for recall question authoring.
//!
//! Stores notes in a local SQLite collection and images in a media folder
//! next to it.

pub mod commands;
pub mod config;
pub mod db;
pub mod fetch;
pub mod media;
pub mod state;

pub use config::{Config, ConfigArgs};
pub use state::AppState;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
