//! Storage layer: data directory resolution, TOML configuration, and the
//! remaining-time state store.

mod config;
mod store;

pub use config::Config;
pub use store::{MemoryStore, SqliteStore, StateStore};

use std::path::PathBuf;

/// Returns `~/.config/tickdown[-dev]/` based on TICKDOWN_ENV.
///
/// Set TICKDOWN_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TICKDOWN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tickdown-dev")
    } else {
        base_dir.join("tickdown")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
