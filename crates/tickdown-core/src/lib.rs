//! # Tickdown Core Library
//!
//! This library provides the core logic for the Tickdown countdown/count-up
//! timer widget. It is host-agnostic: rendering and persistence sit behind
//! small traits, and the host supplies the tick cadence. The CLI binary is
//! a thin terminal host over the same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a caller-driven state machine that requires the host
//!   to invoke `tick()` at the cadence reported by
//!   [`TimerOptions::tick_interval`]
//! - **Clock Formatter**: pure `HH:MM:SS[.fff]` rendering of a seconds count
//! - **Storage**: SQLite-backed key-value store for remaining-time
//!   persistence and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine bound to a [`RenderTarget`]
//! - [`TimerOptions`]: validated engine configuration
//! - [`StateStore`]: remaining-time persistence channel
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod format;
pub mod render;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, TimerError, UsageError};
pub use events::{Advisory, Event, EventKind};
pub use render::{RenderTarget, TextSurface};
pub use storage::{Config, MemoryStore, SqliteStore, StateStore};
pub use timer::{Direction, Outcome, Phase, Tick, TimerEngine, TimerOptions};
