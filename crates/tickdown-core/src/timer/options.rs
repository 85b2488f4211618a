//! Engine configuration and validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Engine configuration. Immutable once handed to an engine.
///
/// Every field deserializes with a default so a partial `[timer]` table in
/// the config file works; [`TimerOptions::validate`] enforces the
/// cross-field rules before an engine will accept the options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerOptions {
    /// Initial time on the clock, in seconds.
    #[serde(default = "default_total_secs")]
    pub total_secs: f64,
    /// Remaining-time boundary at or below which the low-time marker is
    /// set on the render target.
    #[serde(default)]
    pub low_secs: Option<f64>,
    /// Color applied to the face while the low-time marker is set.
    #[serde(default = "default_low_color")]
    pub low_color: Option<String>,
    /// Paint `low_color` from the engine. Leave false to style off the
    /// marker alone.
    #[serde(default)]
    pub paint_low_color: bool,
    /// Reverse direction at the bounds instead of stopping.
    #[serde(default)]
    pub bounce: bool,
    /// Navigate to `redirect_url` when the clock expires.
    #[serde(default)]
    pub redirect: bool,
    #[serde(default)]
    pub redirect_url: Option<String>,
    /// Persist the remaining time across mounts.
    #[serde(default)]
    pub persist: bool,
    /// Storage identifier. Generated per engine when absent, so two timers
    /// never collide on a shared key.
    #[serde(default)]
    pub storage_id: Option<String>,
    /// Show fractional seconds on the face.
    #[serde(default)]
    pub show_fraction: bool,
    /// Fractional digits, 1-3. Three is legal but drives a 1 ms tick;
    /// prefer 1 or 2.
    #[serde(default = "default_fraction_digits")]
    pub fraction_digits: u8,
    /// Start ticking immediately at initialize/reset.
    #[serde(default = "default_true")]
    pub auto_play: bool,
}

fn default_total_secs() -> f64 {
    900.0
}
fn default_low_color() -> Option<String> {
    Some("red".into())
}
fn default_fraction_digits() -> u8 {
    1
}
fn default_true() -> bool {
    true
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            total_secs: default_total_secs(),
            low_secs: None,
            low_color: default_low_color(),
            paint_low_color: false,
            bounce: false,
            redirect: false,
            redirect_url: None,
            persist: false,
            storage_id: None,
            show_fraction: false,
            fraction_digits: default_fraction_digits(),
            auto_play: true,
        }
    }
}

impl TimerOptions {
    /// Check the cross-field invariants.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.total_secs.is_finite() || self.total_secs <= 0.0 {
            return Err(invalid("total_secs", "must be a positive number of seconds"));
        }
        if let Some(low) = self.low_secs {
            if !low.is_finite() || low < 0.0 || low >= self.total_secs {
                return Err(invalid("low_secs", "must be >= 0 and below total_secs"));
            }
        }
        if let Some(color) = &self.low_color {
            if color.trim().is_empty() {
                return Err(invalid("low_color", "must not be empty"));
            }
        }
        if let Some(url) = &self.redirect_url {
            if Url::parse(url).is_err() {
                return Err(invalid("redirect_url", "must be an absolute URL"));
            }
        }
        if !(1..=3).contains(&self.fraction_digits) {
            return Err(invalid("fraction_digits", "must be between 1 and 3"));
        }
        Ok(())
    }

    /// Digits drawn after the decimal point: 0 when fractions are off.
    pub fn digits(&self) -> u8 {
        if self.show_fraction {
            self.fraction_digits
        } else {
            0
        }
    }

    /// Seconds moved per tick: 1 for a whole-second clock, 10^-digits
    /// otherwise.
    pub fn tick_unit_secs(&self) -> f64 {
        1.0 / 10f64.powi(i32::from(self.digits()))
    }

    /// The cadence a host should drive `tick()` at.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(self.tick_unit_secs())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.into(),
        message: message.into(),
    }
}
