//! Timer engine implementation.
//!
//! The engine is a caller-driven state machine. It does not schedule
//! anything itself - the host invokes `tick()` at the cadence reported by
//! [`TimerOptions::tick_interval`]. Because `tick()` only acts in the
//! Playing phase, a pause or stop that lands between interval firings makes
//! the next tick a no-op; there is no cancellation race to manage.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -(initialize/reset)-> Playing | Paused
//! Paused -(play)-> Playing -(pause)-> Paused
//! any running -(stop | expiry)-> Stopped
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(options, surface)?;
//! engine.initialize()?;
//! // At every interval firing:
//! engine.tick(); // Returns Tick::Expired when the clock runs out
//! ```

use std::rc::Rc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConfigError, UsageError};
use crate::events::{Advisory, Event, EventKind};
use crate::format::{format_clock, placeholder};
use crate::render::RenderTarget;
use crate::storage::StateStore;

use super::options::TimerOptions;

/// Externally observable run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Stopped,
    Paused,
    Playing,
}

/// Which way the clock is moving. Only bounce mode ever counts up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

impl Direction {
    fn flipped(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }
}

/// What a command did.
#[derive(Debug)]
pub enum Outcome {
    /// The transition happened; listeners for it have already run.
    Changed(Event),
    /// Nothing changed; a user-facing notice explains why.
    Notice(Advisory),
}

/// What a tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Not playing; nothing moved.
    Idle,
    /// Time advanced and the clock was redrawn.
    Advanced,
    /// The clock ran out (non-bounce). Carries the URL the host should
    /// navigate to after a one-second delay, when redirect is configured.
    Expired { redirect: Option<String> },
}

type Listener = Box<dyn FnMut(&Event)>;

#[derive(Default)]
struct Listeners {
    play: Vec<Listener>,
    pause: Vec<Listener>,
    stop: Vec<Listener>,
    reset: Vec<Listener>,
}

impl Listeners {
    fn for_kind(&mut self, kind: EventKind) -> &mut Vec<Listener> {
        match kind {
            EventKind::Play => &mut self.play,
            EventKind::Pause => &mut self.pause,
            EventKind::Stop => &mut self.stop,
            EventKind::Reset => &mut self.reset,
        }
    }
}

/// Core timer engine bound to one render target.
///
/// Single-use per mount: construct, `initialize()` once, feed `tick()`
/// until done. Dropping the engine is teardown - no tick can fire
/// afterwards, and a replacement engine gets its own storage identifier
/// unless the configuration pins one.
pub struct TimerEngine<R: RenderTarget> {
    options: TimerOptions,
    target: R,
    store: Option<Rc<dyn StateStore>>,
    storage_id: String,
    listeners: Listeners,
    phase: Phase,
    direction: Direction,
    remaining_secs: f64,
    initialized: bool,
    low_marked: bool,
}

impl<R: RenderTarget> TimerEngine<R> {
    /// Validate `options` and bind the engine to `target`.
    ///
    /// Draws the all-zero placeholder face immediately so the surface is
    /// never blank between mount and first tick.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when the options violate an invariant;
    /// no engine is built in that case.
    pub fn new(options: TimerOptions, mut target: R) -> Result<Self, ConfigError> {
        options.validate()?;
        target.set_text(&placeholder(options.show_fraction, options.fraction_digits));
        let storage_id = options
            .storage_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        Ok(Self {
            options,
            target,
            store: None,
            storage_id,
            listeners: Listeners::default(),
            phase: Phase::Stopped,
            direction: Direction::Down,
            remaining_secs: 0.0,
            initialized: false,
            low_marked: false,
        })
    }

    /// Attach the persistence channel. Without one, `persist` behaves as
    /// if storage were unavailable and the engine runs in memory only.
    pub fn with_store(mut self, store: Rc<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn remaining_secs(&self) -> f64 {
        self.remaining_secs
    }

    pub fn options(&self) -> &TimerOptions {
        &self.options
    }

    /// The identifier this engine persists under.
    pub fn storage_id(&self) -> &str {
        &self.storage_id
    }

    /// The surface this engine draws on.
    pub fn target(&self) -> &R {
        &self.target
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Put the configured time on the clock, restore persisted state, and
    /// start: Playing when `auto_play` is set, Paused otherwise.
    ///
    /// # Errors
    /// Fails with [`UsageError::AlreadyInitialized`] on a second call; an
    /// engine is single-use per mount.
    pub fn initialize(&mut self) -> Result<(), UsageError> {
        if self.initialized {
            return Err(UsageError::AlreadyInitialized);
        }
        self.initialized = true;

        self.remaining_secs = self.options.total_secs;
        if let Some(store) = self.store.clone() {
            if self.options.persist {
                if let Some(prev) = store.load(&self.storage_id) {
                    self.remaining_secs = prev;
                }
            } else {
                // A stale value under this identifier would leak into a
                // later mount that re-enables persistence.
                store.clear(&self.storage_id);
            }
        }

        self.redraw();
        if self.options.auto_play {
            self.transition(
                Phase::Playing,
                Event::Played {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                },
            );
        } else {
            self.transition(
                Phase::Paused,
                Event::Paused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                },
            );
        }
        Ok(())
    }

    /// Register a listener for one event kind. Listeners run
    /// synchronously, in registration order, whenever that kind's
    /// transition occurs.
    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&Event) + 'static) {
        self.listeners.for_kind(kind).push(Box::new(listener));
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Resume a paused clock.
    pub fn play(&mut self) -> Outcome {
        if self.phase != Phase::Paused {
            return Outcome::Notice(Advisory::CannotResume);
        }
        let event = self.transition(
            Phase::Playing,
            Event::Played {
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            },
        );
        Outcome::Changed(event)
    }

    /// Freeze the clock at its current value.
    pub fn pause(&mut self) -> Outcome {
        if self.phase == Phase::Stopped {
            return Outcome::Notice(Advisory::AlreadyStopped);
        }
        let event = self.transition(
            Phase::Paused,
            Event::Paused {
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            },
        );
        Outcome::Changed(event)
    }

    /// Halt the clock and zero it out.
    pub fn stop(&mut self) -> Outcome {
        if self.phase == Phase::Stopped {
            return Outcome::Notice(Advisory::AlreadyStopped);
        }
        self.remaining_secs = 0.0;
        self.redraw();
        let event = self.transition(
            Phase::Stopped,
            Event::Stopped {
                expired: false,
                at: Utc::now(),
            },
        );
        Outcome::Changed(event)
    }

    /// Put the full time back on the clock. Restarts ticking when
    /// `auto_play` is set, otherwise leaves the clock paused on the fresh
    /// value.
    pub fn reset(&mut self) -> Outcome {
        self.remaining_secs = self.options.total_secs;
        self.direction = Direction::Down;
        self.redraw();
        let next = if self.options.auto_play {
            Phase::Playing
        } else {
            Phase::Paused
        };
        let event = self.transition(
            next,
            Event::Reset {
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            },
        );
        Outcome::Changed(event)
    }

    // ── Tick ─────────────────────────────────────────────────────────

    /// Advance the clock by one tick unit. Call at the cadence given by
    /// [`TimerOptions::tick_interval`]; outside the Playing phase this is
    /// a no-op.
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::Playing {
            return Tick::Idle;
        }

        let unit = self.options.tick_unit_secs();
        match self.direction {
            Direction::Down => self.remaining_secs -= unit,
            Direction::Up => self.remaining_secs += unit,
        }
        // Pin the value back onto the tick grid so float error cannot
        // accumulate across many ticks.
        self.remaining_secs = round_to(self.remaining_secs, self.options.digits());

        self.redraw();

        if !self.options.bounce && self.remaining_secs <= 0.0 {
            self.remaining_secs = 0.0;
            let redirect = self
                .options
                .redirect
                .then(|| self.options.redirect_url.clone())
                .flatten();
            self.transition(
                Phase::Stopped,
                Event::Stopped {
                    expired: true,
                    at: Utc::now(),
                },
            );
            return Tick::Expired { redirect };
        }

        if self.options.bounce {
            let at_floor = self.direction == Direction::Down && self.remaining_secs == 0.0;
            let at_ceiling =
                self.direction == Direction::Up && self.remaining_secs >= self.options.total_secs;
            if at_floor || at_ceiling {
                self.direction = self.direction.flipped();
            }
        }

        Tick::Advanced
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn transition(&mut self, phase: Phase, event: Event) -> Event {
        self.phase = phase;
        self.notify(&event);
        event
    }

    fn notify(&mut self, event: &Event) {
        for listener in self.listeners.for_kind(event.kind()).iter_mut() {
            listener(event);
        }
    }

    fn redraw(&mut self) {
        let text = format_clock(
            self.remaining_secs,
            self.options.show_fraction,
            self.options.fraction_digits,
        );
        self.target.set_text(&text);
        self.apply_low_marker();
        self.persist_remaining();
    }

    fn apply_low_marker(&mut self) {
        let Some(low) = self.options.low_secs else {
            return;
        };
        let is_low = self.remaining_secs <= low;
        if is_low == self.low_marked {
            return; // the marker already reflects the clock
        }
        self.low_marked = is_low;
        self.target.set_low_marker(is_low);
        if self.options.paint_low_color {
            if is_low {
                self.target.set_color(self.options.low_color.as_deref());
            } else {
                self.target.set_color(None);
            }
        }
    }

    fn persist_remaining(&self) {
        if !self.options.persist || self.remaining_secs < 0.0 {
            return;
        }
        if let Some(store) = &self.store {
            store.save(&self.storage_id, self.remaining_secs);
        }
    }
}

fn round_to(value: f64, digits: u8) -> f64 {
    let scale = 10f64.powi(i32::from(digits));
    (value * scale).round() / scale
}
