use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four externally observable transitions. Listener registration is
/// keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Play,
    Pause,
    Stop,
    Reset,
}

/// Every state transition produces an Event. Hosts print or forward them;
/// registered listeners receive them synchronously.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Played {
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    Stopped {
        /// True when the clock ran out on its own rather than being
        /// stopped by a command.
        expired: bool,
        at: DateTime<Utc>,
    },
    Reset {
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Played { .. } => EventKind::Play,
            Event::Paused { .. } => EventKind::Pause,
            Event::Stopped { .. } => EventKind::Stop,
            Event::Reset { .. } => EventKind::Reset,
        }
    }
}

/// Non-fatal notice produced by a command that did not change state.
///
/// These are user-facing ("the timer is already stopped"), never errors:
/// the engine is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// `play` is only valid from the Paused phase. A stopped clock is
    /// restarted with `reset`; a playing one is already running.
    CannotResume,
    /// `pause` or `stop` on a clock that is already stopped.
    AlreadyStopped,
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::CannotResume => write!(f, "cannot resume the timer"),
            Advisory::AlreadyStopped => write!(f, "the timer is already stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_mapping() {
        let event = Event::Stopped {
            expired: true,
            at: Utc::now(),
        };
        assert_eq!(event.kind(), EventKind::Stop);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::Played {
            remaining_secs: 42.5,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Played");
        assert_eq!(json["remaining_secs"], 42.5);
    }
}
