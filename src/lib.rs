//! Core of a single-window countdown timer: a state machine that advances
//! once per second, and a list of saved durations for quick reuse.
//!
//! The presentation layer drives the core through [`Session`] intents and
//! receives [`Event`] notifications through a [`Notifier`] it supplies.

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

pub mod config;
pub mod engine;
pub mod hooks;
pub mod presets;
pub mod session;
pub mod time;

pub use config::Config;
pub use engine::{Countdown, State, Tick};
pub use presets::PresetStore;
pub use session::Session;

/// Why an intent was rejected
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Error {
    /// The input did not parse as a positive number of seconds
    InvalidDuration { input: String },
    /// A countdown is already running
    AlreadyCounting,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDuration { input } => {
                write!(f, "not a positive number of seconds: {:?}", input)
            }
            Error::AlreadyCounting => write!(f, "a countdown is already running"),
        }
    }
}

impl std::error::Error for Error {}

/// Final accounting for a countdown that ran out
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub total_seconds: u32,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

/// Notifications pushed to the presentation layer
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A running countdown advanced by one second.
    ///
    /// `fraction` is `elapsed / total` and stays below 1; the final tick
    /// emits [`Event::Completed`] instead.
    Progress { elapsed: u32, total: u32, fraction: f64 },
    /// The countdown reached its full duration. Emitted exactly once per
    /// countdown.
    Completed { summary: Summary },
    /// The countdown was cancelled and the idle display should be restored.
    Reset,
    /// An intent was rejected. `message` is the user-facing text.
    Error { kind: Error, message: String },
}

/// Push-model sink for [`Event`] notifications.
///
/// The core never schedules anything itself; whoever drives the session
/// decides where events go and when ticks happen.
pub trait Notifier {
    fn notify(&mut self, event: &Event);
}

/// Buffers events instead of rendering them. Handy in tests.
impl Notifier for Vec<Event> {
    fn notify(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn progress_event_to_json() {
        let event = Event::Progress {
            elapsed: 30,
            total: 120,
            fraction: 0.25,
        };

        let json = serde_json::to_string(&event).unwrap();

        assert_eq!(
            json,
            r#"{"event":"progress","elapsed":30,"total":120,"fraction":0.25}"#
        );
    }

    #[test]
    fn reset_event_to_json() {
        let json = serde_json::to_string(&Event::Reset).unwrap();

        assert_eq!(json, r#"{"event":"reset"}"#);
    }

    #[test]
    fn error_event_to_json() {
        let event = Event::Error {
            kind: Error::InvalidDuration {
                input: "abc".to_string(),
            },
            message: "mensaje".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();

        assert_eq!(
            json,
            r#"{"event":"error","kind":{"code":"invalid_duration","input":"abc"},"message":"mensaje"}"#
        );
    }

    #[test]
    fn vec_notifier_records_events() {
        let mut events: Vec<Event> = Vec::new();

        events.notify(&Event::Reset);

        assert_eq!(events, vec![Event::Reset]);
    }
}
