//! The intent/notification boundary between the core and its presentation.
//!
//! A [`Session`] owns one countdown and one preset list. The presentation
//! layer forwards raw user input to the intents here and receives [`Event`]
//! notifications through the [`Notifier`] it passes in; scheduling of the
//! periodic tick stays entirely on the caller's side.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use log::{info, warn};

use crate::config::Config;
use crate::engine::{Countdown, State, Tick};
use crate::hooks::Hook;
use crate::presets::PresetStore;
use crate::time;
use crate::{Error, Event, Notifier, Summary};

/// Shown when the input to start a countdown is rejected
pub const MSG_INVALID_START: &str = "Por favor, introduce un número válido mayor que cero.";
/// Shown when the input to save a preset is rejected
pub const MSG_INVALID_SAVE: &str = "Por favor, introduce un número válido para guardar.";
/// Shown when a countdown is started over a running one
pub const MSG_ALREADY_COUNTING: &str = "Ya hay una cuenta atrás en marcha.";
/// Alert shown when a countdown runs out
pub const MSG_COMPLETED: &str = "¡El tiempo ha finalizado!";

/// A single countdown session
pub struct Session {
    config: Config,
    countdown: Countdown,
    presets: PresetStore,
    started_at: Option<DateTime<Local>>,
    last_summary: Option<Summary>,
}

impl Session {
    /// Create a session, preloading the preset list from the config.
    ///
    /// Seed entries go through the same validation as [`Session::add_preset`];
    /// invalid ones are logged and skipped.
    pub fn new(config: Config) -> Self {
        let mut presets = PresetStore::new();

        for seconds in config.presets.iter().copied() {
            if let Err(err) = presets.add(seconds) {
                warn!("Skipping configured preset: {}", err);
            }
        }

        Self {
            config,
            countdown: Countdown::new(),
            presets,
            started_at: None,
            last_summary: None,
        }
    }

    /// Start a countdown from raw user input.
    ///
    /// Returns whether a countdown actually began. Invalid input and a busy
    /// engine surface as [`Event::Error`] notifications rather than as
    /// `Err`; the `Result` is reserved for hook failures.
    pub fn start(&mut self, raw: &str, notifier: &mut dyn Notifier) -> Result<bool> {
        let seconds = match time::parse_seconds(raw) {
            Ok(seconds) => seconds,
            Err(err) => {
                notifier.notify(&Event::Error {
                    kind: err,
                    message: MSG_INVALID_START.to_string(),
                });

                return Ok(false);
            }
        };

        if let Err(err) = self.countdown.start(seconds) {
            let message = match err {
                Error::AlreadyCounting => MSG_ALREADY_COUNTING,
                Error::InvalidDuration { .. } => MSG_INVALID_START,
            };

            notifier.notify(&Event::Error {
                kind: err,
                message: message.to_string(),
            });

            return Ok(false);
        }

        self.started_at = Some(Local::now());

        info!("Countdown started for {} seconds", seconds);

        Hook::CountdownStart.run(&self.config.hooks_directory)?;

        Ok(true)
    }

    /// Advance the running countdown by one second and notify.
    ///
    /// A tick that arrives while no countdown is running is dropped, so a
    /// tick scheduled before a cancellation can never be observed after it.
    /// Completion emits exactly one [`Event::Completed`] and returns the
    /// engine to idle.
    pub fn tick(&mut self, notifier: &mut dyn Notifier) -> Result<()> {
        if self.countdown.state() != State::Running {
            return Ok(());
        }

        match self.countdown.tick() {
            Some(Tick::Progress) => {
                notifier.notify(&Event::Progress {
                    elapsed: self.countdown.elapsed_seconds(),
                    total: self.countdown.total_seconds(),
                    fraction: self.countdown.progress(),
                });
            }
            Some(Tick::Completed) => {
                let finished_at = Local::now();
                let summary = Summary {
                    total_seconds: self.countdown.total_seconds(),
                    started_at: self.started_at.take().unwrap_or(finished_at),
                    finished_at,
                };

                info!(
                    "Countdown completed after {} seconds",
                    summary.total_seconds
                );

                self.last_summary = Some(summary.clone());
                self.countdown.rearm();

                Hook::CountdownComplete.run(&self.config.hooks_directory)?;

                notifier.notify(&Event::Completed { summary });
            }
            None => {}
        }

        Ok(())
    }

    /// Cancel the running countdown, if any.
    ///
    /// Total: with nothing running this does nothing and emits nothing.
    /// An actual cancellation emits [`Event::Reset`] so the presentation
    /// layer can restore its idle display.
    pub fn cancel(&mut self, notifier: &mut dyn Notifier) -> Result<()> {
        if !self.countdown.cancel() {
            return Ok(());
        }

        self.started_at = None;

        info!("Countdown cancelled");

        Hook::CountdownCancel.run(&self.config.hooks_directory)?;

        notifier.notify(&Event::Reset);

        Ok(())
    }

    /// Save a preset from raw user input.
    ///
    /// On success returns the new entry's index and its selectable label.
    /// Invalid input surfaces as an [`Event::Error`] notification and
    /// returns `None`.
    pub fn add_preset(&mut self, raw: &str, notifier: &mut dyn Notifier) -> Option<(usize, String)> {
        let seconds = match time::parse_seconds(raw) {
            Ok(seconds) => seconds,
            Err(err) => {
                notifier.notify(&Event::Error {
                    kind: err,
                    message: MSG_INVALID_SAVE.to_string(),
                });

                return None;
            }
        };

        match self.presets.add(seconds) {
            Ok(index) => {
                info!("Saved preset {}: {} seconds", index, seconds);

                Some((index, PresetStore::label(seconds)))
            }
            Err(err) => {
                notifier.notify(&Event::Error {
                    kind: err,
                    message: MSG_INVALID_SAVE.to_string(),
                });

                None
            }
        }
    }

    /// Resolve a previously rendered preset label back to its duration,
    /// ready to feed into [`Session::start`].
    pub fn select_preset(&self, label: &str) -> Option<u32> {
        PresetStore::resolve(label)
    }

    pub fn is_running(&self) -> bool {
        self.countdown.state() == State::Running
    }

    pub fn state(&self) -> State {
        self.countdown.state()
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.countdown.elapsed_seconds()
    }

    pub fn total_seconds(&self) -> u32 {
        self.countdown.total_seconds()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.countdown.remaining_seconds()
    }

    pub fn progress(&self) -> f64 {
        self.countdown.progress()
    }

    pub fn presets(&self) -> &PresetStore {
        &self.presets
    }

    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval
    }

    pub fn default_duration(&self) -> Duration {
        self.config.default_duration
    }

    /// The summary of the most recently completed countdown, if any.
    pub fn last_summary(&self) -> Option<&Summary> {
        self.last_summary.as_ref()
    }
}
