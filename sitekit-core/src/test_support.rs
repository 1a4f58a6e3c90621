//! Deterministic clocks and identifier generators for tests.

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicI64, AtomicU64, Ordering},
    },
};

use crate::{Clock, IdGenerator, Timestamp};

/// [`Clock`] that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Start the clock at `start` milliseconds.
    #[must_use]
    pub const fn starting_at(start: Timestamp) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    /// Move the clock forward by `millis`.
    pub fn advance(&self, millis: Timestamp) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// [`Clock`] that ticks one millisecond on every read.
#[derive(Debug, Default)]
pub struct TickingClock {
    now: AtomicI64,
}

impl TickingClock {
    /// Start the clock at `start` milliseconds.
    #[must_use]
    pub const fn starting_at(start: Timestamp) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }
}

impl Clock for TickingClock {
    fn now_millis(&self) -> Timestamp {
        self.now.fetch_add(1, Ordering::SeqCst)
    }
}

/// [`IdGenerator`] replaying a script, then falling back to `id-<n>`.
#[derive(Debug, Default)]
pub struct ScriptedIds {
    script: Mutex<VecDeque<String>>,
    counter: AtomicU64,
}

impl ScriptedIds {
    /// Replay `ids` in order before switching to sequential identifiers.
    #[must_use]
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(ids.into_iter().map(Into::into).collect()),
            counter: AtomicU64::new(0),
        }
    }

    /// Generate `id-1`, `id-2`, ... from the start.
    #[must_use]
    pub fn sequential() -> Self {
        Self::default()
    }
}

impl IdGenerator for ScriptedIds {
    fn generate(&self) -> String {
        let scripted = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());
        scripted.unwrap_or_else(|| {
            let next = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            format!("id-{next}")
        })
    }
}
