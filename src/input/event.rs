//! Input events and the mutex-guarded buffer the reader thread fills.

use crate::error::{Error, Result};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(u8),
    Mouse { button: u16, released: bool, x: u16, y: u16 },
}

/// A `Mutex<Vec<InputEvent>>` with drain-swap semantics: draining installs a
/// freshly allocated, empty vector of the same capacity and hands the full
/// one back to the caller, rather than draining element by element under
/// the lock.
pub struct EventBuffer {
    events: Mutex<Vec<InputEvent>>,
    capacity: usize,
}

impl EventBuffer {
    pub fn new(capacity: usize) -> Self {
        EventBuffer { events: Mutex::new(Vec::with_capacity(capacity)), capacity }
    }

    /// Append one event. Returns `Error::AllocFailed` if growing the
    /// buffer past its current capacity fails — the event is dropped, and
    /// the caller (the reader thread) logs a warning and keeps reading.
    pub fn push(&self, event: InputEvent) -> Result<()> {
        let mut guard = self.events.lock().unwrap_or_else(|p| p.into_inner());
        if guard.len() == guard.capacity() {
            guard.try_reserve(self.capacity.max(1)).map_err(|_| Error::AllocFailed)?;
        }
        guard.push(event);
        Ok(())
    }

    /// Swap in a fresh, empty buffer and return everything collected since
    /// the last drain.
    pub fn drain(&self) -> Vec<InputEvent> {
        let mut guard = self.events.lock().unwrap_or_else(|p| p.into_inner());
        std::mem::replace(&mut *guard, Vec::with_capacity(self.capacity))
    }
}
