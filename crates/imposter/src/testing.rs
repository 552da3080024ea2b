//! Deterministic word and seat sources for tests.
//!
//! Plug these into [`SessionRegistry::with_sources`] to assert exact
//! outcomes (a known imposter, a known word) instead of statistical ones.
//!
//! [`SessionRegistry::with_sources`]: crate::registry::SessionRegistry::with_sources

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::words::{ImposterPicker, WordSource};

/// Always draws the same word.
#[derive(Debug)]
pub struct FixedWord(pub &'static str);

impl WordSource for FixedWord {
    fn draw(&self) -> String {
        self.0.to_string()
    }
}

/// Always picks the same seat.
#[derive(Debug)]
pub struct FixedSeat(pub usize);

impl ImposterPicker for FixedSeat {
    fn pick(&self, _count: usize) -> usize {
        self.0
    }
}

/// Picks seats from a script, one per round, then seat 0 once exhausted.
#[derive(Debug)]
pub struct ScriptedSeats {
    seats: Mutex<VecDeque<usize>>,
}

impl ScriptedSeats {
    #[must_use]
    pub fn new(seats: impl IntoIterator<Item = usize>) -> Self {
        Self {
            seats: Mutex::new(seats.into_iter().collect()),
        }
    }
}

impl ImposterPicker for ScriptedSeats {
    fn pick(&self, _count: usize) -> usize {
        self.seats
            .lock()
            .expect("seat script mutex poisoned")
            .pop_front()
            .unwrap_or(0)
    }
}
