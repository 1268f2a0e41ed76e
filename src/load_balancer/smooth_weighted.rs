//! Smooth weighted round-robin selection.
//!
//! Every `select` adds each entry's weight to its accumulator, picks the
//! largest accumulator and subtracts the total weight from the winner. Over
//! any window of `sum(weights)` picks each entry is chosen exactly `weight`
//! times, interleaved as evenly as the weights allow.

use parking_lot::Mutex;
use std::collections::BTreeSet;

use crate::load_balancer::{Balancer, RegistryError};

#[derive(Debug)]
struct Entry {
    id: String,
    weight: i64,
    current: i64,
}

#[derive(Debug, Default)]
struct State {
    /// Registration order; ties go to the earliest entry.
    entries: Vec<Entry>,
    total: i64,
}

impl State {
    /// Membership changed: restart the cycle from a clean slate.
    fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.current = 0;
        }
    }
}

/// Smooth weighted round-robin registry.
///
/// All operations run under a single lock, since `select` mutates the
/// accumulators.
#[derive(Debug, Default)]
pub struct SmoothWeighted {
    state: Mutex<State>,
}

impl SmoothWeighted {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Balancer for SmoothWeighted {
    fn add(&self, id: &str, weight: i32) -> Result<(), RegistryError> {
        if weight <= 0 {
            return Err(RegistryError::InvalidWeight {
                id: id.to_string(),
                weight,
            });
        }

        let mut state = self.state.lock();
        if state.entries.iter().any(|e| e.id == id) {
            return Err(RegistryError::DuplicateId(id.to_string()));
        }

        state.entries.push(Entry {
            id: id.to_string(),
            weight: i64::from(weight),
            current: 0,
        });
        state.total += i64::from(weight);
        state.reset();
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), RegistryError> {
        let mut state = self.state.lock();
        let index = state
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        let removed = state.entries.remove(index);
        state.total -= removed.weight;
        state.reset();
        Ok(())
    }

    fn select(&self) -> Option<String> {
        let mut state = self.state.lock();
        let total = state.total;

        let mut best: Option<usize> = None;
        for i in 0..state.entries.len() {
            let entry = &mut state.entries[i];
            entry.current += entry.weight;
            let current = entry.current;
            if best.map_or(true, |b| current > state.entries[b].current) {
                best = Some(i);
            }
        }

        let winner = &mut state.entries[best?];
        winner.current -= total;
        Some(winner.id.clone())
    }

    fn ids(&self) -> BTreeSet<String> {
        self.state
            .lock()
            .entries
            .iter()
            .map(|e| e.id.clone())
            .collect()
    }
}
