//! # External archive
//!
//! Parents displaced by strictly improving trials, kept as extra `r2` donors.

use crate::rng::RandomNumberGenerator;

/// Bounded pool of parent chromosomes displaced by strictly improving trials.
///
/// Entries carry no fitness: they are only used as extra donors by the
/// current-to-pbest/1 mutation. Once the archive is full, a new entry overwrites
/// a uniformly chosen existing one.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: Vec<Vec<f64>>,
    capacity: usize,
}

impl Archive {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> &[f64] {
        &self.entries[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.entries.iter().map(Vec::as_slice)
    }

    /// Adds `chromosome`, overwriting a random entry when the archive is full.
    pub fn insert(&mut self, chromosome: Vec<f64>, rng: &mut RandomNumberGenerator) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            let slot = rng.uniform_index(self.entries.len());
            self.entries[slot] = chromosome;
        } else {
            self.entries.push(chromosome);
        }
    }

    /// Changes the capacity, dropping the newest entries if the archive is oversized.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.entries.truncate(capacity);
    }
}
