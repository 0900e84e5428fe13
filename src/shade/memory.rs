//! # Success-history memory
//!
//! SHADE adapts its crossover rate `Cr` and scale factor `F` from a circular
//! memory of `H` parameter means. Each trial draws its parameters around a
//! randomly chosen slot; once per generation, the parameters of the trials that
//! strictly improved on their parent are folded into one slot with a weighted
//! Lehmer mean.

use crate::{error::Result, rng::RandomNumberGenerator};

/// Initial value of every memory slot.
pub const INITIAL_MEAN: f64 = 0.5;
/// Spread of the normal (`Cr`) and Cauchy (`F`) parameter distributions.
pub const PARAMETER_SPREAD: f64 = 0.1;

/// A crossover-rate memory slot.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossoverMean {
    Mean(f64),
    /// The slot only produces `Cr = 0`. Once terminal, a slot stays terminal.
    Terminal,
}

impl CrossoverMean {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal)
    }
}

/// The parameters and fitness improvements of one generation's successful trials.
#[derive(Debug, Clone, Default)]
pub struct SuccessSet {
    crossover_rates: Vec<f64>,
    scale_factors: Vec<f64>,
    improvements: Vec<f64>,
}

impl SuccessSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, crossover_rate: f64, scale_factor: f64, improvement: f64) {
        self.crossover_rates.push(crossover_rate);
        self.scale_factors.push(scale_factor);
        self.improvements.push(improvement);
    }

    pub fn len(&self) -> usize {
        self.improvements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.improvements.is_empty()
    }

    pub fn clear(&mut self) {
        self.crossover_rates.clear();
        self.scale_factors.clear();
        self.improvements.clear();
    }

    pub fn crossover_rates(&self) -> &[f64] {
        &self.crossover_rates
    }

    pub fn scale_factors(&self) -> &[f64] {
        &self.scale_factors
    }

    pub fn improvements(&self) -> &[f64] {
        &self.improvements
    }

    /// Normalized weights `|Δf| / Σ|Δf|`.
    ///
    /// Falls back to equal weights when the sum is not a finite positive number,
    /// which happens when a parent with infinite fitness was improved upon.
    pub fn weights(&self) -> Vec<f64> {
        let total: f64 = self.improvements.iter().map(|d| d.abs()).sum();
        if total.is_finite() && total > 0.0 {
            self.improvements.iter().map(|d| d.abs() / total).collect()
        } else {
            vec![1.0 / self.len() as f64; self.len()]
        }
    }
}

/// Weighted Lehmer mean `Σw·v² / Σw·v`.
///
/// Returns 0 when `Σw·v` is zero.
pub fn weighted_lehmer_mean(weights: &[f64], values: &[f64]) -> f64 {
    assert_eq!(weights.len(), values.len(), "weights and values differ in length");
    let (numerator, denominator) = weights
        .iter()
        .zip(values)
        .fold((0.0, 0.0), |(num, den), (w, v)| (num + w * v * v, den + w * v));
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Circular memory of `H` crossover-rate and scale-factor means.
#[derive(Debug, Clone)]
pub struct SuccessHistoryMemory {
    crossover: Vec<CrossoverMean>,
    scale: Vec<f64>,
}

impl SuccessHistoryMemory {
    /// Creates a memory of `size` slots, all at 0.5.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "memory needs at least one slot");
        Self {
            crossover: vec![CrossoverMean::Mean(INITIAL_MEAN); size],
            scale: vec![INITIAL_MEAN; size],
        }
    }

    pub fn size(&self) -> usize {
        self.scale.len()
    }

    pub fn crossover_means(&self) -> &[CrossoverMean] {
        &self.crossover
    }

    pub fn scale_means(&self) -> &[f64] {
        &self.scale
    }

    /// Picks a random slot index.
    pub fn random_slot(&self, rng: &mut RandomNumberGenerator) -> usize {
        rng.uniform_index(self.size())
    }

    /// Draws a crossover rate from slot `slot`: 0 if the slot is terminal,
    /// otherwise `Normal(mean, 0.1)` clipped to `[0, 1]`.
    pub fn crossover_rate(&self, slot: usize, rng: &mut RandomNumberGenerator) -> Result<f64> {
        match self.crossover[slot] {
            CrossoverMean::Terminal => Ok(0.0),
            CrossoverMean::Mean(mean) => Ok(rng.normal(mean, PARAMETER_SPREAD)?.clamp(0.0, 1.0)),
        }
    }

    /// Draws a scale factor from slot `slot`: `Cauchy(mean, 0.1)`, resampled while
    /// not positive and truncated to 1 above 1.
    pub fn scale_factor(&self, slot: usize, rng: &mut RandomNumberGenerator) -> Result<f64> {
        let mean = self.scale[slot];
        loop {
            let f = rng.cauchy(mean, PARAMETER_SPREAD)?;
            if f > 1.0 {
                return Ok(1.0);
            }
            if f > 0.0 {
                return Ok(f);
            }
        }
    }

    /// Folds `successes` into slot `slot`. An empty success set changes nothing.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    pub fn update(&mut self, successes: &SuccessSet, slot: usize) {
        assert!(slot < self.size(), "memory slot {} out of range", slot);
        if successes.is_empty() {
            return;
        }

        let weights = successes.weights();
        let max_crossover = successes
            .crossover_rates()
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);

        self.crossover[slot] = if self.crossover[slot].is_terminal() || max_crossover == 0.0 {
            CrossoverMean::Terminal
        } else {
            CrossoverMean::Mean(weighted_lehmer_mean(&weights, successes.crossover_rates()))
        };
        self.scale[slot] = weighted_lehmer_mean(&weights, successes.scale_factors());
    }
}
