//! Crossover operators.
//!
//! Both operators build a trial vector from a target chromosome and a donor
//! (mutant) chromosome. They are stateless: all randomness comes from the
//! generator passed in, so independent workers can call them concurrently.

use crate::rng::RandomNumberGenerator;

/// The crossover operator used to combine a target with its donor.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Crossover {
    /// Independent per-gene choice with one forced donor gene.
    #[default]
    Binomial,
    /// One contiguous (wrapping) run of donor genes.
    Exponential,
}

impl Crossover {
    pub fn apply(
        &self,
        target: &[f64],
        donor: &[f64],
        crossover_rate: f64,
        rng: &mut RandomNumberGenerator,
    ) -> Vec<f64> {
        match self {
            Self::Binomial => binary_crossover(target, donor, crossover_rate, rng),
            Self::Exponential => exponential_crossover(target, donor, crossover_rate, rng),
        }
    }
}

/// Binomial crossover.
///
/// Gene `j` comes from the donor if a uniform draw falls below `crossover_rate`
/// or if `j` is the randomly chosen forced index, so the trial always carries
/// at least one donor gene.
pub fn binary_crossover(
    target: &[f64],
    donor: &[f64],
    crossover_rate: f64,
    rng: &mut RandomNumberGenerator,
) -> Vec<f64> {
    debug_assert_eq!(target.len(), donor.len());
    let forced = rng.uniform_index(target.len());
    target
        .iter()
        .zip(donor)
        .enumerate()
        .map(|(j, (&t, &d))| {
            if j == forced || rng.probability() < crossover_rate {
                d
            } else {
                t
            }
        })
        .collect()
}

/// Exponential crossover.
///
/// Copies a run of `L` consecutive donor genes starting at a random index and
/// wrapping around the end of the chromosome. `L` starts at one and grows while
/// a uniform draw falls below `crossover_rate`, up to the full length.
pub fn exponential_crossover(
    target: &[f64],
    donor: &[f64],
    crossover_rate: f64,
    rng: &mut RandomNumberGenerator,
) -> Vec<f64> {
    debug_assert_eq!(target.len(), donor.len());
    let dimension = target.len();
    let start = rng.uniform_index(dimension);
    let mut length = 1;
    while length < dimension && rng.probability() < crossover_rate {
        length += 1;
    }

    let mut trial = target.to_vec();
    for j in start..start + length {
        trial[j % dimension] = donor[j % dimension];
    }
    trial
}
