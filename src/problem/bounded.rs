use std::fmt;

use super::Objective;
use crate::{
    error::{EvolutionError, Result},
    rng::RandomNumberGenerator,
};

/// How [`BoundedProblem::constrain`] repairs a gene that left its interval.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Replace the gene with a uniform draw from its interval.
    #[default]
    Resample,
    /// Move the gene to the nearest bound.
    Clip,
}

/// # BoundedProblem
///
/// An [`Objective`] built from a fitness function and one `[lower, upper]`
/// interval per gene. Random chromosomes are drawn uniformly inside the box and
/// genes that leave their interval are repaired according to the
/// [`BoundaryPolicy`].
///
/// ## Example
///
/// ```rust
/// use adaptive_de::problem::{BoundedProblem, Objective};
///
/// let problem = BoundedProblem::uniform(3, -5.12, 5.12, |x: &[f64]| {
///     x.iter().map(|v| v * v).sum()
/// })
/// .unwrap();
///
/// assert_eq!(problem.number_of_genes(), 3);
/// assert_eq!(problem.fitness(&[1.0, 2.0, 0.0]), 5.0);
/// ```
pub struct BoundedProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    bounds: Vec<(f64, f64)>,
    policy: BoundaryPolicy,
    function: F,
}

impl<F> BoundedProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    /// Creates a problem with an explicit interval for each gene.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if `bounds` is empty, or if any interval
    /// is not finite or has `lower > upper`.
    pub fn new(bounds: Vec<(f64, f64)>, function: F) -> Result<Self> {
        if bounds.is_empty() {
            return Err(EvolutionError::Configuration(
                "A bounded problem needs at least one gene".to_string(),
            ));
        }

        if let Some((index, (lower, upper))) = bounds
            .iter()
            .enumerate()
            .find(|(_, (l, u))| !l.is_finite() || !u.is_finite() || l > u)
        {
            return Err(EvolutionError::Configuration(format!(
                "Invalid bounds for gene {}: [{}, {}]",
                index, lower, upper
            )));
        }

        Ok(Self {
            bounds,
            policy: BoundaryPolicy::default(),
            function,
        })
    }

    /// Creates a problem whose genes all share the interval `[lower, upper]`.
    pub fn uniform(dimension: usize, lower: f64, upper: f64, function: F) -> Result<Self> {
        Self::new(vec![(lower, upper); dimension], function)
    }

    /// Sets the repair policy used by `constrain`.
    pub fn with_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// Returns `true` if every gene of `chromosome` lies inside its interval.
    pub fn contains(&self, chromosome: &[f64]) -> bool {
        chromosome.len() == self.bounds.len()
            && chromosome
                .iter()
                .zip(&self.bounds)
                .all(|(gene, (lower, upper))| (*lower..=*upper).contains(gene))
    }
}

impl<F> Objective for BoundedProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn number_of_genes(&self) -> usize {
        self.bounds.len()
    }

    fn randomize(&self, chromosome: &mut [f64], rng: &mut RandomNumberGenerator) {
        debug_assert_eq!(chromosome.len(), self.bounds.len());
        for (gene, &(lower, upper)) in chromosome.iter_mut().zip(&self.bounds) {
            *gene = rng.uniform(lower, upper);
        }
    }

    fn constrain(&self, chromosome: &mut [f64], rng: &mut RandomNumberGenerator) {
        debug_assert_eq!(chromosome.len(), self.bounds.len());
        for (gene, &(lower, upper)) in chromosome.iter_mut().zip(&self.bounds) {
            // NaN genes fail the range check and get repaired as well
            if (lower..=upper).contains(&*gene) {
                continue;
            }
            *gene = match self.policy {
                BoundaryPolicy::Resample => rng.uniform(lower, upper),
                BoundaryPolicy::Clip if *gene > upper => upper,
                BoundaryPolicy::Clip => lower,
            };
        }
    }

    fn fitness(&self, chromosome: &[f64]) -> f64 {
        (self.function)(chromosome)
    }
}

impl<F> fmt::Debug for BoundedProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedProblem")
            .field("bounds", &self.bounds)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
