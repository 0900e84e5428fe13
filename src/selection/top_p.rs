//! # Top-p cache

use crate::population::Population;

/// The indices of the `p` best individuals, best first.
///
/// The cache is refreshed once at the start of every generation and is then
/// read-only for the rest of it: replacements committed during the generation
/// do not change which individuals are eligible as `pbest`.
///
/// # Examples
///
/// ```
/// use adaptive_de::population::{FitnessGoal, Population};
/// use adaptive_de::problem::{functions::sphere, BoundedProblem};
/// use adaptive_de::rng::RandomNumberGenerator;
/// use adaptive_de::selection::TopPCache;
///
/// let problem = BoundedProblem::uniform(2, -1.0, 1.0, sphere).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(3);
/// let population = Population::random(&problem, 10, FitnessGoal::Minimize, &mut rng).unwrap();
///
/// let mut top_p = TopPCache::new(3);
/// top_p.refresh(&population);
/// assert_eq!(top_p.indices().len(), 3);
/// assert_eq!(top_p.indices()[0], population.best_index());
/// ```
#[derive(Debug, Clone)]
pub struct TopPCache {
    indices: Vec<usize>,
    p: usize,
}

impl TopPCache {
    pub fn new(p: usize) -> Self {
        Self {
            indices: Vec::with_capacity(p),
            p,
        }
    }

    /// Recomputes the cache from `population`. Ties keep index order.
    pub fn refresh(&mut self, population: &Population) {
        let mut ranked = population.ranked_indices();
        ranked.truncate(self.p.min(population.len()));
        self.indices = ranked;
    }

    /// Changes the number of cached indices. Takes effect on the next refresh.
    pub fn set_p(&mut self, p: usize) {
        self.p = p;
    }

    pub fn p(&self) -> usize {
        self.p
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}
