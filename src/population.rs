//! # Population
//!
//! The `Population` struct owns the chromosomes of an optimizer run together with
//! their fitness values. An individual's identity is its index: the top-p cache,
//! the mutation operators and the greedy replacement all address individuals by
//! position, and that position is stable for the duration of a generation.
//!
//! Every comparison between fitness values goes through the population's
//! [`FitnessGoal`], which is fixed when the population is created.

use std::cmp::Ordering;

use crate::{
    error::{EvolutionError, Result},
    evolution::EvolutionResult,
    problem::Objective,
    rng::RandomNumberGenerator,
};

/// Smallest population the mutation operators can draw distinct donors from.
pub const MIN_POPULATION_SIZE: usize = 4;

/// Whether lower or higher fitness values are better.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitnessGoal {
    #[default]
    Minimize,
    Maximize,
}

impl FitnessGoal {
    pub fn from_minimize(minimize: bool) -> Self {
        if minimize {
            Self::Minimize
        } else {
            Self::Maximize
        }
    }

    pub fn is_minimize(&self) -> bool {
        matches!(self, Self::Minimize)
    }

    /// Returns `true` if `candidate` is at least as good as `current`.
    pub fn is_not_worse(&self, current: f64, candidate: f64) -> bool {
        match self {
            Self::Minimize => current >= candidate,
            Self::Maximize => current <= candidate,
        }
    }

    /// Returns `true` if `candidate` is strictly better than `current`.
    pub fn is_better(&self, current: f64, candidate: f64) -> bool {
        match self {
            Self::Minimize => current > candidate,
            Self::Maximize => current < candidate,
        }
    }

    /// Orders two fitness values best first.
    pub fn rank_order(&self, a: f64, b: f64) -> Ordering {
        let ordering = match self {
            Self::Minimize => a.partial_cmp(&b),
            Self::Maximize => b.partial_cmp(&a),
        };
        ordering.unwrap_or(Ordering::Equal)
    }
}

/// The chromosomes and fitness values of an optimizer run.
#[derive(Debug, Clone)]
pub struct Population {
    chromosomes: Vec<Vec<f64>>,
    fitness: Vec<f64>,
    dimension: usize,
    goal: FitnessGoal,
}

impl Population {
    /// Creates a population of `size` random chromosomes and evaluates each one.
    ///
    /// # Errors
    ///
    /// Returns an error if the objective has no genes, if `size` is zero or below
    /// [`MIN_POPULATION_SIZE`], or if a fitness evaluation yields NaN.
    pub fn random<O>(
        objective: &O,
        size: usize,
        goal: FitnessGoal,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Self>
    where
        O: Objective + ?Sized,
    {
        let dimension = Self::validate(objective, size)?;
        let mut chromosomes = Vec::with_capacity(size);
        let mut fitness = Vec::with_capacity(size);

        for _ in 0..size {
            let mut chromosome = vec![0.0; dimension];
            objective.randomize(&mut chromosome, rng);
            fitness.push(evaluate(objective, &chromosome)?);
            chromosomes.push(chromosome);
        }

        Ok(Self {
            chromosomes,
            fitness,
            dimension,
            goal,
        })
    }

    /// Creates a population whose first individual is `initial`; the remaining
    /// `size - 1` individuals are random.
    ///
    /// If `initial_fitness` is given it is trusted as the fitness of `initial`,
    /// otherwise the objective is evaluated.
    ///
    /// # Errors
    ///
    /// Returns `EvolutionError::DimensionMismatch` if `initial` does not have the
    /// objective's number of genes, plus the errors of [`Population::random`].
    pub fn with_initial<O>(
        objective: &O,
        initial: Vec<f64>,
        initial_fitness: Option<f64>,
        size: usize,
        goal: FitnessGoal,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Self>
    where
        O: Objective + ?Sized,
    {
        let dimension = Self::validate(objective, size)?;
        if initial.len() != dimension {
            return Err(EvolutionError::DimensionMismatch {
                expected: dimension,
                got: initial.len(),
            });
        }

        let first_fitness = match initial_fitness {
            Some(fitness) if fitness.is_nan() => {
                return Err(EvolutionError::FitnessCalculation(
                    "Initial fitness is NaN".to_string(),
                ))
            }
            Some(fitness) => fitness,
            None => evaluate(objective, &initial)?,
        };

        let mut population = Self {
            chromosomes: Vec::with_capacity(size),
            fitness: Vec::with_capacity(size),
            dimension,
            goal,
        };
        population.chromosomes.push(initial);
        population.fitness.push(first_fitness);

        for _ in 1..size {
            let mut chromosome = vec![0.0; dimension];
            objective.randomize(&mut chromosome, rng);
            population.fitness.push(evaluate(objective, &chromosome)?);
            population.chromosomes.push(chromosome);
        }

        Ok(population)
    }

    fn validate<O>(objective: &O, size: usize) -> Result<usize>
    where
        O: Objective + ?Sized,
    {
        let dimension = objective.number_of_genes();
        if dimension == 0 {
            return Err(EvolutionError::Configuration(
                "Objective must have at least one gene".to_string(),
            ));
        }
        if size == 0 {
            return Err(EvolutionError::EmptyPopulation);
        }
        if size < MIN_POPULATION_SIZE {
            return Err(EvolutionError::PopulationTooSmall {
                size,
                minimum: MIN_POPULATION_SIZE,
            });
        }
        Ok(dimension)
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Number of genes per chromosome.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn goal(&self) -> FitnessGoal {
        self.goal
    }

    pub fn chromosome(&self, index: usize) -> &[f64] {
        &self.chromosomes[index]
    }

    pub fn chromosomes(&self) -> &[Vec<f64>] {
        &self.chromosomes
    }

    pub fn fitness(&self, index: usize) -> f64 {
        self.fitness[index]
    }

    pub fn fitnesses(&self) -> &[f64] {
        &self.fitness
    }

    /// Index of the best individual. Ties resolve to the lowest index.
    pub fn best_index(&self) -> usize {
        (1..self.len()).fold(0, |best, i| {
            if self.goal.is_better(self.fitness[best], self.fitness[i]) {
                i
            } else {
                best
            }
        })
    }

    /// The best chromosome and its fitness.
    pub fn best(&self) -> EvolutionResult {
        let best = self.best_index();
        EvolutionResult {
            chromosome: self.chromosomes[best].clone(),
            fitness: self.fitness[best],
        }
    }

    /// All indices ordered best first; equal fitness keeps index order.
    pub fn ranked_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.sort_by(|&a, &b| self.goal.rank_order(self.fitness[a], self.fitness[b]));
        indices
    }

    /// Replaces individual `index`, returning the chromosome it displaced.
    pub fn replace(&mut self, index: usize, chromosome: Vec<f64>, fitness: f64) -> Vec<f64> {
        debug_assert_eq!(chromosome.len(), self.dimension);
        self.fitness[index] = fitness;
        std::mem::replace(&mut self.chromosomes[index], chromosome)
    }

    /// Keeps the `size` best individuals, stored best first.
    ///
    /// Does nothing if `size` is not smaller than the current length.
    pub fn retain_best(&mut self, size: usize) {
        if size >= self.len() {
            return;
        }
        let ranked = self.ranked_indices();
        let mut chromosomes = std::mem::take(&mut self.chromosomes);
        let fitness = std::mem::take(&mut self.fitness);

        self.chromosomes = ranked
            .iter()
            .take(size)
            .map(|&i| std::mem::take(&mut chromosomes[i]))
            .collect();
        self.fitness = ranked.iter().take(size).map(|&i| fitness[i]).collect();
    }
}

/// Evaluates `chromosome`, rejecting NaN.
pub(crate) fn evaluate<O>(objective: &O, chromosome: &[f64]) -> Result<f64>
where
    O: Objective + ?Sized,
{
    let fitness = objective.fitness(chromosome);
    if fitness.is_nan() {
        return Err(EvolutionError::FitnessCalculation(format!(
            "Objective returned NaN for chromosome {:?}",
            chromosome
        )));
    }
    Ok(fitness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{functions::sphere, BoundedProblem};

    fn problem(dimension: usize) -> BoundedProblem<fn(&[f64]) -> f64> {
        BoundedProblem::uniform(dimension, -10.0, 10.0, sphere as fn(&[f64]) -> f64).unwrap()
    }

    #[test]
    fn test_goal_predicates() {
        let min = FitnessGoal::Minimize;
        assert!(min.is_not_worse(2.0, 2.0));
        assert!(min.is_not_worse(2.0, 1.0));
        assert!(!min.is_better(2.0, 2.0));
        assert!(min.is_better(2.0, 1.0));

        let max = FitnessGoal::Maximize;
        assert!(max.is_not_worse(2.0, 2.0));
        assert!(max.is_better(2.0, 3.0));
        assert!(!max.is_not_worse(2.0, 1.0));
        assert_eq!(max.rank_order(3.0, 1.0), Ordering::Less);
    }

    #[test]
    fn test_random_population() {
        let p = problem(3);
        let mut rng = RandomNumberGenerator::from_seed(1);
        let population = Population::random(&p, 12, FitnessGoal::Minimize, &mut rng).unwrap();

        assert_eq!(population.len(), 12);
        assert_eq!(population.dimension(), 3);
        for i in 0..population.len() {
            assert!(p.contains(population.chromosome(i)));
            assert_eq!(population.fitness(i), sphere(population.chromosome(i)));
        }
    }

    #[test]
    fn test_with_initial_uses_given_fitness() {
        let p = problem(2);
        let mut rng = RandomNumberGenerator::from_seed(2);
        let population = Population::with_initial(
            &p,
            vec![1.0, 1.0],
            Some(-7.0),
            8,
            FitnessGoal::Minimize,
            &mut rng,
        )
        .unwrap();

        assert_eq!(population.chromosome(0), &[1.0, 1.0]);
        assert_eq!(population.fitness(0), -7.0);
        assert_eq!(population.best_index(), 0);
    }

    #[test]
    fn test_with_initial_dimension_mismatch() {
        let p = problem(3);
        let mut rng = RandomNumberGenerator::from_seed(3);
        let result =
            Population::with_initial(&p, vec![0.0; 2], None, 8, FitnessGoal::Minimize, &mut rng);
        match result {
            Err(EvolutionError::DimensionMismatch { expected, got }) => {
                assert_eq!((expected, got), (3, 2));
            }
            _ => panic!("Expected DimensionMismatch error"),
        }
    }

    #[test]
    fn test_population_too_small() {
        let p = problem(3);
        let mut rng = RandomNumberGenerator::from_seed(4);
        match Population::random(&p, 3, FitnessGoal::Minimize, &mut rng) {
            Err(EvolutionError::PopulationTooSmall { size: 3, minimum }) => {
                assert_eq!(minimum, MIN_POPULATION_SIZE)
            }
            _ => panic!("Expected PopulationTooSmall error"),
        }
    }

    #[test]
    fn test_empty_population() {
        let p = problem(3);
        let mut rng = RandomNumberGenerator::from_seed(4);
        assert!(matches!(
            Population::random(&p, 0, FitnessGoal::Minimize, &mut rng),
            Err(EvolutionError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_best_and_ranking_maximize() {
        let p = problem(1);
        let mut rng = RandomNumberGenerator::from_seed(5);
        let population = Population::random(&p, 10, FitnessGoal::Maximize, &mut rng).unwrap();

        let best = population.best();
        let max = population
            .fitnesses()
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(best.fitness, max);

        let ranked = population.ranked_indices();
        for pair in ranked.windows(2) {
            assert!(population.fitness(pair[0]) >= population.fitness(pair[1]));
        }
    }

    #[test]
    fn test_retain_best() {
        let p = problem(2);
        let mut rng = RandomNumberGenerator::from_seed(6);
        let mut population = Population::random(&p, 10, FitnessGoal::Minimize, &mut rng).unwrap();
        let mut sorted = population.fitnesses().to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        population.retain_best(4);

        assert_eq!(population.len(), 4);
        assert_eq!(population.fitnesses(), &sorted[..4]);
        for i in 0..4 {
            assert_eq!(population.fitness(i), sphere(population.chromosome(i)));
        }

        // Growing is not possible
        population.retain_best(8);
        assert_eq!(population.len(), 4);
    }

    #[test]
    fn test_replace_returns_displaced() {
        let p = problem(2);
        let mut rng = RandomNumberGenerator::from_seed(7);
        let mut population = Population::random(&p, 5, FitnessGoal::Minimize, &mut rng).unwrap();
        let old = population.chromosome(2).to_vec();

        let displaced = population.replace(2, vec![0.0, 0.0], 0.0);

        assert_eq!(displaced, old);
        assert_eq!(population.fitness(2), 0.0);
        assert_eq!(population.best_index(), 2);
    }

    #[test]
    fn test_nan_fitness_rejected() {
        let p = BoundedProblem::uniform(2, -1.0, 1.0, |_: &[f64]| f64::NAN).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(8);
        match Population::random(&p, 5, FitnessGoal::Minimize, &mut rng) {
            Err(EvolutionError::FitnessCalculation(_)) => (),
            _ => panic!("Expected FitnessCalculation error"),
        }
    }
}
