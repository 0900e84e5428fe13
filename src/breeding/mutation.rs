//! Mutation operators.

use crate::{population::Population, rng::RandomNumberGenerator, shade::archive::Archive};

/// The population extended by the archive, as seen by the `r2` donor draw.
///
/// Indices `0..population.len()` address population members and the following
/// `archive.len()` indices address archive entries. Lookups go to whichever
/// container owns the index; nothing is concatenated or copied.
#[derive(Debug, Clone, Copy)]
pub struct DonorPool<'a> {
    population: &'a Population,
    archive: &'a Archive,
}

impl<'a> DonorPool<'a> {
    pub fn new(population: &'a Population, archive: &'a Archive) -> Self {
        Self {
            population,
            archive,
        }
    }

    pub fn len(&self) -> usize {
        self.population.len() + self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> &'a [f64] {
        let population_size = self.population.len();
        if index < population_size {
            self.population.chromosome(index)
        } else {
            self.archive.get(index - population_size)
        }
    }
}

/// current-to-pbest/1 mutation.
///
/// `v = x_i + F·(x_pbest − x_i) + F·(x_r1 − x_r2)` where `pbest` is drawn from
/// `top_p`, `r1 ≠ i` from the population, and `r2 ∉ {i, r1}` from the
/// population extended by the archive. The mutant is not constrained here.
///
/// # Panics
///
/// Panics if `top_p` is empty or the pool is too small to draw distinct donors.
pub fn current_to_pbest(
    target: usize,
    scale_factor: f64,
    top_p: &[usize],
    pool: &DonorPool<'_>,
    rng: &mut RandomNumberGenerator,
) -> Vec<f64> {
    let population_size = pool.population.len();
    assert!(!top_p.is_empty(), "top-p cache is empty");
    assert!(
        population_size >= 2 && pool.len() >= 3,
        "not enough individuals to draw distinct donors"
    );

    let pbest = top_p[rng.uniform_index(top_p.len())];
    let r1 = loop {
        let r = rng.uniform_index(population_size);
        if r != target {
            break r;
        }
    };
    let r2 = loop {
        let r = rng.uniform_index(pool.len());
        if r != target && r != r1 {
            break r;
        }
    };

    let x_i = pool.population.chromosome(target);
    let x_pbest = pool.population.chromosome(pbest);
    let x_r1 = pool.population.chromosome(r1);
    let x_r2 = pool.get(r2);

    (0..x_i.len())
        .map(|j| x_i[j] + scale_factor * (x_pbest[j] - x_i[j]) + scale_factor * (x_r1[j] - x_r2[j]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        population::FitnessGoal,
        problem::{functions::sphere, BoundedProblem},
    };

    fn population(size: usize) -> Population {
        let problem = BoundedProblem::uniform(3, -1.0, 1.0, sphere).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(10);
        Population::random(&problem, size, FitnessGoal::Minimize, &mut rng).unwrap()
    }

    #[test]
    fn test_pool_indirection() {
        let population = population(4);
        let mut archive = Archive::new(2);
        let mut rng = RandomNumberGenerator::from_seed(1);
        archive.insert(vec![7.0, 7.0, 7.0], &mut rng);

        let pool = DonorPool::new(&population, &archive);
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.get(2), population.chromosome(2));
        assert_eq!(pool.get(4), &[7.0, 7.0, 7.0]);
    }

    #[test]
    fn test_zero_scale_factor_returns_target() {
        let population = population(6);
        let archive = Archive::new(4);
        let pool = DonorPool::new(&population, &archive);
        let mut rng = RandomNumberGenerator::from_seed(2);

        let mutant = current_to_pbest(3, 0.0, &[0], &pool, &mut rng);
        assert_eq!(mutant, population.chromosome(3));
    }

    #[test]
    fn test_mutant_is_a_donor_combination() {
        // Without an archive the mutant is one of finitely many donor combinations
        let population = population(4);
        let archive = Archive::new(0);
        let pool = DonorPool::new(&population, &archive);
        let mut rng = RandomNumberGenerator::from_seed(3);

        let f = 0.5;
        let target = 1;
        let pbest = 0;
        let mutant = current_to_pbest(target, f, &[pbest], &pool, &mut rng);

        let x = |i: usize| population.chromosome(i);
        let candidates: Vec<(usize, usize)> = (0..4)
            .flat_map(|r1| (0..4).map(move |r2| (r1, r2)))
            .filter(|&(r1, r2)| r1 != target && r2 != target && r2 != r1)
            .collect();
        let matches = candidates.iter().any(|&(r1, r2)| {
            (0..3).all(|j| {
                let expected =
                    x(target)[j] + f * (x(pbest)[j] - x(target)[j]) + f * (x(r1)[j] - x(r2)[j]);
                (mutant[j] - expected).abs() < 1e-12
            })
        });
        assert!(matches);
    }

    #[test]
    fn test_archive_entries_are_drawn() {
        let population = population(4);
        let mut archive = Archive::new(50);
        let mut rng = RandomNumberGenerator::from_seed(4);
        for _ in 0..50 {
            archive.insert(vec![100.0; 3], &mut rng);
        }
        let pool = DonorPool::new(&population, &archive);

        // F = 1 and pbest = target give v = x_0 + x_r1 - x_r2; an archive r2 pushes it below -90
        let far = (0..200)
            .map(|_| current_to_pbest(0, 1.0, &[0], &pool, &mut rng))
            .filter(|v| v.iter().all(|g| *g < -90.0))
            .count();
        assert!(far > 0);
    }

    #[test]
    #[should_panic]
    fn test_empty_top_p_panics() {
        let population = population(4);
        let archive = Archive::new(0);
        let pool = DonorPool::new(&population, &archive);
        let mut rng = RandomNumberGenerator::from_seed(5);
        current_to_pbest(0, 0.5, &[], &pool, &mut rng);
    }
}
