use std::sync::Arc;

use adaptive_de::{
    breeding::Crossover,
    error::EvolutionError,
    evolution::{LogLevel, Optimizer, ShadeBuilder, ShadeOptions},
    problem::{functions::rastrigin, BoundedProblem, Objective},
    rng::RandomNumberGenerator,
    shade::{CrossoverMean, Shade},
};

/// Sum of squares over `[-100, 100]^D`, clipping out-of-bounds genes.
#[derive(Debug, Clone)]
struct SumOfSquares {
    dimension: usize,
}

impl SumOfSquares {
    const LOWER: f64 = -100.0;
    const UPPER: f64 = 100.0;

    fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn in_bounds(&self, chromosome: &[f64]) -> bool {
        chromosome
            .iter()
            .all(|x| (Self::LOWER..=Self::UPPER).contains(x))
    }
}

impl Objective for SumOfSquares {
    fn number_of_genes(&self) -> usize {
        self.dimension
    }

    fn randomize(&self, chromosome: &mut [f64], rng: &mut RandomNumberGenerator) {
        chromosome
            .iter_mut()
            .for_each(|x| *x = rng.uniform(Self::LOWER, Self::UPPER));
    }

    fn constrain(&self, chromosome: &mut [f64], _rng: &mut RandomNumberGenerator) {
        chromosome
            .iter_mut()
            .for_each(|x| *x = x.clamp(Self::LOWER, Self::UPPER));
    }

    fn fitness(&self, chromosome: &[f64]) -> f64 {
        chromosome.iter().map(|x| x * x).sum()
    }
}

fn sum_of_squares_shade(options: ShadeOptions, seed: u64) -> Shade<SumOfSquares> {
    Shade::new(
        Arc::new(SumOfSquares::new(5)),
        options,
        RandomNumberGenerator::from_seed(seed),
    )
    .unwrap()
}

#[test]
fn test_sum_of_squares_converges() {
    let mut shade = sum_of_squares_shade(ShadeOptions::default(), 12345);
    assert_eq!(shade.population().len(), 90);

    let initial = shade.best().fitness;
    let mut bests = vec![initial];
    for _ in 0..100 {
        shade.evolve_population(1).unwrap();
        bests.push(shade.best().fitness);
    }

    assert!(bests.windows(2).any(|w| w[1] < w[0]));
    assert!(bests.windows(2).all(|w| w[1] <= w[0]));
    assert!(*bests.last().unwrap() <= initial);
}

#[test]
fn test_selection_never_worsens_an_individual() {
    let mut shade = sum_of_squares_shade(ShadeOptions::default(), 1);
    for _ in 0..20 {
        let before = shade.population().fitnesses().to_vec();
        shade.evolve_population(1).unwrap();
        for (i, previous) in before.iter().enumerate() {
            assert!(shade.population().fitness(i) <= *previous);
        }
    }
}

#[test]
fn test_population_respects_bounds() {
    let objective = Arc::new(SumOfSquares::new(5));
    let mut shade = Shade::new(
        objective.clone(),
        ShadeOptions::default(),
        RandomNumberGenerator::from_seed(2),
    )
    .unwrap();
    shade.evolve_population(30).unwrap();

    for chromosome in shade.population().chromosomes() {
        assert!(objective.in_bounds(chromosome));
    }
    for entry in shade.archive().iter() {
        assert!(objective.in_bounds(entry));
    }
}

#[test]
fn test_archive_and_memory_invariants() {
    let mut shade = sum_of_squares_shade(ShadeOptions::default(), 3);
    for _ in 0..40 {
        shade.evolve_population(1).unwrap();
        assert!(shade.archive().len() <= shade.archive().capacity());
        assert!(shade.p() >= 1 && shade.p() <= shade.population().len());

        for slot in shade.memory().crossover_means() {
            if let CrossoverMean::Mean(cr) = slot {
                assert!((0.0..=1.0).contains(cr));
            }
        }
        for &f in shade.memory().scale_means() {
            assert!(f > 0.0 && f <= 1.0);
        }
    }
    assert!(!shade.archive().is_empty());
}

#[test]
fn test_archive_fed_only_by_strict_improvements() {
    let mut shade = sum_of_squares_shade(ShadeOptions::default(), 21);
    shade.evolve_population(30).unwrap();

    let total_successes: usize = shade.history().iter().map(|r| r.successes).sum();
    assert!(total_successes > 0);
    assert!(shade.archive().len() <= total_successes);
}

#[test]
fn test_plateau_ties_leave_archive_and_memory_untouched() {
    let plateau =
        Arc::new(BoundedProblem::uniform(3, -1.0, 1.0, |_: &[f64]| -> f64 { 1.0 }).unwrap());
    let mut shade = Shade::new(
        plateau,
        ShadeOptions::default(),
        RandomNumberGenerator::from_seed(4),
    )
    .unwrap();
    let before = shade.population().chromosomes().to_vec();
    shade.evolve_population(10).unwrap();

    // Every trial ties, so every individual is replaced without being recorded
    assert_ne!(shade.population().chromosomes(), before.as_slice());
    assert!(shade.archive().is_empty());
    assert!(shade.history().iter().all(|r| r.successes == 0));
    assert!(shade
        .memory()
        .crossover_means()
        .iter()
        .all(|slot| *slot == CrossoverMean::Mean(0.5)));
    assert!(shade.memory().scale_means().iter().all(|&f| f == 0.5));
}

#[test]
fn test_budget_cutoff_generation_still_updates_memory() {
    // 90 initial + 90 per generation passes 1000 in the eleventh generation
    let budgeted = ShadeOptions::builder().max_evaluations(1_000).build().unwrap();
    let mut cut = sum_of_squares_shade(budgeted, 17);
    cut.evolve_population(100).unwrap();
    assert_eq!(cut.history().len(), 11);

    let mut full = sum_of_squares_shade(ShadeOptions::default(), 17);
    full.evolve_population(11).unwrap();

    assert_eq!(cut.memory().crossover_means(), full.memory().crossover_means());
    assert_eq!(cut.memory().scale_means(), full.memory().scale_means());
    assert_eq!(cut.population().fitnesses(), full.population().fitnesses());
}

#[test]
fn test_maximize() {
    let problem = Arc::new(BoundedProblem::uniform(3, -2.0, 2.0, |x: &[f64]| -> f64 {
        -x.iter().map(|v| (v - 1.0).powi(2)).sum::<f64>()
    })
    .unwrap());
    let options = ShadeOptions::builder().minimize(false).build().unwrap();
    let mut shade = Shade::new(problem, options, RandomNumberGenerator::from_seed(4)).unwrap();

    let initial = shade.best().fitness;
    shade.evolve_population(150).unwrap();
    let best = shade.best();

    assert!(best.fitness >= initial);
    assert!(best.fitness > -1e-2);
    for x in &best.chromosome {
        assert!((x - 1.0).abs() < 0.1);
    }
}

#[test]
fn test_seeded_population_through_builder() {
    let mut shade = ShadeBuilder::new()
        .with_objective(Arc::new(SumOfSquares::new(5)))
        .with_initial_chromosome(vec![0.5; 5])
        .with_initial_fitness(1.25)
        .with_seed(5)
        .build()
        .unwrap();

    assert_eq!(shade.population().chromosome(0), &[0.5; 5]);
    assert_eq!(shade.population().fitness(0), 1.25);
    assert_eq!(shade.evaluations(), 89);

    shade.evolve_population(5).unwrap();
    assert!(shade.best().fitness <= 1.25);
}

#[test]
fn test_seeded_population_dimension_mismatch() {
    let result = ShadeBuilder::new()
        .with_objective(Arc::new(SumOfSquares::new(5)))
        .with_initial_chromosome(vec![0.0; 3])
        .build();
    match result {
        Err(EvolutionError::DimensionMismatch { expected, got }) => {
            assert_eq!((expected, got), (5, 3))
        }
        other => panic!("Expected DimensionMismatch, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_exponential_crossover() {
    let options = ShadeOptions::builder()
        .crossover(Crossover::Exponential)
        .build()
        .unwrap();
    let mut shade = sum_of_squares_shade(options, 6);
    let initial = shade.best().fitness;
    shade.evolve_population(50).unwrap();
    assert!(shade.best().fitness < initial);
}

#[test]
fn test_dyn_objective_and_rastrigin() {
    let objective: Arc<dyn Objective> =
        Arc::new(BoundedProblem::uniform(4, -5.12, 5.12, rastrigin).unwrap());
    let mut shade = Shade::new(objective, ShadeOptions::default(), RandomNumberGenerator::from_seed(7))
        .unwrap();
    let initial = shade.best().fitness;
    shade.evolve_population(60).unwrap();
    assert!(shade.best().fitness < initial);
    assert_eq!(shade.best().fitness, rastrigin(&shade.best().chromosome));
}

#[test]
fn test_same_seed_same_run() {
    let run = || {
        let mut shade = sum_of_squares_shade(ShadeOptions::default(), 8);
        shade.evolve_population(10).unwrap();
        shade.population().fitnesses().to_vec()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_verbose_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let options = ShadeOptions::builder()
        .log_level(LogLevel::Verbose)
        .max_evaluations(1_000)
        .build()
        .unwrap();
    let mut shade = sum_of_squares_shade(options, 9);
    shade.evolve_population(100).unwrap();

    // 90 initial + 90 per generation passes 1000 in the eleventh generation
    assert_eq!(shade.history().len(), 11);
    assert_eq!(shade.history().last().unwrap().evaluations, 1080);
    assert_eq!(shade.evaluations(), 1080);
}
