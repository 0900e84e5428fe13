use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use adaptive_de::{
    breeding::{binary_crossover, exponential_crossover},
    degl::Degl,
    evolution::{Optimizer, ShadeOptions},
    population::FitnessGoal,
    problem::{
        functions::{rastrigin, sphere},
        BoundedProblem,
    },
    rng::RandomNumberGenerator,
    shade::Shade,
};

type Problem = BoundedProblem<fn(&[f64]) -> f64>;

fn problem(dimension: usize, function: fn(&[f64]) -> f64) -> Arc<Problem> {
    Arc::new(BoundedProblem::uniform(dimension, -5.12, 5.12, function).unwrap())
}

fn bench_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossover");
    let mut rng = RandomNumberGenerator::from_seed(1);

    for dimension in [10, 100, 1000].iter() {
        let target: Vec<f64> = (0..*dimension).map(|j| j as f64).collect();
        let donor: Vec<f64> = (0..*dimension).map(|j| -(j as f64)).collect();

        group.bench_with_input(BenchmarkId::new("binomial", dimension), dimension, |b, _| {
            b.iter(|| binary_crossover(black_box(&target), black_box(&donor), 0.5, &mut rng))
        });

        group.bench_with_input(BenchmarkId::new("exponential", dimension), dimension, |b, _| {
            b.iter(|| exponential_crossover(black_box(&target), black_box(&donor), 0.5, &mut rng))
        });
    }

    group.finish();
}

fn bench_generations(c: &mut Criterion) {
    let mut group = c.benchmark_group("shade_generations");
    group.sample_size(20);

    for dimension in [5, 20].iter() {
        let objective = problem(*dimension, rastrigin);

        let variants = [
            ("sequential", ShadeOptions::default()),
            (
                "parallel",
                ShadeOptions::builder().parallel(true).build().unwrap(),
            ),
            (
                "lshade",
                ShadeOptions::builder()
                    .linear_size_reduction(true)
                    .build()
                    .unwrap(),
            ),
        ];

        for (name, options) in variants.iter() {
            group.bench_with_input(BenchmarkId::new(*name, dimension), options, |b, options| {
                b.iter(|| {
                    let mut shade = Shade::new(
                        objective.clone(),
                        options.clone(),
                        RandomNumberGenerator::from_seed(7),
                    )
                    .unwrap();
                    shade.evolve_population(black_box(20)).unwrap();
                    black_box(shade.best())
                })
            });
        }
    }

    group.finish();
}

fn bench_degl(c: &mut Criterion) {
    let mut group = c.benchmark_group("degl_generations");
    group.sample_size(20);

    for dimension in [5, 20].iter() {
        let objective = problem(*dimension, sphere);
        group.bench_with_input(BenchmarkId::new("degl", dimension), dimension, |b, _| {
            b.iter(|| {
                let mut degl = Degl::new(
                    objective.clone(),
                    FitnessGoal::Minimize,
                    RandomNumberGenerator::from_seed(7),
                )
                .unwrap();
                degl.evolve_population(black_box(20)).unwrap();
                black_box(degl.best())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_crossover, bench_generations, bench_degl);
criterion_main!(benches);
