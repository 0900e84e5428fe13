//! Phased parallel generation.
//!
//! A parallel generation is split into a propose phase and a commit phase. In
//! the propose phase each worker builds and evaluates the trials of the
//! individuals it owns against a read-only view of the generation-start state,
//! writing into its own buffer. The commit phase then applies greedy selection
//! serially, in ascending index order, on the engine's thread.
//!
//! Worker `w` of `W` owns individuals `w, w + W, w + 2W, …`. Every worker gets
//! its own generator, so the proposals depend only on the seed and `W`, never
//! on thread scheduling.

use rayon::prelude::*;

use crate::{
    error::Result,
    population::evaluate,
    problem::Objective,
    rng::RandomNumberGenerator,
};

use super::{GenerationView, Trial};

/// A trial together with its fitness.
pub(crate) type EvaluatedTrial = (Trial, f64);

/// Derives one generator per worker from `rng`, in worker order.
pub(crate) fn worker_generators(
    rng: &mut RandomNumberGenerator,
    workers: usize,
) -> Vec<RandomNumberGenerator> {
    (0..workers).map(|_| rng.split()).collect()
}

/// Proposes and evaluates a trial for every individual of `view`.
///
/// Returns the evaluated trials sorted by individual index. The first error
/// raised by any worker aborts the phase.
pub(crate) fn propose_all<O>(
    view: &GenerationView<'_, O>,
    generators: Vec<RandomNumberGenerator>,
) -> Result<Vec<EvaluatedTrial>>
where
    O: Objective + ?Sized,
{
    let workers = generators.len();
    let population_size = view.population_size();

    let buffers = generators
        .into_par_iter()
        .enumerate()
        .map(|(worker, mut rng)| {
            (worker..population_size)
                .step_by(workers)
                .map(|index| -> Result<EvaluatedTrial> {
                    let trial = view.propose(index, &mut rng)?;
                    let fitness = evaluate(view.objective(), &trial.chromosome)?;
                    Ok((trial, fitness))
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let mut trials: Vec<EvaluatedTrial> = buffers.into_iter().flatten().collect();
    trials.sort_by_key(|(trial, _)| trial.index);
    Ok(trials)
}
