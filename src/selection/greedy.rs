//! # Greedy one-to-one selection
//!
//! A trial replaces its own parent when it is not worse. Only strict
//! improvements report the displaced parent and the fitness gain.

use crate::population::Population;

/// Outcome of comparing a trial against its parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// The trial was worse; the parent survives.
    Rejected,
    /// The trial was exactly as good as the parent and replaced it.
    Tied,
    /// The trial was strictly better and replaced the parent.
    Improved {
        /// The parent chromosome that was displaced.
        displaced: Vec<f64>,
        /// `|f(parent) - f(trial)|`.
        improvement: f64,
    },
}

impl Selection {
    /// Whether the trial took the parent's slot.
    pub fn replaced(&self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Greedy one-to-one selection of `trial` against individual `index`.
///
/// The trial replaces the parent whenever it is not worse under the
/// population's goal. Only a strict improvement reports the displaced parent,
/// which is what feeds the archive and the success history.
pub fn select(
    population: &mut Population,
    index: usize,
    trial: Vec<f64>,
    trial_fitness: f64,
) -> Selection {
    let goal = population.goal();
    let parent_fitness = population.fitness(index);

    if goal.is_better(parent_fitness, trial_fitness) {
        let displaced = population.replace(index, trial, trial_fitness);
        Selection::Improved {
            displaced,
            improvement: (parent_fitness - trial_fitness).abs(),
        }
    } else if goal.is_not_worse(parent_fitness, trial_fitness) {
        population.replace(index, trial, trial_fitness);
        Selection::Tied
    } else {
        Selection::Rejected
    }
}
