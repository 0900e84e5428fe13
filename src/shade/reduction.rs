//! # Linear population size reduction

/// Interpolation end point of the linear size schedule.
///
/// This is a literal constant: it does not scale with the problem dimension the
/// way the initial size does.
pub const REDUCTION_FLOOR: f64 = 4.0;

/// L-SHADE target population size after generation `generation` of `max_generations`.
///
/// `N = (4 - N_init)·g/G + N_init + 1`, truncated. The `+ 1` means generation 0
/// never shrinks the population, and for every `g < G` the target stays above
/// the floor.
pub fn linear_target_size(initial_size: usize, generation: usize, max_generations: usize) -> usize {
    if max_generations == 0 {
        return initial_size;
    }
    let initial = initial_size as f64;
    let progress = generation as f64 / max_generations as f64;
    ((REDUCTION_FLOOR - initial) * progress + initial + 1.0) as usize
}
