//! One-dimensional k-means with seeded random restarts.
//!
//! Used to derive the two canonical seat anchors from detected horizontal
//! centers. The seed is part of the configuration so that identical inputs
//! always produce identical anchors.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Maximum Lloyd iterations per restart.
const MAX_ITERATIONS: usize = 100;

/// Convergence threshold for center movement.
const CONVERGENCE_EPS: f64 = 1e-6;

/// Cluster `values` into two groups, returning the centers in ascending
/// order.
///
/// Runs `restarts` random initializations from a seeded RNG and keeps the
/// partition with the lowest inertia. Degenerate inputs (fewer than two
/// distinct values) collapse both centers onto the same point; an empty
/// input collapses them onto zero.
pub fn cluster_two(values: &[f64], restarts: u32, seed: u64) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < CONVERGENCE_EPS {
        return (min, min);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut best: Option<((f64, f64), f64)> = None;

    for _ in 0..restarts.max(1) {
        let initial = pick_initial_centers(values, &mut rng);
        let (centers, inertia) = lloyd(values, initial);

        let better = match best {
            Some((_, best_inertia)) => inertia < best_inertia,
            None => true,
        };
        if better {
            best = Some((centers, inertia));
        }
    }

    // values has at least two distinct entries, so best is always set
    let (a, b) = best.map(|(centers, _)| centers).unwrap_or((min, max));
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Pick two distinct values as initial centers.
fn pick_initial_centers(values: &[f64], rng: &mut StdRng) -> (f64, f64) {
    let first = *values.choose(rng).unwrap_or(&values[0]);
    // Retry a few times for a distinct second value; fall back to the
    // extremes when the sample keeps landing on the same point.
    for _ in 0..8 {
        let second = *values.choose(rng).unwrap_or(&values[0]);
        if (second - first).abs() > CONVERGENCE_EPS {
            return (first, second);
        }
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

/// Standard Lloyd iteration for k=2 in one dimension.
fn lloyd(values: &[f64], initial: (f64, f64)) -> ((f64, f64), f64) {
    let (mut c0, mut c1) = initial;

    for _ in 0..MAX_ITERATIONS {
        let mut sum0 = 0.0;
        let mut n0 = 0usize;
        let mut sum1 = 0.0;
        let mut n1 = 0usize;

        for &v in values {
            if (v - c0).abs() <= (v - c1).abs() {
                sum0 += v;
                n0 += 1;
            } else {
                sum1 += v;
                n1 += 1;
            }
        }

        let new_c0 = if n0 > 0 { sum0 / n0 as f64 } else { c0 };
        let new_c1 = if n1 > 0 { sum1 / n1 as f64 } else { c1 };

        let moved = (new_c0 - c0).abs() + (new_c1 - c1).abs();
        c0 = new_c0;
        c1 = new_c1;
        if moved < CONVERGENCE_EPS {
            break;
        }
    }

    let inertia: f64 = values
        .iter()
        .map(|&v| {
            let d0 = (v - c0).powi(2);
            let d1 = (v - c1).powi(2);
            d0.min(d1)
        })
        .sum();

    ((c0, c1), inertia)
}
