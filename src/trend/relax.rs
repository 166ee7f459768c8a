use tracing::debug;

use super::types::{Body, Position};
use crate::config::LayoutConfig;

const EPSILON: f64 = 1e-9;

/// Approximate non-overlap radius of a marker, in layout units.
pub fn footprint_radius(size: f64) -> f64 {
    0.10 + 0.012 * size
}

/// Push overlapping markers apart while weakly holding each one at its
/// original distance from the origin.
///
/// Each iteration accumulates pairwise repulsion for every overlapping pair,
/// applies it in one synchronous step, then blends every point toward its
/// original radius by `pull_strength`. Runs `iters` iterations unless
/// `settle_threshold` is set and an iteration's total push falls below it.
pub fn relax(bodies: &[Body], config: &LayoutConfig) -> Vec<Position> {
    let n = bodies.len();
    if n <= 1 {
        return bodies.iter().map(|b| b.position).collect();
    }

    let mut xs: Vec<f64> = bodies.iter().map(|b| b.position.x).collect();
    let mut ys: Vec<f64> = bodies.iter().map(|b| b.position.y).collect();

    let radii: Vec<f64> = bodies.iter().map(|b| footprint_radius(b.size)).collect();
    let home: Vec<f64> = bodies.iter().map(|b| b.position.radius() + EPSILON).collect();

    let mut dx = vec![0.0; n];
    let mut dy = vec![0.0; n];
    let pull = config.pull_strength;

    for iteration in 0..config.iters {
        dx.iter_mut().for_each(|v| *v = 0.0);
        dy.iter_mut().for_each(|v| *v = 0.0);
        let mut total_push = 0.0;

        for i in 0..n {
            for j in (i + 1)..n {
                let vx = xs[i] - xs[j];
                let vy = ys[i] - ys[j];
                let separation = vx.hypot(vy) + EPSILON;
                let min_separation = (radii[i] + radii[j]) * config.padding;
                if separation >= min_separation {
                    continue;
                }

                let overlap = (min_separation - separation) / min_separation;
                let push = config.repel_strength * overlap;
                let ux = vx / separation;
                let uy = vy / separation;

                dx[i] += ux * push;
                dy[i] += uy * push;
                dx[j] -= ux * push;
                dy[j] -= uy * push;
                total_push += 2.0 * push;
            }
        }

        for i in 0..n {
            xs[i] += dx[i];
            ys[i] += dy[i];

            let r = xs[i].hypot(ys[i]) + EPSILON;
            let blend = 1.0 + (home[i] / r - 1.0) * pull;
            xs[i] *= blend;
            ys[i] *= blend;
        }

        if let Some(threshold) = config.settle_threshold {
            if total_push < threshold {
                debug!(iteration, total_push, "relaxation settled early");
                break;
            }
        }
    }

    xs.into_iter()
        .zip(ys)
        .map(|(x, y)| Position::new(x, y))
        .collect()
}
