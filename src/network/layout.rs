//! Seeded 2D force-directed layout
//!
//! Fruchterman-Reingold with a fixed iteration count and ChaCha8-seeded
//! initial positions, so the same graph always lays out identically. The
//! layout is cosmetic (consumed by the exported graph JSON); determinism is
//! the only hard requirement.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ITERATIONS: usize = 50;

/// Compute positions in the unit square for `n` nodes with the given
/// undirected edges (pairs of node indices).
pub fn spring_layout(n: usize, edges: &[(usize, usize)], seed: u64) -> Vec<(f64, f64)> {
    if n == 0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pos: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)))
        .collect();
    if n == 1 {
        return pos;
    }

    // Ideal pairwise distance for a unit-area canvas
    let k = (1.0 / n as f64).sqrt();
    let mut temperature = 0.1;
    let cooling = temperature / ITERATIONS as f64;

    for _ in 0..ITERATIONS {
        let mut disp = vec![(0.0f64, 0.0f64); n];

        // Repulsion between all pairs
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(1e-9);
                let force = k * k / dist;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[i].0 += fx;
                disp[i].1 += fy;
                disp[j].0 -= fx;
                disp[j].1 -= fy;
            }
        }

        // Attraction along edges
        for &(a, b) in edges {
            let dx = pos[a].0 - pos[b].0;
            let dy = pos[a].1 - pos[b].1;
            let dist = (dx * dx + dy * dy).sqrt().max(1e-9);
            let force = dist * dist / k;
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            disp[a].0 -= fx;
            disp[a].1 -= fy;
            disp[b].0 += fx;
            disp[b].1 += fy;
        }

        // Displace, capped by the current temperature
        for i in 0..n {
            let (dx, dy) = disp[i];
            let len = (dx * dx + dy * dy).sqrt().max(1e-9);
            let step = len.min(temperature);
            pos[i].0 = (pos[i].0 + dx / len * step).clamp(0.0, 1.0);
            pos[i].1 = (pos[i].1 + dy / len * step).clamp(0.0, 1.0);
        }

        temperature -= cooling;
    }

    pos
}
