//! 3-opt improver (spec section 4.5).
//!
//! Grounded on
//! `original_source/src/solver/algorithm/improver/opt3.py`.

use crate::error::Result;
use crate::graph::RoutingGraph;
use crate::tour::{is_turn_feasible, tour_distance, DistanceCache};

pub fn run(graph: &mut RoutingGraph, capacity: u32, max_iterations: usize) -> Result<()> {
    let mut turn = graph.get_turn()?;
    let cache = DistanceCache::new(graph);

    for _ in 0..max_iterations {
        match try_improve(graph, &cache, &turn, capacity) {
            Some(next) => turn = next,
            None => break,
        }
    }

    graph.apply_turn(&turn)
}

fn try_improve(
    graph: &RoutingGraph,
    cache: &DistanceCache,
    turn: &[u32],
    capacity: u32,
) -> Option<Vec<u32>> {
    let n = turn.len();
    if n < 6 {
        return None;
    }

    let current_total = tour_distance(cache, turn);

    for i in 1..n.saturating_sub(3) {
        for j in (i + 2)..n.saturating_sub(2) {
            for k in (j + 2)..(n - 1) {
                let mut best: Option<(Vec<u32>, f64)> = None;

                for candidate in three_opt_reconnections(turn, i, j, k) {
                    let dist = tour_distance(cache, &candidate);
                    let better = best.as_ref().is_none_or(|(_, best_dist)| dist < *best_dist);
                    if dist < current_total && better && is_turn_feasible(graph, &candidate, capacity) {
                        best = Some((candidate, dist));
                    }
                }

                if let Some((candidate, _)) = best {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

/// The seven non-identity reconnections of A-B-C-D, where A = turn[0..=i],
/// B = turn[i+1..=j], C = turn[j+1..=k], D = turn[k+1..].
fn three_opt_reconnections(turn: &[u32], i: usize, j: usize, k: usize) -> Vec<Vec<u32>> {
    let a = &turn[..=i];
    let b = &turn[i + 1..=j];
    let c = &turn[j + 1..=k];
    let d = &turn[k + 1..];

    let rev = |s: &[u32]| -> Vec<u32> { s.iter().rev().copied().collect() };
    let rb = rev(b);
    let rc = rev(c);

    let join = |parts: &[&[u32]]| -> Vec<u32> { parts.iter().flat_map(|p| p.iter().copied()).collect() };

    vec![
        join(&[a, b, &rc, d]),
        join(&[a, &rb, c, d]),
        join(&[a, c, b, d]),
        join(&[a, &rc, b, d]),
        join(&[a, c, &rb, d]),
        join(&[a, &rb, &rc, d]),
        join(&[a, &rc, &rb, d]),
    ]
}
