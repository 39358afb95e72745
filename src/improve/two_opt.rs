//! 2-opt improver (spec section 4.4).
//!
//! Grounded on
//! `original_source/src/solver/algorithm/improver/opt2.py`, translated onto
//! `RoutingGraph`/`DistanceCache`.

use crate::error::Result;
use crate::graph::RoutingGraph;
use crate::tour::{is_turn_feasible, DistanceCache};

/// Improve the tour currently held by `graph` in place. Requires `graph` to
/// already hold a connex closed tour.
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
    if n < 4 {
        return None;
    }

    for i in 1..n.saturating_sub(2) {
        for j in (i + 1)..(n - 1) {
            let current = cache.get(turn[i - 1], turn[i]) + cache.get(turn[j], turn[j + 1]);
            let candidate = cache.get(turn[i - 1], turn[j]) + cache.get(turn[i], turn[j + 1]);

            if candidate < current {
                let mut new_turn = turn[..i].to_vec();
                let mut middle: Vec<u32> = turn[i..=j].to_vec();
                middle.reverse();
                new_turn.extend(middle);
                new_turn.extend_from_slice(&turn[j + 1..]);

                if is_turn_feasible(graph, &new_turn, capacity) {
                    return Some(new_turn);
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::greedy;
    use crate::station::Station;
    use crate::tour::tour_distance;

    fn random_like_graph() -> RoutingGraph {
        // A deliberately zig-zag layout so 2-opt has an obvious crossing to fix.
        let depot = Station::depot(0, "Depot", 0.0, 0.0);
        let mut g = RoutingGraph::new(depot).unwrap();
        g.add_station(Station::new(1, "A", 20, "addr", 0.0, 1.0, 15, 10))
            .unwrap(); // +5
        g.add_station(Station::new(2, "B", 20, "addr", 1.0, 0.0, 15, 10))
            .unwrap(); // +5
        g.add_station(Station::new(3, "C", 20, "addr", 0.0, -1.0, 5, 15))
            .unwrap(); // -10
        g
    }

    #[test]
    fn never_increases_distance_and_stays_feasible() {
        let mut g = random_like_graph();
        greedy::build(&mut g, 15).unwrap();

        let before_cache = DistanceCache::new(&g);
        let before_turn = g.get_turn().unwrap();
        let before = tour_distance(&before_cache, &before_turn);

        run(&mut g, 15, 1000).unwrap();

        assert!(g.is_connex());
        let after_cache = DistanceCache::new(&g);
        let after_turn = g.get_turn().unwrap();
        assert!(is_turn_feasible(&g, &after_turn, 15));
        let after = tour_distance(&after_cache, &after_turn);
        assert!(after <= before + 1e-9);
    }

    #[test]
    fn short_tours_are_left_untouched() {
        let depot = Station::depot(0, "Depot", 0.0, 0.0);
        let mut g = RoutingGraph::new(depot).unwrap();
        g.add_station(Station::new(1, "A", 20, "addr", 1.0, 0.0, 10, 10))
            .unwrap();
        // Single station, gap 0 — nothing to route; build a trivial loop manually.
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 0).unwrap();
        run(&mut g, 10, 1000).unwrap();
        assert_eq!(g.get_turn().unwrap(), vec![0, 1, 0]);
    }
}
