//! Greedy cheapest-insertion repair operator (spec section 4.6).

use crate::graph::RoutingGraph;
use crate::tour::{is_turn_feasible, DistanceCache};

/// Re-insert every station in `removed` into `tour` (which must already
/// exclude them) at its cheapest feasible position, processing stations in
/// ascending station-number order and breaking cost ties by the lowest
/// insertion position. Returns `None` if any station has no feasible slot.
pub fn greedy_repair(
    graph: &RoutingGraph,
    tour: &[u32],
    removed: &[u32],
    capacity: u32,
    cache: &DistanceCache,
) -> Option<Vec<u32>> {
    let mut working = tour.to_vec();
    let mut order = removed.to_vec();
    order.sort_unstable();

    for station in order {
        let mut best: Option<(usize, f64)> = None;

        for pos in 1..working.len() {
            let prev = working[pos - 1];
            let next = working[pos];
            let cost = cache.get(prev, station) + cache.get(station, next) - cache.get(prev, next);

            if best.as_ref().is_some_and(|(_, best_cost)| cost >= *best_cost) {
                continue;
            }

            let mut candidate = working[..pos].to_vec();
            candidate.push(station);
            candidate.extend_from_slice(&working[pos..]);
            if is_turn_feasible(graph, &candidate, capacity) {
                best = Some((pos, cost));
            }
        }

        let (pos, _) = best?;
        working.insert(pos, station);
    }

    Some(working)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::Station;

    fn sample_graph() -> RoutingGraph {
        let depot = Station::depot(0, "Depot", 0.0, 0.0);
        let mut g = RoutingGraph::new(depot).unwrap();
        g.add_station(Station::new(1, "A", 20, "addr", 1.0, 0.0, 15, 10))
            .unwrap(); // +5
        g.add_station(Station::new(2, "B", 20, "addr", 2.0, 0.0, 5, 10))
            .unwrap(); // -5
        g.add_station(Station::new(3, "C", 20, "addr", 3.0, 0.0, 15, 10))
            .unwrap(); // +5
        g
    }

    #[test]
    fn reinserts_removed_station_at_cheapest_feasible_slot() {
        let g = sample_graph();
        let cache = DistanceCache::new(&g);
        let tour = vec![0, 1, 3, 0];
        let repaired = greedy_repair(&g, &tour, &[2], 20, &cache).expect("feasible repair");
        assert_eq!(repaired.len(), 5);
        assert!(repaired.contains(&2));
        assert!(is_turn_feasible(&g, &repaired, 20));
    }

    #[test]
    fn fails_when_no_feasible_slot_exists() {
        let g = sample_graph();
        let cache = DistanceCache::new(&g);
        // Capacity 1 leaves no room for the unloading station regardless of
        // insertion point given the pickups already in the tour.
        let tour = vec![0, 1, 3, 0];
        assert!(greedy_repair(&g, &tour, &[2], 1, &cache).is_none());
    }
}
