//! GREEDY nearest-feasible constructor (spec section 4.2).
//!
//! Grounded on `original_source/src/solver/algorithm/builder/greedy.py`
//! and `original_source/src/solver/method1.py::create_path`, translated
//! into the Rust `RoutingGraph` API and made deterministic: rather than the
//! original's random tie-break among closest loading stations, this picks
//! the unique nearest one, as spec section 4.2 recommends for
//! reproducibility.

use crate::error::{Result, SolverError};
use crate::graph::RoutingGraph;

/// Build a closed tour starting and ending at the depot. `graph` must
/// already contain the depot and every imbalanced station.
pub fn build(graph: &mut RoutingGraph, capacity: u32) -> Result<()> {
    if graph.size() <= 1 {
        // Depot-only instance: nothing needs to be picked up or dropped
        // off, so the empty-edge graph is already a (trivial) solution.
        return Ok(());
    }

    let capacity = capacity as i64;

    let first = graph
        .get_nearest_neighbor(0, |s| s.is_loading())?
        .ok_or_else(|| {
            SolverError::UnsolvableWithHeuristic("no loading station reachable from depot".into())
        })?;

    graph.add_edge(0, first)?;
    let mut load = graph.get_station(first)?.gap();
    let mut cursor = first;

    for _ in 0..graph.size().saturating_sub(2) {
        let next = graph.get_nearest_neighbor(cursor, |s| {
            s.number != 0
                && s.number != cursor
                && graph.get_predecessor(s.number).unwrap_or(None).is_none()
                && 0 <= load + s.gap()
                && load + s.gap() <= capacity
        })?;

        let next = next.ok_or_else(|| {
            SolverError::UnsolvableWithHeuristic(format!(
                "no feasible successor for station {cursor} at load {load}"
            ))
        })?;

        graph.add_edge(cursor, next)?;
        load += graph.get_station(next)?.gap();
        cursor = next;
    }

    graph.add_edge(cursor, 0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::Station;

    fn sample_graph() -> RoutingGraph {
        // spec scenario S1
        let depot = Station::depot(0, "Depot", -1.5536, 47.2173);
        let mut g = RoutingGraph::new(depot).unwrap();
        g.add_station(Station::new(1, "A", 20, "addr", -1.5500, 47.2200, 16, 10))
            .unwrap(); // gap +6
        g.add_station(Station::new(2, "B", 15, "addr", -1.5600, 47.2100, 12, 10))
            .unwrap(); // gap +2
        g.add_station(Station::new(3, "C", 18, "addr", -1.5400, 47.2250, 5, 9))
            .unwrap(); // gap -4
        g.add_station(Station::new(4, "D", 16, "addr", -1.5700, 47.2050, 3, 7))
            .unwrap(); // gap -4
        g
    }

    #[test]
    fn s1_builds_feasible_closed_tour() {
        let mut g = sample_graph();
        build(&mut g, 20).unwrap();

        assert!(g.is_connex());
        let turn = g.get_turn().unwrap();
        assert_eq!(turn.first(), Some(&0));
        assert_eq!(turn.last(), Some(&0));
        // 4 non-depot stations plus the depot visited twice (start and end).
        assert_eq!(turn.len(), 6);

        let mut load = 0i64;
        for &n in turn.iter().skip(1).take(turn.len() - 2) {
            load += g.get_station(n).unwrap().gap();
            assert!((0..=20).contains(&load));
        }
    }

    #[test]
    fn unsolvable_instance_reports_heuristic_failure() {
        // Only one loading station, picked first unconditionally; neither
        // remaining station keeps the load within [0, capacity] afterwards.
        let depot = Station::depot(0, "Depot", 0.0, 0.0);
        let mut g = RoutingGraph::new(depot).unwrap();
        g.add_station(Station::new(1, "A", 40, "addr", 0.001, 0.0, 20, 0))
            .unwrap(); // gap +20
        g.add_station(Station::new(2, "B", 40, "addr", 0.002, 0.0, 10, 0))
            .unwrap(); // gap +10
        g.add_station(Station::new(3, "C", 40, "addr", 0.003, 0.0, 0, 30))
            .unwrap(); // gap -30
        let err = build(&mut g, 5).unwrap_err();
        assert!(matches!(err, SolverError::UnsolvableWithHeuristic(_)));
    }

    #[test]
    fn depot_only_instance_is_a_trivial_success() {
        let depot = Station::depot(0, "Depot", 0.0, 0.0);
        let mut g = RoutingGraph::new(depot).unwrap();
        build(&mut g, 20).unwrap();
        assert!(g.is_connex());
        assert_eq!(g.get_turn().unwrap(), vec![0]);
    }
}
