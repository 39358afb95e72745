//! SURPLUS-DEFICIT interleave constructor (spec section 4.3).
//!
//! Grounded on
//! `original_source/src/solver/algorithm/builder/method2.py` (functions
//! `construire_chemin_surplus_graph` and `method2`), translated onto the
//! Rust `RoutingGraph` API. One deviation from the original: the tail phase
//! that appends leftover deficit stations after the last surplus stop
//! picks the *nearest* remaining deficit at each step rather than walking
//! the stations in their arbitrary enumeration order — spec section 4.3
//! calls for appending "greedily", and nearest-neighbor order is the only
//! reading of "greedily" consistent with the rest of the algorithm. See
//! DESIGN.md for this Open Question resolution.

use std::collections::HashMap;

use crate::error::{Result, SolverError};
use crate::graph::RoutingGraph;

/// Build a closed tour starting and ending at the depot by visiting surplus
/// stations in nearest-neighbor order and opportunistically interleaving
/// deficit stations between them.
pub fn build(graph: &mut RoutingGraph, capacity: u32) -> Result<()> {
    let capacity = capacity as i64;

    let surplus_order = surplus_visiting_order(graph)?;
    if surplus_order.is_empty() {
        // No surplus stations; nothing needs to be picked up or dropped off.
        return Ok(());
    }

    let mut remaining_gap: HashMap<u32, i64> = graph
        .list_stations()
        .map(|s| (s.number, s.gap()))
        .collect();

    let mut deficits: Vec<u32> = graph
        .list_stations()
        .filter(|s| s.is_unloading())
        .map(|s| s.number)
        .collect();

    let mut current = surplus_order[0];
    graph.add_edge(0, current)?;
    let mut load = remaining_gap[&current];
    remaining_gap.insert(current, 0);

    for &next in &surplus_order[1..] {
        // Opportunistically interleave deficit stops between current and next.
        loop {
            let possible: Vec<u32> = deficits
                .iter()
                .copied()
                .filter(|d| -remaining_gap[d] <= load)
                .collect();
            if possible.is_empty() {
                break;
            }

            let nearest = graph.get_nearest_neighbor(current, |s| possible.contains(&s.number))?;
            let Some(nearest) = nearest else { break };

            if graph.distance_between(current, nearest)? < graph.distance_between(current, next)? {
                let need = -remaining_gap[&nearest];
                load -= need;
                remaining_gap.insert(nearest, 0);
                graph.add_edge(current, nearest)?;
                deficits.retain(|&d| d != nearest);
                current = nearest;
            } else {
                break;
            }
        }

        graph.add_edge(current, next)?;
        current = next;

        // `next` is visited exactly once, so its whole gap must be settled
        // here — partial pickup/drop-off would leave bikes unaccounted for
        // with no later stop to revisit this station.
        let diff = remaining_gap[&next];
        if diff > 0 {
            if load + diff > capacity {
                return Err(SolverError::UnsolvableWithHeuristic(format!(
                    "no capacity left to pick up station {next} (load {load}, gap {diff}, capacity {capacity})"
                )));
            }
            load += diff;
            remaining_gap.insert(next, 0);
        } else if diff < 0 {
            if -diff > load {
                return Err(SolverError::UnsolvableWithHeuristic(format!(
                    "not enough load to drop off station {next} (load {load}, gap {diff})"
                )));
            }
            load += diff;
            remaining_gap.insert(next, 0);
        }
    }

    // Append any remaining deficit stations, nearest-first, skipping any
    // whose drop-off would take the load below zero (spec section 4.3,
    // load stays within [0, Q] at every step).
    while !deficits.is_empty() {
        let nearest = graph
            .get_nearest_neighbor(current, |s| deficits.contains(&s.number) && -remaining_gap[&s.number] <= load)?
            .ok_or_else(|| {
                SolverError::UnsolvableWithHeuristic(
                    "no remaining deficit station can be dropped off without the load going negative".into(),
                )
            })?;

        let need = -remaining_gap[&nearest];
        load -= need;
        remaining_gap.insert(nearest, 0);
        graph.add_edge(current, nearest)?;
        deficits.retain(|&d| d != nearest);
        current = nearest;
    }

    graph.add_edge(current, 0)?;
    Ok(())
}

/// Provisional visiting order of surplus stations via greedy-nearest chain
/// starting from the depot (spec 4.3 phase 1).
fn surplus_visiting_order(graph: &RoutingGraph) -> Result<Vec<u32>> {
    let mut remaining: Vec<u32> = graph
        .list_stations()
        .filter(|s| s.is_loading())
        .map(|s| s.number)
        .collect();

    let mut order = Vec::with_capacity(remaining.len());
    let mut current = 0u32;

    while !remaining.is_empty() {
        let nearest = graph
            .get_nearest_neighbor(current, |s| remaining.contains(&s.number))?
            .expect("remaining is non-empty so a nearest candidate exists");
        order.push(nearest);
        remaining.retain(|&n| n != nearest);
        current = nearest;
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::Station;

    fn sample_graph() -> RoutingGraph {
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
    fn builds_closed_tour_visiting_every_station() {
        let mut g = sample_graph();
        build(&mut g, 20).unwrap();

        assert!(g.is_connex());
        let turn = g.get_turn().unwrap();
        // 4 non-depot stations plus the depot visited twice (start and end).
        assert_eq!(turn.len(), 6);
        assert_eq!(turn.first(), Some(&0));
        assert_eq!(turn.last(), Some(&0));
    }

    #[test]
    fn reports_unsolvable_instead_of_clamping_an_infeasible_pickup() {
        // Two surplus stations whose combined gap exceeds capacity: the
        // second pickup cannot be fully settled, so the builder must fail
        // rather than silently picking up only part of its gap.
        let depot = Station::depot(0, "Depot", 0.0, 0.0);
        let mut g = RoutingGraph::new(depot).unwrap();
        g.add_station(Station::new(1, "A", 20, "addr", 0.001, 0.0, 16, 10))
            .unwrap(); // gap +6
        g.add_station(Station::new(2, "B", 20, "addr", 0.002, 0.0, 16, 10))
            .unwrap(); // gap +6
        let err = build(&mut g, 10).unwrap_err();
        assert!(matches!(err, SolverError::UnsolvableWithHeuristic(_)));
    }

    #[test]
    fn no_surplus_stations_leaves_graph_untouched() {
        let depot = Station::depot(0, "Depot", 0.0, 0.0);
        let mut g = RoutingGraph::new(depot).unwrap();
        build(&mut g, 20).unwrap();
        assert_eq!(g.list_edges().len(), 0);
    }
}
