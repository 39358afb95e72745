//! Solution reviewer: feasibility assertion, MST-based bounds, and a
//! normalized score (spec section 4.7).
//!
//! Grounded on `original_source/src/solver/reviewer.py`
//! (`assert_solution`, `review_solution`, `compute_bounds`).

use serde::Serialize;

use crate::error::{Result, SolverError};
use crate::graph::RoutingGraph;
use crate::tour::{tour_distance, DistanceCache};

/// Evaluation metrics for one solution (spec section 3, "Solution metrics").
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolutionMetrics {
    pub solved: bool,
    pub distance: f64,
    pub score: f64,
}

/// Confirms `graph` holds a connex tour visiting every station exactly once
/// with a zero net bike gap. Returns the usual graph errors on failure
/// rather than a bespoke assertion type, since both are "this is not a
/// valid solution" conditions the caller must handle identically.
pub fn assert_solution(graph: &RoutingGraph) -> Result<()> {
    if !graph.is_connex() {
        return Err(SolverError::InfeasibleTour("graph is not connex".into()));
    }

    let turn = graph.get_turn()?;
    let mut total_gap = 0i64;
    for &number in &turn {
        if number == 0 {
            continue;
        }
        total_gap += graph.get_station(number)?.gap();
    }
    if total_gap != 0 {
        return Err(SolverError::InfeasibleTour(
            "tour does not have a net bike gap of zero".into(),
        ));
    }

    Ok(())
}

/// Evaluate a completed tour: total distance, MST-based bounds, and the
/// normalized score in `[0, 1]`.
pub fn review_solution(graph: &RoutingGraph) -> Result<SolutionMetrics> {
    assert_solution(graph)?;

    let turn = graph.get_turn()?;
    let cache = DistanceCache::new(graph);
    let distance = tour_distance(&cache, &turn);

    let (lower_bound, upper_bound) = compute_bounds(graph);

    let score = if upper_bound <= lower_bound {
        1.0
    } else {
        (1.0 - (distance - lower_bound) / (upper_bound - lower_bound)).clamp(0.0, 1.0)
    };

    Ok(SolutionMetrics {
        solved: true,
        distance,
        score,
    })
}

/// A 1-tree lower bound (MST over non-depot stations via Prim's algorithm,
/// plus the two shortest depot-to-station edges) and its doubled upper
/// bound. Not a true TSP upper bound — a calibration device for the score.
pub fn compute_bounds(graph: &RoutingGraph) -> (f64, f64) {
    let non_depot: Vec<&crate::station::Station> =
        graph.list_stations().filter(|s| s.number != 0).collect();

    if non_depot.is_empty() {
        return (0.0, 0.0);
    }

    let mut visited = vec![non_depot[0]];
    let mut remaining: Vec<&crate::station::Station> = non_depot[1..].to_vec();
    let mut mst_distance = 0.0;

    while !remaining.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for (ri, r) in remaining.iter().enumerate() {
            for v in &visited {
                let d = graph
                    .distance_between(v.number, r.number)
                    .expect("tour station missing from graph");
                if best.is_none_or(|(_, best_d)| d < best_d) {
                    best = Some((ri, d));
                }
            }
        }
        let (ri, d) = best.expect("remaining is non-empty");
        mst_distance += d;
        visited.push(remaining.remove(ri));
    }

    let mut depot_edges: Vec<f64> = non_depot
        .iter()
        .map(|s| {
            graph
                .distance_between(0, s.number)
                .expect("tour station missing from graph")
        })
        .collect();
    depot_edges.sort_by(f64::total_cmp);
    let two_shortest: f64 = depot_edges.iter().take(2).sum();

    let lower_bound = mst_distance + two_shortest;
    (lower_bound, 2.0 * lower_bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::greedy;
    use crate::station::Station;

    fn sample_graph() -> RoutingGraph {
        let depot = Station::depot(0, "Depot", -1.5536, 47.2173);
        let mut g = RoutingGraph::new(depot).unwrap();
        g.add_station(Station::new(1, "A", 20, "addr", -1.5500, 47.2200, 16, 10))
            .unwrap(); // +6
        g.add_station(Station::new(2, "B", 20, "addr", -1.5600, 47.2100, 5, 9))
            .unwrap(); // -4
        g.add_station(Station::new(3, "C", 20, "addr", -1.5400, 47.2250, 5, 7))
            .unwrap(); // -2
        g
    }

    #[test]
    fn assert_solution_rejects_disconnected_graph() {
        let g = sample_graph();
        assert!(assert_solution(&g).is_err());
    }

    #[test]
    fn assert_solution_accepts_balanced_closed_tour() {
        let mut g = sample_graph();
        greedy::build(&mut g, 20).unwrap();
        assert!(assert_solution(&g).is_ok());
    }

    #[test]
    fn score_is_one_when_distance_equals_lower_bound() {
        // Two stations opposite the depot on a line: the greedy tour equals
        // depot -> far -> near -> depot, which cannot beat the 1-tree bound
        // by construction, so forcing distance == lower_bound is brittle in
        // general. Instead check the invariant directly via compute_bounds.
        let mut g = sample_graph();
        greedy::build(&mut g, 20).unwrap();
        let metrics = review_solution(&g).unwrap();
        assert!((0.0..=1.0).contains(&metrics.score));
        let (lower, _) = compute_bounds(&g);
        if metrics.distance <= lower + 1e-9 {
            assert!((metrics.score - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn compute_bounds_orders_lower_and_upper() {
        let g = sample_graph();
        let (lower, upper) = compute_bounds(&g);
        assert!(lower >= 0.0);
        assert!(upper >= lower);
    }

    #[test]
    fn compute_bounds_is_zero_with_no_stations() {
        let depot = Station::depot(0, "Depot", 0.0, 0.0);
        let g = RoutingGraph::new(depot).unwrap();
        assert_eq!(compute_bounds(&g), (0.0, 0.0));
    }
}
