//! Shared tour helpers used by the improvers and ALNS: load-feasibility
//! simulation and a memoizing distance cache (spec section 4.4).

use std::cell::RefCell;
use std::collections::HashMap;

use crate::graph::RoutingGraph;

/// Memoizes `d(a, b)` by ordered pair within one improver/ALNS invocation.
/// Distances are symmetric but the cache key is the ordered pair, per the
/// design note in spec section 9 — do not assume symmetry in cache lookup
/// unless the caller canonicalizes the key itself.
pub struct DistanceCache<'g> {
    graph: &'g RoutingGraph,
    cache: RefCell<HashMap<(u32, u32), f64>>,
}

impl<'g> DistanceCache<'g> {
    pub fn new(graph: &'g RoutingGraph) -> Self {
        Self {
            graph,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn get(&self, a: u32, b: u32) -> f64 {
        if let Some(&d) = self.cache.borrow().get(&(a, b)) {
            return d;
        }
        let d = self
            .graph
            .distance_between(a, b)
            .expect("tour station missing from graph");
        self.cache.borrow_mut().insert((a, b), d);
        d
    }
}

/// Total length of a closed tour (first and last entries are both the
/// depot).
pub fn tour_distance(cache: &DistanceCache, turn: &[u32]) -> f64 {
    turn.windows(2).map(|w| cache.get(w[0], w[1])).sum()
}

/// Simulates vehicle load along `turn` (depot excluded from load
/// accounting) and rejects if the load ever leaves `[0, capacity]`.
pub fn is_turn_feasible(graph: &RoutingGraph, turn: &[u32], capacity: u32) -> bool {
    let mut load: i64 = 0;
    for &number in turn.iter().skip(1) {
        if number == 0 {
            continue;
        }
        let gap = graph
            .get_station(number)
            .expect("tour station missing from graph")
            .gap();
        load += gap;
        if load < 0 || load > capacity as i64 {
            return false;
        }
    }
    true
}
