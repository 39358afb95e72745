//! Routing graph: a directed successor/predecessor chain over a depot plus
//! the imbalanced stations (spec section 4.1).
//!
//! Station records live in a dense arena (`stations`); `succ`/`pred` are
//! arrays indexed by arena position rather than station number, so 2-opt/
//! 3-opt reversals never alias station data while rewriting topology (spec
//! section 9, "Graph representation").

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, SolverError};
use crate::station::{DistanceFn, Station};

#[derive(Clone)]
pub struct RoutingGraph {
    stations: Vec<Station>,
    index_of: HashMap<u32, usize>,
    succ: Vec<Option<usize>>,
    pred: Vec<Option<usize>>,
    /// Pluggable distance provider (spec section 6); `None` falls back to
    /// haversine via `Station::distance_to`.
    distance_fn: Option<Arc<DistanceFn>>,
}

impl std::fmt::Debug for RoutingGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingGraph")
            .field("stations", &self.stations)
            .field("index_of", &self.index_of)
            .field("succ", &self.succ)
            .field("pred", &self.pred)
            .field("distance_fn", &self.distance_fn.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl RoutingGraph {
    /// Create a graph with only the depot (station number 0) present.
    pub fn new(depot: Station) -> Result<Self> {
        if depot.number != 0 {
            return Err(SolverError::InvalidInstance(format!(
                "depot must have station number 0, got {}",
                depot.number
            )));
        }

        let mut graph = Self {
            stations: Vec::new(),
            index_of: HashMap::new(),
            succ: Vec::new(),
            pred: Vec::new(),
            distance_fn: None,
        };
        graph.add_station(depot)?;
        Ok(graph)
    }

    /// Inject a pluggable distance function (spec section 6: "Distance
    /// provider"), replacing the default haversine. The contract is
    /// symmetric, non-negative; the triangle inequality is recommended but
    /// not required.
    pub fn with_distance_fn(mut self, f: impl Fn(&Station, &Station) -> f64 + Send + Sync + 'static) -> Self {
        self.distance_fn = Some(Arc::new(f));
        self
    }

    /// Distance between two stations, honoring an injected distance
    /// function if one was set via [`RoutingGraph::with_distance_fn`].
    fn distance(&self, a: &Station, b: &Station) -> f64 {
        match &self.distance_fn {
            Some(f) => f(a, b),
            None => a.distance_to(b),
        }
    }

    /// Distance between two stations referenced by number.
    pub fn distance_between(&self, a: u32, b: u32) -> Result<f64> {
        let ia = self.idx(a)?;
        let ib = self.idx(b)?;
        Ok(self.distance(&self.stations[ia], &self.stations[ib]))
    }

    pub fn add_station(&mut self, station: Station) -> Result<()> {
        if self.index_of.contains_key(&station.number) {
            return Err(SolverError::InvalidInstance(format!(
                "duplicate station number {}",
                station.number
            )));
        }

        let idx = self.stations.len();
        self.index_of.insert(station.number, idx);
        self.stations.push(station);
        self.succ.push(None);
        self.pred.push(None);
        Ok(())
    }

    pub fn has_station(&self, number: u32) -> bool {
        self.index_of.contains_key(&number)
    }

    fn idx(&self, number: u32) -> Result<usize> {
        self.index_of
            .get(&number)
            .copied()
            .ok_or_else(|| SolverError::InvalidInstance(format!("station {number} does not exist")))
    }

    pub fn get_station(&self, number: u32) -> Result<&Station> {
        Ok(&self.stations[self.idx(number)?])
    }

    pub fn list_stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn size(&self) -> usize {
        self.stations.len()
    }

    pub fn add_edge(&mut self, a: u32, b: u32) -> Result<()> {
        let ia = self.idx(a)?;
        let ib = self.idx(b)?;

        if self.succ[ia].is_some() {
            return Err(SolverError::InvalidEdgeOp(format!(
                "station {a} already has a successor"
            )));
        }

        self.succ[ia] = Some(ib);
        self.pred[ib] = Some(ia);
        Ok(())
    }

    pub fn remove_edge(&mut self, a: u32, b: u32) -> Result<()> {
        if !self.has_edge(a, b)? {
            return Err(SolverError::InvalidEdgeOp(format!(
                "edge {a} -> {b} does not exist"
            )));
        }

        let ia = self.idx(a)?;
        let ib = self.idx(b)?;
        self.succ[ia] = None;
        self.pred[ib] = None;
        Ok(())
    }

    pub fn has_edge(&self, a: u32, b: u32) -> Result<bool> {
        let ia = self.idx(a)?;
        let ib = self.idx(b)?;
        Ok(self.succ[ia] == Some(ib))
    }

    pub fn get_successor(&self, a: u32) -> Result<Option<u32>> {
        let ia = self.idx(a)?;
        Ok(self.succ[ia].map(|i| self.stations[i].number))
    }

    pub fn get_predecessor(&self, a: u32) -> Result<Option<u32>> {
        let ia = self.idx(a)?;
        Ok(self.pred[ia].map(|i| self.stations[i].number))
    }

    pub fn list_edges(&self) -> Vec<(u32, u32)> {
        self.succ
            .iter()
            .enumerate()
            .filter_map(|(ia, s)| s.map(|ib| (self.stations[ia].number, self.stations[ib].number)))
            .collect()
    }

    /// True iff every station has a successor and walking from the depot
    /// following successors visits every station exactly once before
    /// returning to the depot.
    ///
    /// A depot-only graph with no stations to rebalance is connex with zero
    /// edges (`list_edges().len() == size() - 1` in the source), matching
    /// the "nothing to rebalance" instances the generators can produce.
    pub fn is_connex(&self) -> bool {
        if self.stations.len() <= 1 {
            return true;
        }
        if self.succ.iter().any(|s| s.is_none()) {
            return false;
        }

        let depot_idx = match self.index_of.get(&0) {
            Some(&i) => i,
            None => return false,
        };

        let mut visited = vec![false; self.stations.len()];
        let mut cursor = depot_idx;
        let mut count = 0;
        loop {
            if visited[cursor] {
                return cursor == depot_idx && count == self.stations.len();
            }
            visited[cursor] = true;
            count += 1;
            cursor = match self.succ[cursor] {
                Some(next) => next,
                None => return false,
            };
        }
    }

    /// Among stations other than `reference` satisfying `predicate`, return
    /// the one minimizing haversine distance; `None` if no candidate exists.
    pub fn get_nearest_neighbor(
        &self,
        reference: u32,
        predicate: impl Fn(&Station) -> bool,
    ) -> Result<Option<u32>> {
        let reference_station = self.get_station(reference)?;

        let mut nearest: Option<(u32, f64)> = None;
        for candidate in &self.stations {
            if candidate.number == reference || !predicate(candidate) {
                continue;
            }
            let distance = self.distance(reference_station, candidate);
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((candidate.number, distance));
            }
        }

        Ok(nearest.map(|(number, _)| number))
    }

    /// The tour as an ordered list of station numbers, starting and ending
    /// at the depot. Requires a connex graph.
    pub fn get_turn(&self) -> Result<Vec<u32>> {
        if !self.is_connex() {
            return Err(SolverError::InfeasibleTour(
                "graph is not connex; cannot derive a tour".into(),
            ));
        }

        let depot_idx = self.idx(0)?;
        if self.stations.len() <= 1 {
            return Ok(vec![self.stations[depot_idx].number]);
        }

        let mut turn = vec![self.stations[depot_idx].number];
        let mut cursor = depot_idx;
        loop {
            cursor = self.succ[cursor].expect("connex graph has a successor at every station");
            turn.push(self.stations[cursor].number);
            if cursor == depot_idx {
                break;
            }
        }
        Ok(turn)
    }

    /// Replace the current chain with the edges implied by `turn`, an
    /// ordered list of station numbers starting and ending at the depot.
    /// Used by improvers to apply a rewritten tour, and to reconstruct a
    /// graph's topology from a serialized tour (spec property 6).
    pub fn apply_turn(&mut self, turn: &[u32]) -> Result<()> {
        for (a, b) in self.list_edges() {
            self.remove_edge(a, b)?;
        }
        for pair in turn.windows(2) {
            self.add_edge(pair[0], pair[1])?;
        }
        Ok(())
    }
}

/// `is_graph_solvable(graph, Q) ⇔ (∑ gap = 0) ∧ (∀ non-depot s, |gap(s)| ≤ Q/2)`
/// (spec section 6; the intended rule is `≤`, not `<` — see spec section 9
/// open question).
pub fn is_graph_solvable(graph: &RoutingGraph, capacity: u32) -> bool {
    let half = capacity as i64 / 2;
    let mut total = 0i64;
    for station in graph.list_stations() {
        if station.number == 0 {
            continue;
        }
        let gap = station.gap();
        if gap.abs() > half {
            return false;
        }
        total += gap;
    }
    total == 0
}
