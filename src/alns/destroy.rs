//! Destroy operators for ALNS (spec section 4.6).

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::graph::RoutingGraph;
use crate::tour::DistanceCache;

/// Sample `k` distinct non-depot station IDs uniformly.
pub fn random_removal(tour: &[u32], k: usize, rng: &mut ChaCha8Rng) -> Vec<u32> {
    let mut candidates: Vec<u32> = tour.iter().copied().filter(|&n| n != 0).collect();
    candidates.dedup();
    let k = k.min(candidates.len());
    candidates.shuffle(rng);
    candidates.truncate(k);
    candidates.sort_unstable();
    candidates
}

/// Rank non-depot stations by detour saving `d(prev,s)+d(s,next)-d(prev,next)`
/// and remove the top-`k` largest.
pub fn worst_removal(cache: &DistanceCache, tour: &[u32], k: usize) -> Vec<u32> {
    let mut scored: Vec<(u32, f64)> = Vec::new();
    for i in 1..tour.len().saturating_sub(1) {
        let prev = tour[i - 1];
        let s = tour[i];
        let next = tour[i + 1];
        let saving = cache.get(prev, s) + cache.get(s, next) - cache.get(prev, next);
        scored.push((s, saving));
    }

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let k = k.min(scored.len());
    let mut removed: Vec<u32> = scored.into_iter().take(k).map(|(s, _)| s).collect();
    removed.sort_unstable();
    removed
}

/// Pick one seed uniformly, then remove it plus the `k-1` non-depot
/// stations closest to it by the graph's distance provider (haversine by
/// default, or whatever was injected via `with_distance_fn`).
pub fn shaw_removal(graph: &RoutingGraph, tour: &[u32], k: usize, rng: &mut ChaCha8Rng) -> Vec<u32> {
    let mut candidates: Vec<u32> = tour.iter().copied().filter(|&n| n != 0).collect();
    candidates.dedup();
    if candidates.is_empty() {
        return Vec::new();
    }

    let seed_idx = rng.gen_range(0..candidates.len());
    let seed = candidates[seed_idx];

    let mut others: Vec<(u32, f64)> = candidates
        .iter()
        .copied()
        .filter(|&n| n != seed)
        .map(|n| {
            let d = graph.distance_between(seed, n).expect("tour station missing from graph");
            (n, d)
        })
        .collect();
    others.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    let k = k.min(candidates.len());
    let mut removed: Vec<u32> = std::iter::once(seed)
        .chain(others.into_iter().take(k.saturating_sub(1)).map(|(n, _)| n))
        .collect();
    removed.sort_unstable();
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::Station;
    use rand::SeedableRng;

    fn sample_graph_and_tour() -> (RoutingGraph, Vec<u32>) {
        let depot = Station::depot(0, "Depot", 0.0, 0.0);
        let mut g = RoutingGraph::new(depot).unwrap();
        g.add_station(Station::new(1, "A", 20, "addr", 1.0, 0.0, 15, 10))
            .unwrap();
        g.add_station(Station::new(2, "B", 20, "addr", 2.0, 0.0, 15, 10))
            .unwrap();
        g.add_station(Station::new(3, "C", 20, "addr", 3.0, 0.0, 5, 15))
            .unwrap();
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        g.add_edge(3, 0).unwrap();
        let tour = g.get_turn().unwrap();
        (g, tour)
    }

    #[test]
    fn random_removal_never_returns_depot() {
        let (_, tour) = sample_graph_and_tour();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let removed = random_removal(&tour, 2, &mut rng);
        assert_eq!(removed.len(), 2);
        assert!(!removed.contains(&0));
    }

    #[test]
    fn random_removal_clamps_to_available() {
        let (_, tour) = sample_graph_and_tour();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let removed = random_removal(&tour, 50, &mut rng);
        assert_eq!(removed.len(), 3);
    }

    #[test]
    fn shaw_removal_includes_seed_and_closest_neighbors() {
        let (g, tour) = sample_graph_and_tour();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let removed = shaw_removal(&g, &tour, 2, &mut rng);
        assert_eq!(removed.len(), 2);
    }

    #[test]
    fn worst_removal_picks_largest_detour_saving() {
        let (g, tour) = sample_graph_and_tour();
        let cache = DistanceCache::new(&g);
        let removed = worst_removal(&cache, &tour, 1);
        assert_eq!(removed.len(), 1);
    }
}
