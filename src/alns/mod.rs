//! Adaptive Large Neighborhood Search improver (spec section 4.6).
//!
//! Grounded on `original_source/src/solver/algorithm/improver/alns.py`
//! (destroy operator list, roulette-wheel selection, greedy repair,
//! simulated-annealing acceptance, adaptive weight update), restructured
//! onto `RoutingGraph`/`DistanceCache` and into the destroy/repair module
//! split the teacher crate uses for its own `solver::tabu_search`
//! destroy-and-recreate machinery.

pub mod destroy;
pub mod repair;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::constant::{
    ALNS_COOLING_RATE, ALNS_INITIAL_TEMPERATURE_FACTOR, ALNS_MIN_TEMPERATURE,
    ALNS_SCORE_BETTER_THAN_CURRENT, ALNS_SCORE_NEW_BEST, ALNS_SCORE_REJECTED, ALNS_SCORE_SA_ACCEPT,
};
use crate::config::AlnsConfig;
use crate::error::Result;
use crate::graph::RoutingGraph;
use crate::tour::{is_turn_feasible, tour_distance, DistanceCache};

const OPERATOR_COUNT: usize = 3;

/// Improve the tour currently held by `graph` in place via ALNS. Requires
/// `graph` to already hold a connex closed tour with at least one
/// non-depot station.
pub fn run(graph: &mut RoutingGraph, capacity: u32, config: AlnsConfig) -> Result<()> {
    if graph.size() <= 1 {
        return Ok(());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let cache = DistanceCache::new(graph);

    let initial_turn = graph.get_turn()?;
    let mut current_turn = initial_turn.clone();
    let mut current_distance = tour_distance(&cache, &current_turn);
    let mut best_turn = current_turn.clone();
    let mut best_distance = current_distance;

    let mut weights = [1.0_f64; OPERATOR_COUNT];
    let mut temperature = (current_distance * ALNS_INITIAL_TEMPERATURE_FACTOR).max(ALNS_MIN_TEMPERATURE);

    for _ in 0..config.max_iterations {
        let op = roulette_wheel_selection(&weights, &mut rng);

        let removed = match op {
            0 => destroy::random_removal(&current_turn, config.removal_size, &mut rng),
            1 => destroy::worst_removal(&cache, &current_turn, config.removal_size),
            _ => destroy::shaw_removal(graph, &current_turn, config.removal_size, &mut rng),
        };
        if removed.is_empty() {
            continue;
        }

        let remaining: Vec<u32> = current_turn.iter().copied().filter(|n| !removed.contains(n)).collect();
        let Some(candidate) = repair::greedy_repair(graph, &remaining, &removed, capacity, &cache) else {
            continue;
        };

        let candidate_distance = tour_distance(&cache, &candidate);
        let score;

        if candidate_distance < best_distance - 1e-9 {
            best_turn = candidate.clone();
            best_distance = candidate_distance;
            current_turn = candidate;
            current_distance = candidate_distance;
            score = ALNS_SCORE_NEW_BEST;
            info!(operator = op, distance = best_distance, "alns found a new best tour");
        } else if candidate_distance < current_distance - 1e-9 {
            current_turn = candidate;
            current_distance = candidate_distance;
            score = ALNS_SCORE_BETTER_THAN_CURRENT;
        } else {
            let delta = candidate_distance - current_distance;
            let accept_probability = (-delta / temperature).exp();
            if rng.gen::<f64>() < accept_probability {
                current_turn = candidate;
                current_distance = candidate_distance;
                score = ALNS_SCORE_SA_ACCEPT;
            } else {
                score = ALNS_SCORE_REJECTED;
            }
        }

        weights[op] += score;
        temperature = (temperature * ALNS_COOLING_RATE).max(ALNS_MIN_TEMPERATURE);
    }

    graph.apply_turn(&best_turn)?;
    debug_assert!(is_turn_feasible(graph, &best_turn, capacity));
    debug!(iterations = config.max_iterations, best_distance, "alns run complete");
    Ok(())
}

/// Select an operator index with probability proportional to its weight.
fn roulette_wheel_selection(weights: &[f64; OPERATOR_COUNT], rng: &mut ChaCha8Rng) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.gen_range(0..OPERATOR_COUNT);
    }

    let mut threshold = rng.gen::<f64>() * total;
    for (i, &w) in weights.iter().enumerate() {
        if threshold < w {
            return i;
        }
        threshold -= w;
    }
    OPERATOR_COUNT - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::greedy;
    use crate::station::Station;

    fn clustered_like_graph() -> RoutingGraph {
        let depot = Station::depot(0, "Depot", -1.5536, 47.2173);
        let mut g = RoutingGraph::new(depot).unwrap();
        let coords = [
            (0.03, 0.03),
            (-0.03, 0.02),
            (0.0, -0.03),
            (0.031, 0.029),
            (-0.029, 0.021),
            (0.001, -0.031),
        ];
        let gaps = [5, -3, 4, -4, 3, -5];
        for (idx, (&(dlong, dlat), &gap)) in coords.iter().zip(gaps.iter()).enumerate() {
            let number = (idx + 1) as u32;
            let target = 10i64;
            let count = target + gap as i64;
            g.add_station(Station::new(
                number,
                format!("S{number}"),
                20,
                "addr",
                -1.5536 + dlong,
                47.2173 + dlat,
                count,
                target,
            ))
            .unwrap();
        }
        g
    }

    #[test]
    fn never_makes_the_tour_worse_than_the_starting_point() {
        let mut g = clustered_like_graph();
        greedy::build(&mut g, 12).unwrap();

        let cache = DistanceCache::new(&g);
        let before = tour_distance(&cache, &g.get_turn().unwrap());

        let config = AlnsConfig {
            max_iterations: 200,
            removal_size: 2,
            seed: 42,
        };
        run(&mut g, 12, config).unwrap();

        assert!(g.is_connex());
        let final_turn = g.get_turn().unwrap();
        assert!(is_turn_feasible(&g, &final_turn, 12));
        let cache2 = DistanceCache::new(&g);
        let after = tour_distance(&cache2, &final_turn);
        assert!(after <= before + 1e-9);
    }

    #[test]
    fn is_deterministic_given_a_fixed_seed() {
        let mut g1 = clustered_like_graph();
        greedy::build(&mut g1, 12).unwrap();
        let config = AlnsConfig {
            max_iterations: 100,
            removal_size: 2,
            seed: 7,
        };
        run(&mut g1, 12, config).unwrap();
        let turn1 = g1.get_turn().unwrap();

        let mut g2 = clustered_like_graph();
        greedy::build(&mut g2, 12).unwrap();
        run(&mut g2, 12, config).unwrap();
        let turn2 = g2.get_turn().unwrap();

        assert_eq!(turn1, turn2);
    }

    #[test]
    fn single_station_instance_is_a_no_op() {
        let depot = Station::depot(0, "Depot", 0.0, 0.0);
        let mut g = RoutingGraph::new(depot).unwrap();
        let config = AlnsConfig::default();
        assert!(run(&mut g, 20, config).is_ok());
    }
}
