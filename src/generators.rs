//! Synthetic instance generators used by the benchmark harness (spec
//! section 7).
//!
//! Grounded on `original_source/src/solver/benchmark.py`
//! (`generate_random_instance`, `generate_clustered_instance`,
//! `generate_hub_spoke_instance`, `generate_tight_capacity_instance`):
//! same capacity/target ranges, same gap-generation-then-redistribution
//! scheme, same per-topology jitter radii and cluster centers. The
//! per-station random draw order is not required to replicate the
//! original's Mersenne-Twister stream bit-for-bit (we seed a different
//! RNG entirely) — only this crate's own determinism (spec property 7)
//! matters here.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::constant::{DEPOT_LATITUDE, DEPOT_LONGITUDE, GEN_CAPACITY_MAX, GEN_CAPACITY_MIN, GEN_TARGET_MARGIN};
use crate::error::Result;
use crate::graph::RoutingGraph;
use crate::station::Station;

const CLUSTER_CENTERS: [(f64, f64); 3] = [(0.03, 0.03), (-0.03, 0.02), (0.0, -0.03)];

/// A uniform random spread of stations within +/-0.05 degrees of the depot.
pub fn uniform(n_stations: usize, capacity: u32, seed: u64) -> Result<RoutingGraph> {
    build_instance(n_stations, capacity, seed, false, |_i, rng, long, lat| {
        (long + rng.gen_range(-0.05..=0.05), lat + rng.gen_range(-0.05..=0.05))
    })
}

/// Stations grouped into three clusters around the depot.
pub fn clustered(n_stations: usize, capacity: u32, seed: u64) -> Result<RoutingGraph> {
    build_instance(n_stations, capacity, seed, false, |i, rng, long, lat| {
        let (dlong, dlat) = CLUSTER_CENTERS[i % CLUSTER_CENTERS.len()];
        (
            long + dlong + rng.gen_range(-0.01..=0.01),
            lat + dlat + rng.gen_range(-0.01..=0.01),
        )
    })
}

/// A star layout: 70% of stations close to the depot, 30% far outliers.
pub fn hub_and_spoke(n_stations: usize, capacity: u32, seed: u64) -> Result<RoutingGraph> {
    build_instance(n_stations, capacity, seed, false, |_i, rng, long, lat| {
        if rng.gen::<f64>() < 0.7 {
            (long + rng.gen_range(-0.02..=0.02), lat + rng.gen_range(-0.02..=0.02))
        } else {
            (long + rng.gen_range(-0.06..=0.06), lat + rng.gen_range(-0.06..=0.06))
        }
    })
}

/// Gaps drawn from 80-100% of the per-station capacity bound, leaving
/// little slack for constructors and improvers to work with.
pub fn tight_capacity(n_stations: usize, capacity: u32, seed: u64) -> Result<RoutingGraph> {
    build_instance(n_stations, capacity, seed, true, |_i, rng, long, lat| {
        (long + rng.gen_range(-0.05..=0.05), lat + rng.gen_range(-0.05..=0.05))
    })
}

fn build_instance(
    n_stations: usize,
    capacity: u32,
    seed: u64,
    tight: bool,
    position: impl Fn(usize, &mut ChaCha8Rng, f64, f64) -> (f64, f64),
) -> Result<RoutingGraph> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let depot = Station::depot(0, "Depot", DEPOT_LONGITUDE, DEPOT_LATITUDE);
    let mut graph = RoutingGraph::new(depot)?;

    if n_stations == 0 {
        return Ok(graph);
    }

    let max_gap = (capacity / 2) as i64;
    if n_stations > 1 && max_gap < 1 {
        return Err(crate::error::SolverError::InvalidInstance(format!(
            "capacity {capacity} is too small to generate a non-trivial gap (need capacity >= 2)"
        )));
    }
    let gaps = generate_gaps(n_stations, max_gap, tight, &mut rng);

    for (i, gap) in gaps.into_iter().enumerate() {
        let number = (i + 1) as u32;
        let (longitude, latitude) = position(i, &mut rng, DEPOT_LONGITUDE, DEPOT_LATITUDE);

        let station_capacity = rng.gen_range(GEN_CAPACITY_MIN..=GEN_CAPACITY_MAX) as u32;
        let bike_target = rng.gen_range(GEN_TARGET_MARGIN..=(station_capacity as i64 - GEN_TARGET_MARGIN));
        let bike_count = bike_target + gap;

        let name = station_name(i);
        graph.add_station(Station::new(
            number,
            name.clone(),
            station_capacity,
            format!("{number} Rue {name}"),
            longitude,
            latitude,
            bike_count,
            bike_target,
        ))?;
    }

    Ok(graph)
}

fn station_name(i: usize) -> String {
    if i < 26 {
        format!("Station {}", (b'A' + i as u8) as char)
    } else {
        format!("Station {}", i + 1)
    }
}

/// Alternating-sign gaps, with the final gap forced to zero the running
/// sum and, if that violates the capacity bound, redistributed across the
/// other gaps (spec sections 4.3/7, "total gap is zero by construction").
fn generate_gaps(n_stations: usize, max_gap: i64, tight: bool, rng: &mut ChaCha8Rng) -> Vec<i64> {
    let tight_edge = ((max_gap as f64) * 0.8) as i64;
    let mut gaps = Vec::with_capacity(n_stations);

    for i in 0..n_stations.saturating_sub(1) {
        let gap = if i % 2 == 0 {
            if tight {
                rng.gen_range(tight_edge..=max_gap)
            } else {
                rng.gen_range(1..=max_gap)
            }
        } else if tight {
            rng.gen_range(-max_gap..=-tight_edge)
        } else {
            rng.gen_range(-max_gap..=-1)
        };
        gaps.push(gap);
    }

    let current_sum: i64 = gaps.iter().sum();
    let mut last_gap = -current_sum;

    if last_gap.abs() > max_gap {
        let mut excess = last_gap.abs() - max_gap;
        last_gap = if last_gap > 0 { max_gap } else { -max_gap };

        for g in gaps.iter_mut() {
            if excess == 0 {
                break;
            }
            if *g > 0 && last_gap < 0 {
                let adjustment = excess.min(*g - 1);
                *g -= adjustment;
                excess -= adjustment;
            } else if *g < 0 && last_gap > 0 {
                let adjustment = excess.min(-*g - 1);
                *g += adjustment;
                excess -= adjustment;
            }
        }
    }

    gaps.push(last_gap);
    gaps
}
