//! Benchmark-runner binary: exercises the algorithm-family grid across
//! the four synthetic instance topologies and prints a champion summary.
//!
//! Grounded on `original_source/src/solver/benchmark.py::run_benchmarks`
//! for the parameter choices (`n_stations = 20`, `vehicle_capacity = 12`,
//! `num_problems = 5`, `base_seed = 9783`), and on the teacher crate's
//! `main.rs` for the tracing-subscriber setup and CSV export pattern.

use std::collections::HashMap;
use std::error::Error;

use bssrp_solver::benchmark::{default_algorithms, print_category_results, print_global_summary, run_benchmark, BenchmarkResult};
use bssrp_solver::generators;
use csv::Writer;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const N_STATIONS: usize = 20;
const VEHICLE_CAPACITY: u32 = 12;
const NUM_PROBLEMS: usize = 5;
const BASE_SEED: u64 = 9783;
/// 0 lets rayon pick its default (one thread per core).
const WORKERS: usize = 0;

#[derive(Debug, Serialize)]
struct BenchmarkRow {
    category: String,
    algorithm: String,
    avg_score: f64,
    avg_time_ms: f64,
    avg_gap_percent: f64,
    success_count: usize,
    num_problems: usize,
}

#[tracing::instrument(name = "bssrp-bench", level = "info")]
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().compact())
        .init();

    info!(
        n_stations = N_STATIONS,
        vehicle_capacity = VEHICLE_CAPACITY,
        num_problems = NUM_PROBLEMS,
        base_seed = BASE_SEED,
        "starting benchmark run"
    );

    let algorithms = default_algorithms();

    let categories: Vec<(&str, fn(usize, u32, u64) -> bssrp_solver::Result<bssrp_solver::RoutingGraph>)> = vec![
        ("Random Uniform", generators::uniform),
        ("Clustered", generators::clustered),
        ("Hub-and-Spoke", generators::hub_and_spoke),
        ("Tight Capacity", generators::tight_capacity),
    ];

    let mut all_results: HashMap<String, HashMap<String, BenchmarkResult>> = HashMap::new();

    for (category_name, generator) in &categories {
        info!(category = category_name, "running category");
        let results = run_benchmark(&algorithms, generator, N_STATIONS, VEHICLE_CAPACITY, NUM_PROBLEMS, BASE_SEED, WORKERS);
        print_category_results(category_name, &results, NUM_PROBLEMS);
        all_results.insert(category_name.to_string(), results);
    }

    print_global_summary(&all_results);

    let mut wtr = Writer::from_path("bssrp_bench_results.csv")?;
    for (category, results) in &all_results {
        for result in results.values() {
            wtr.serialize(BenchmarkRow {
                category: category.clone(),
                algorithm: result.name.clone(),
                avg_score: result.avg_score(),
                avg_time_ms: result.avg_time_ms(),
                avg_gap_percent: result.avg_gap_percent(),
                success_count: result.success_count,
                num_problems: NUM_PROBLEMS,
            })?;
        }
    }
    wtr.flush()?;
    info!("wrote bssrp_bench_results.csv");

    Ok(())
}
