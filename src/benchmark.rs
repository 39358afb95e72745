//! Parallel multi-algorithm benchmark harness (spec section 4.9).
//!
//! Grounded on `original_source/src/solver/benchmark.py`
//! (`BenchmarkResult`, `run_benchmark`, `print_category_results`,
//! `print_global_summary`), restructured onto `rayon` for the
//! worker-pool concurrency the teacher crate also uses for its
//! neighborhood scoring, and `colored` for the summary tables the
//! teacher crate prints from `solver::tabu_search::search::print_solution`.

use std::collections::HashMap;
use std::time::Instant;

use colored::Colorize;
use rayon::prelude::*;

use crate::builder::Builder;
use crate::config::AlnsConfig;
use crate::error::Result;
use crate::graph::RoutingGraph;
use crate::improve::Improver;
use crate::reviewer::SolutionMetrics;
use crate::solve::solve;

/// One named point in the algorithm-family grid the harness compares
/// (spec section 4.9: `{GREEDY, SURPLUS-DEFICIT} × {none, 2-opt, 2-opt
/// then 3-opt}`, optionally including ALNS).
#[derive(Debug, Clone)]
pub struct Algorithm {
    pub name: &'static str,
    pub builder: Builder,
    pub improvers: Vec<Improver>,
    pub alns: Option<AlnsConfig>,
}

/// The six base families from the algorithm-family grid, plus two ALNS
/// variants (spec section 4.9 calls ALNS out as an optional addition to
/// the grid).
pub fn default_algorithms() -> Vec<Algorithm> {
    vec![
        Algorithm {
            name: "greedy",
            builder: Builder::Greedy,
            improvers: vec![],
            alns: None,
        },
        Algorithm {
            name: "greedy + 2-opt",
            builder: Builder::Greedy,
            improvers: vec![Improver::TwoOpt],
            alns: None,
        },
        Algorithm {
            name: "greedy + 2-opt + 3-opt",
            builder: Builder::Greedy,
            improvers: vec![Improver::TwoOpt, Improver::ThreeOpt],
            alns: None,
        },
        Algorithm {
            name: "surplus-deficit",
            builder: Builder::SurplusDeficit,
            improvers: vec![],
            alns: None,
        },
        Algorithm {
            name: "surplus-deficit + 2-opt",
            builder: Builder::SurplusDeficit,
            improvers: vec![Improver::TwoOpt],
            alns: None,
        },
        Algorithm {
            name: "surplus-deficit + 2-opt + 3-opt",
            builder: Builder::SurplusDeficit,
            improvers: vec![Improver::TwoOpt, Improver::ThreeOpt],
            alns: None,
        },
        Algorithm {
            name: "greedy + 2-opt + 3-opt + alns",
            builder: Builder::Greedy,
            improvers: vec![Improver::TwoOpt, Improver::ThreeOpt],
            alns: Some(AlnsConfig::default()),
        },
        Algorithm {
            name: "surplus-deficit + 2-opt + 3-opt + alns",
            builder: Builder::SurplusDeficit,
            improvers: vec![Improver::TwoOpt, Improver::ThreeOpt],
            alns: Some(AlnsConfig::default()),
        },
    ]
}

/// Aggregate results for one algorithm across every problem instance in a
/// run (spec section 4.9, "per-algorithm aggregates"). Exported to CSV via
/// the flat `BenchmarkRow` in `bin/bssrp_bench.rs`, not by serializing this
/// struct directly — its `Vec` fields hold one entry per problem instance
/// rather than a single flat row.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkResult {
    pub name: String,
    pub scores: Vec<f64>,
    pub times_ms: Vec<f64>,
    pub gaps_percent: Vec<f64>,
    pub failed_seeds: Vec<u64>,
    pub success_count: usize,
}

impl BenchmarkResult {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn avg_score(&self) -> f64 {
        average(&self.scores)
    }

    pub fn avg_time_ms(&self) -> f64 {
        average(&self.times_ms)
    }

    pub fn avg_gap_percent(&self) -> f64 {
        average(&self.gaps_percent)
    }

    pub fn success_rate_percent(&self, total_problems: usize) -> f64 {
        if total_problems == 0 {
            0.0
        } else {
            self.success_count as f64 / total_problems as f64 * 100.0
        }
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Run every algorithm in `algorithms` against `num_problems` instances
/// produced by `generator` with seeds `base_seed + 100*i`, in parallel
/// across `(instance, algorithm)` pairs (spec section 4.9), using a worker
/// pool of `workers` threads (spec section 6, "Benchmark entry"). `workers
/// == 0` falls back to rayon's global default (one thread per core).
pub fn run_benchmark(
    algorithms: &[Algorithm],
    generator: impl Fn(usize, u32, u64) -> Result<RoutingGraph> + Sync,
    n_stations: usize,
    capacity: u32,
    num_problems: usize,
    base_seed: u64,
    workers: usize,
) -> HashMap<String, BenchmarkResult> {
    let pool = if workers > 0 {
        rayon::ThreadPoolBuilder::new().num_threads(workers).build().ok()
    } else {
        None
    };

    let run = || run_benchmark_inner(algorithms, &generator, n_stations, capacity, num_problems, base_seed);

    match &pool {
        Some(pool) => pool.install(run),
        None => run(),
    }
}

fn run_benchmark_inner(
    algorithms: &[Algorithm],
    generator: &(impl Fn(usize, u32, u64) -> Result<RoutingGraph> + Sync),
    n_stations: usize,
    capacity: u32,
    num_problems: usize,
    base_seed: u64,
) -> HashMap<String, BenchmarkResult> {
    let mut results: HashMap<String, BenchmarkResult> =
        algorithms.iter().map(|a| (a.name.to_string(), BenchmarkResult::new(a.name))).collect();

    for i in 0..num_problems {
        let seed = base_seed + 100 * i as u64;
        let instance = generator(n_stations, capacity, seed).ok();

        let per_algorithm: Vec<(&str, Option<(SolutionMetrics, f64)>)> = algorithms
            .par_iter()
            .map(|algo| {
                let outcome = instance.clone().and_then(|mut graph| {
                    let start = Instant::now();
                    let metrics = solve(
                        &mut graph,
                        capacity,
                        algo.builder,
                        &algo.improvers,
                        crate::config::constant::DEFAULT_IMPROVER_MAX_ITERATIONS,
                        algo.alns,
                    )
                    .ok()?;
                    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
                    Some((metrics, elapsed_ms))
                });
                (algo.name, outcome)
            })
            .collect();

        let best_distance = per_algorithm
            .iter()
            .filter_map(|(_, outcome)| outcome.as_ref().map(|(m, _)| m.distance))
            .fold(f64::INFINITY, f64::min);

        for (name, outcome) in per_algorithm {
            let entry = results.get_mut(name).expect("algorithm name registered above");
            match outcome {
                Some((metrics, elapsed_ms)) => {
                    entry.scores.push(metrics.score);
                    entry.times_ms.push(elapsed_ms);
                    entry.success_count += 1;
                    let gap_percent = if best_distance > 0.0 {
                        (metrics.distance - best_distance) / best_distance * 100.0
                    } else {
                        0.0
                    };
                    entry.gaps_percent.push(gap_percent);
                }
                None => entry.failed_seeds.push(seed),
            }
        }
    }

    results
}

/// Print a ranked table for one generator category, sorted by mean gap.
pub fn print_category_results(category_name: &str, results: &HashMap<String, BenchmarkResult>, num_problems: usize) {
    println!("\n{}", "=".repeat(100).blue());
    println!("{} {}", "CATEGORY:".bold(), category_name.bold());
    println!("{}", "=".repeat(100).blue());

    let mut sorted: Vec<&BenchmarkResult> = results.values().collect();
    sorted.sort_by(|a, b| {
        let ga = if a.success_count > 0 { a.avg_gap_percent() } else { f64::INFINITY };
        let gb = if b.success_count > 0 { b.avg_gap_percent() } else { f64::INFINITY };
        ga.total_cmp(&gb)
    });

    for result in &sorted {
        if result.success_count > 0 {
            println!(
                "{:<40} gap={:>7.2}%  score={:>6.4}  time={:>8.2}ms  {}/{} ({:.1}%)",
                result.name,
                result.avg_gap_percent(),
                result.avg_score(),
                result.avg_time_ms(),
                result.success_count,
                num_problems,
                result.success_rate_percent(num_problems)
            );
        } else {
            println!("{:<40} {}", result.name, "no successful runs".red());
        }
    }

    if let Some(best) = sorted.iter().find(|r| r.success_count > 0) {
        println!("\n  {} {} (mean gap {:.2}%)", "best:".green().bold(), best.name, best.avg_gap_percent());
    }
}

/// Print the global champion across every category run.
pub fn print_global_summary(all_results: &HashMap<String, HashMap<String, BenchmarkResult>>) {
    println!("\n{}", "=".repeat(100).blue());
    println!("{}", "GLOBAL SUMMARY (mean over all categories)".bold());
    println!("{}", "=".repeat(100).blue());

    let Some(algo_names): Option<Vec<String>> = all_results.values().next().map(|m| m.keys().cloned().collect())
    else {
        return;
    };

    let mut global: Vec<(String, f64, f64, f64)> = Vec::new();
    for name in algo_names {
        let mut total_gap = 0.0;
        let mut total_score = 0.0;
        let mut total_time = 0.0;
        let mut count = 0;
        for category in all_results.values() {
            if let Some(result) = category.get(&name) {
                if result.success_count > 0 {
                    total_gap += result.avg_gap_percent();
                    total_score += result.avg_score();
                    total_time += result.avg_time_ms();
                    count += 1;
                }
            }
        }
        if count > 0 {
            global.push((name, total_gap / count as f64, total_score / count as f64, total_time / count as f64));
        }
    }

    global.sort_by(|a, b| a.1.total_cmp(&b.1));
    for (name, gap, score, time) in &global {
        println!("{:<40} gap={:>7.2}%  score={:>6.4}  time={:>8.2}ms", name, gap, score, time);
    }

    if let Some((name, gap, score, _)) = global.first() {
        println!("\n{}", "=".repeat(100).blue());
        println!("{} {}", "CHAMPION:".green().bold(), name);
        println!("  mean gap:   {gap:.2}%");
        println!("  mean score: {score:.4}");
        println!("{}", "=".repeat(100).blue());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators;

    #[test]
    fn run_benchmark_produces_one_result_per_algorithm() {
        let algorithms = vec![
            Algorithm {
                name: "greedy",
                builder: Builder::Greedy,
                improvers: vec![],
                alns: None,
            },
            Algorithm {
                name: "surplus-deficit + 2-opt",
                builder: Builder::SurplusDeficit,
                improvers: vec![Improver::TwoOpt],
                alns: None,
            },
        ];

        let results = run_benchmark(&algorithms, generators::uniform, 10, 15, 3, 42, 0);
        assert_eq!(results.len(), 2);
        for result in results.values() {
            assert_eq!(result.success_count, 3);
            assert!(result.failed_seeds.is_empty());
        }
    }

    #[test]
    fn gap_vs_best_is_zero_for_the_best_algorithm() {
        let algorithms = vec![Algorithm {
            name: "only-one",
            builder: Builder::Greedy,
            improvers: vec![],
            alns: None,
        }];
        let results = run_benchmark(&algorithms, generators::uniform, 8, 15, 2, 7, 2);
        let result = &results["only-one"];
        assert!(result.gaps_percent.iter().all(|&g| (g - 0.0).abs() < 1e-9));
    }
}
