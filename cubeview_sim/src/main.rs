//! CubeView scenario harness CLI
//!
//! Build cubes from seeded workloads and check the aggregation and
//! interaction invariants scenario by scenario.

use clap::Parser;
use cubeview_sim::{ScenarioId, ScenarioResult, ScenarioRunner};
use cubeview_core::{build_cube, CubeSummary};
use cubeview_sim::dataset;
use cubeview_sim::generator::WorkloadGenerator;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// CubeView deterministic scenario harness
#[derive(Parser, Debug)]
#[command(name = "cubeview-sim")]
#[command(about = "Run deterministic scenarios against the CubeView engine", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = derive from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Scenario to run (partition, rebuild, sweep, inspect, mismatch, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Synthetic workload size in records
    #[arg(short, long, default_value = "400")]
    records: usize,

    /// Use the bundled 40-row demo dataset instead of a generated workload
    #[arg(long)]
    demo_data: bool,

    /// Number of consecutive seeds to test (for CI mode)
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Print the global dashboard summary of the workload cube and exit
    #[arg(long)]
    dashboard: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        vec![args.scenario.parse().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            eprintln!("Available scenarios: partition, rebuild, sweep, inspect, mismatch, all");
            std::process::exit(1);
        })]
    };

    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_nanos() as u64
    } else {
        args.seed
    };

    // --dashboard mode: build one cube and print the rollup
    if args.dashboard {
        let (records, catalog) = if args.demo_data {
            (dataset::demo_records(), dataset::demo_catalog())
        } else {
            let mut gen = WorkloadGenerator::new(base_seed);
            let catalog = gen.catalog().clone();
            (gen.records(args.records), catalog)
        };
        match build_cube(&records, &catalog) {
            Ok(cube) => {
                info!("{} records aggregated into {} cells", records.len(), cube.len());
                CubeSummary::from_cube(&cube).print();
            }
            Err(e) => {
                error!("aggregation failed: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if !args.json {
        info!("CubeView Scenario Harness v0.1.0");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    let mut all_results: Vec<ScenarioResult> = Vec::new();
    let mut failed_count = 0;

    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = ScenarioRunner::new(seed)
            .with_records(args.records)
            .with_demo_data(args.demo_data);

        for scenario in &scenarios {
            let result = runner.run(*scenario);

            if !args.json {
                if result.passed {
                    info!("✓ {} (seed={}) PASSED", scenario.name(), seed);
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        scenario.name(),
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }

            if !result.passed {
                failed_count += 1;
            }
            all_results.push(result);
        }
    }

    let total = all_results.len();
    let passed = total - failed_count;

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "seed": r.seed,
                    "passed": r.passed,
                    "records": r.metrics.records,
                    "cells": r.metrics.cells,
                    "failure_reason": r.failure_reason,
                })
            }).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&summary).expect("summary is serializable"));
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        if failed_count == 0 {
            info!("✅ All {} scenario runs passed!", total);
        } else {
            error!("❌ {}/{} scenario runs failed!", failed_count, total);
            for result in &all_results {
                if !result.passed {
                    error!(
                        "  - {} seed={}: {}",
                        result.scenario.name(),
                        result.seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }
        }
    }

    if failed_count > 0 {
        std::process::exit(1);
    }
}
