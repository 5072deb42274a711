//! Container loading benchmark CLI

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use u_loading_benchmark::{
    BenchmarkConfig, BenchmarkResult, BenchmarkRunner, InstanceGenerator, InstanceParser, Preset,
};

#[derive(Parser)]
#[command(name = "load-bench")]
#[command(about = "Benchmark runner for the u-loading container planner")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic instance file
    Generate {
        /// Instance size
        #[arg(short, long, value_enum, default_value = "medium")]
        preset: PresetArg,

        /// Generator seed
        #[arg(short, long, default_value = "1")]
        seed: u64,

        /// Output file (JSON)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Run benchmarks on synthetic instances
    Run {
        /// Instance sizes
        #[arg(short, long, value_enum, default_values_t = vec![PresetArg::Small, PresetArg::Medium])]
        presets: Vec<PresetArg>,

        /// Instances generated per preset
        #[arg(short, long, default_value = "3")]
        instances: u64,

        /// Runs per instance
        #[arg(short, long, default_value = "1")]
        runs: usize,

        /// Base seed
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Annealing workers per round
        #[arg(long)]
        sa_runs: Option<usize>,

        /// Proposals per annealing worker
        #[arg(long, default_value = "20000")]
        iter_limit: u64,

        /// Use the short smoke-test configuration
        #[arg(long)]
        quick: bool,

        /// Output file for results (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for CSV results
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Run benchmark on a saved instance file
    RunFile {
        /// Path to the JSON instance file
        file: PathBuf,

        /// Runs per instance
        #[arg(short, long, default_value = "1")]
        runs: usize,

        /// Base seed
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Output file for results (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    /// Small van, few object types
    Small,
    /// 20 ft container
    Medium,
    /// 40 ft container
    Large,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Small => Preset::Small,
            PresetArg::Medium => Preset::Medium,
            PresetArg::Large => Preset::Large,
        }
    }
}

fn print_comparison(results: &BenchmarkResult) {
    println!("\nInstance Comparison:");
    println!("{:-<72}", "");
    for summary in results.summary_by_instance() {
        println!(
            "  {:<20} runs={:<3} avg_util={:.1}% best_util={:.1}% avg_placed={:.1} avg_time={}ms",
            summary.instance,
            summary.run_count,
            summary.avg_utilization * 100.0,
            summary.best_utilization * 100.0,
            summary.avg_placed,
            summary.avg_time_ms
        );
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            preset,
            seed,
            output,
        } => {
            let instance = InstanceGenerator::new(seed).generate(preset.into());
            InstanceParser::new().save_file(&instance, &output)?;

            let info = instance.info();
            println!("Instance saved to: {}", output.display());
            println!("  Object types: {}", info.object_types);
            println!("  Total items: {}", info.total_items);
            println!(
                "  Footprint / floor: {:.2} / {:.2}",
                info.total_footprint_area, info.floor_area
            );
        }

        Commands::Run {
            presets,
            instances,
            runs,
            seed,
            sa_runs,
            iter_limit,
            quick,
            output,
            csv,
        } => {
            let mut config = if quick {
                BenchmarkConfig::quick()
            } else {
                BenchmarkConfig::new().with_iter_limit(iter_limit)
            };
            config = config.with_runs_per_instance(runs).with_seed(seed);
            if let Some(n) = sa_runs {
                config = config.with_sa_runs(n);
            }

            let generated: Vec<_> = presets
                .into_iter()
                .flat_map(|preset| {
                    (0..instances).map(move |k| {
                        InstanceGenerator::new(seed.wrapping_add(k)).generate(preset.into())
                    })
                })
                .collect();

            let results = BenchmarkRunner::new(config).run_all(&generated);
            results.print_summary();
            print_comparison(&results);

            if let Some(path) = output {
                results.save_json(&path)?;
                println!("\nResults saved to: {}", path.display());
            }

            if let Some(path) = csv {
                results.save_csv(&path)?;
                println!("CSV saved to: {}", path.display());
            }
        }

        Commands::RunFile {
            file,
            runs,
            seed,
            output,
        } => {
            let instance = InstanceParser::new().parse_file(&file)?;

            let config = BenchmarkConfig::new()
                .with_runs_per_instance(runs)
                .with_seed(seed);

            let results = BenchmarkRunner::new(config).run_instance(&instance);
            results.print_summary();

            if let Some(path) = output {
                results.save_json(&path)?;
                println!("Results saved to: {}", path.display());
            }
        }
    }

    Ok(())
}
