//! Sinkhole-ACO CLI
//!
//! Detects sinkhole attacks in a simulated wireless sensor network
//! using ant colony optimization.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use sinkhole_runtime::{
    random_seed, run_trials, simulate, ResearchComparison, RunReport, Settings, SimulationRun,
    TrialSummary,
};

#[derive(Parser)]
#[command(name = "sinkhole")]
#[command(author, version, about = "Sinkhole attack detection in WSNs using ant colony optimization", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one detection: deploy, simulate traffic, detect, evaluate
    Run {
        #[command(flatten)]
        overrides: Overrides,

        /// Write a JSON report of the run
        #[arg(long)]
        report: bool,

        /// Report path (default: report_<timestamp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Repeat the run under consecutive seeds and average the metrics
    Trials {
        #[command(flatten)]
        overrides: Overrides,

        /// Number of trials
        #[arg(short, long, default_value = "10")]
        count: usize,
    },

    /// Print the effective settings as TOML
    Config {
        #[command(flatten)]
        overrides: Overrides,
    },
}

/// Settings file plus per-flag overrides
#[derive(clap::Args)]
struct Overrides {
    /// Settings file (TOML)
    #[arg(long, env = "SINKHOLE_CONFIG")]
    config: Option<PathBuf>,

    /// Number of sensor nodes
    #[arg(long)]
    nodes: Option<usize>,

    /// Number of ants
    #[arg(long)]
    agents: Option<usize>,

    /// ACO iterations
    #[arg(long)]
    iterations: Option<usize>,

    /// Random seed (default: from settings, else random)
    #[arg(long)]
    seed: Option<u64>,
}

impl Overrides {
    fn resolve(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };

        if let Some(nodes) = self.nodes {
            settings.network.num_nodes = nodes;
        }
        if let Some(agents) = self.agents {
            settings.colony.num_agents = agents;
        }
        if let Some(iterations) = self.iterations {
            settings.colony.iterations = iterations;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    FmtSubscriber::builder()
        .with_max_level(log_level(cli.verbose))
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    match cli.command {
        Commands::Run {
            overrides,
            report,
            output,
        } => {
            let settings = overrides.resolve()?;
            run_detection(settings, report, output).await?;
        }
        Commands::Trials { overrides, count } => {
            let settings = overrides.resolve()?;
            run_batch(settings, count).await?;
        }
        Commands::Config { overrides } => {
            let settings = overrides.resolve()?;
            print!("{}", settings.to_toml_string()?);
        }
    }

    Ok(())
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

async fn run_detection(
    settings: Settings,
    write_report: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let seed = settings.seed.unwrap_or_else(random_seed);

    println!("Sinkhole-ACO - Sinkhole attack detection in wireless sensor networks\n");
    println!(
        "Nodes: {} | Ants: {} | Iterations: {} | Seed: {}",
        settings.network.num_nodes, settings.colony.num_agents, settings.colony.iterations, seed
    );
    println!(
        "Alpha={} Beta={} Rho={}\n",
        settings.colony.alpha, settings.colony.beta, settings.colony.rho
    );

    let task_settings = settings.clone();
    let run = tokio::task::spawn_blocking(move || simulate(&task_settings, seed)).await??;

    print_run(&run);

    if write_report {
        let report = RunReport::new(&settings, &run);
        let path = output.unwrap_or_else(|| PathBuf::from(report.default_file_name()));
        report
            .write(&path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("\nReport saved to: {}", path.display());
    }

    Ok(())
}

fn print_run(run: &SimulationRun) {
    let metrics = &run.metrics;
    let mut truth = run.network.sinkhole_nodes().to_vec();
    truth.sort_unstable();
    let detected: Vec<_> = run.detected.iter().collect();

    println!("DETECTION RESULTS:");
    println!("Actual sinkhole attacks: {} {:?}", metrics.total_attacks, truth);
    println!("Attacks detected by ACO: {} {:?}", metrics.detected_attacks, detected);
    println!("True detections: {}", metrics.true_detections);
    println!("False alarms: {}", metrics.false_alarms);

    println!("\nPERFORMANCE METRICS:");
    println!("Detection Rate: {:.2}%", metrics.detection_rate);
    println!("False Alarm Rate: {:.2}%", metrics.false_alarm_rate);
    println!("Packet Delivery Ratio: {:.2}%", metrics.packet_delivery_ratio);
    println!("Message Drop: {:.2}%", metrics.message_drop);

    print_comparison(&ResearchComparison::against_baseline(metrics));
}

fn print_comparison(comparison: &ResearchComparison) {
    println!("\nCOMPARISON WITH PUBLISHED ACO RESULTS:");
    println!(
        "Detection Rate: {:.2}% (published {:.2}%) - {:.2}% {}",
        comparison.detection_rate,
        comparison.baseline_detection_rate,
        comparison.detection_difference.abs(),
        if comparison.detection_better() { "better" } else { "worse" }
    );
    println!(
        "False Alarm Rate: {:.2}% (published {:.2}%) - {:.2}% {}",
        comparison.false_alarm_rate,
        comparison.baseline_false_alarm_rate,
        comparison.false_alarm_difference.abs(),
        if comparison.false_alarms_better() { "better" } else { "worse" }
    );
}

async fn run_batch(settings: Settings, count: usize) -> Result<()> {
    let base_seed = settings.seed.unwrap_or_else(random_seed);

    println!(
        "Running {} trials from seed {} ({} nodes, {} ants, {} iterations)\n",
        count,
        base_seed,
        settings.network.num_nodes,
        settings.colony.num_agents,
        settings.colony.iterations
    );

    let summary = run_trials(&settings, count, base_seed).await?;
    print_summary(&summary);

    Ok(())
}

fn print_summary(summary: &TrialSummary) {
    println!(
        "{:>5}  {:>20}  {:>10}  {:>12}  {:>8}",
        "trial", "seed", "detection", "false alarm", "found"
    );
    for trial in &summary.trials {
        println!(
            "{:>5}  {:>20}  {:>9.2}%  {:>11.2}%  {:>4}/{:<3}",
            trial.trial,
            trial.seed,
            trial.metrics.detection_rate,
            trial.metrics.false_alarm_rate,
            trial.metrics.true_detections,
            trial.metrics.total_attacks
        );
    }

    println!("\nMean Detection Rate: {:.2}%", summary.mean_detection_rate);
    println!("Mean False Alarm Rate: {:.2}%", summary.mean_false_alarm_rate);
    println!("Mean Packet Delivery Ratio: {:.2}%", summary.mean_packet_delivery_ratio);

    print_comparison(&ResearchComparison::from_rates(
        summary.mean_detection_rate,
        summary.mean_false_alarm_rate,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run_overrides() {
        let cli = Cli::try_parse_from([
            "sinkhole", "run", "--nodes", "40", "--agents", "12", "--seed", "9", "--report",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                overrides, report, ..
            } => {
                assert!(report);
                let settings = overrides.resolve().unwrap();
                assert_eq!(settings.network.num_nodes, 40);
                assert_eq!(settings.colony.num_agents, 12);
                assert_eq!(settings.seed, Some(9));
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_verbosity_takes_a_level() {
        let cli = Cli::try_parse_from(["sinkhole", "-v", "2", "config"]).unwrap();
        assert_eq!(log_level(cli.verbose), Level::DEBUG);

        let cli = Cli::try_parse_from(["sinkhole", "config"]).unwrap();
        assert_eq!(log_level(cli.verbose), Level::INFO);
        assert_eq!(log_level(0), Level::ERROR);
        assert_eq!(log_level(7), Level::TRACE);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = Cli::try_parse_from(["sinkhole", "trials", "--agents", "0"]).unwrap();
        match cli.command {
            Commands::Trials { overrides, count } => {
                assert_eq!(count, 10);
                assert!(overrides.resolve().is_err());
            }
            _ => panic!("expected trials command"),
        }
    }
}
