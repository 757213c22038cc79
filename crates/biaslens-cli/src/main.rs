use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use biaslens_analysis::{EvaluationOutcome, EvaluationRequest, EvaluationRunner, TrendReport};
use biaslens_config::load_workspace_config;
use biaslens_core::{Baseline, DescriptionMode, HeuristicType};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "BIASLENS heuristic bias evaluation runner")]
struct Cli {
    #[arg(
        long,
        default_value = ".",
        help = "Workspace root holding .biaslens/config.toml"
    )]
    workspace: PathBuf,

    #[arg(
        long,
        default_value = "anchoring,loss_aversion,sunk_cost,confirmation_bias,availability_heuristic",
        help = "Comma-separated heuristic types to evaluate"
    )]
    heuristics: String,

    #[arg(
        long,
        default_value_t = 100,
        help = "Trials per heuristic type, validated against the configured bounds"
    )]
    iterations: u32,

    #[arg(long, help = "Seed for reproducible runs; defaults to OS entropy")]
    seed: Option<u64>,

    #[arg(
        long,
        default_value = "technical",
        value_parser = parse_mode,
        help = "Which recommendation description to surface: technical or simplified"
    )]
    mode: DescriptionMode,

    #[arg(long, help = "Include the longitudinal trend and drift section")]
    trend: bool,

    #[arg(
        long,
        default_value = "table",
        value_parser = parse_output_format,
        help = "Output format: table or json"
    )]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
struct CliReport<'a> {
    evaluation: &'a EvaluationOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    trend: Option<&'a TrendReport>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_workspace_config(&cli.workspace).with_context(|| {
        format!(
            "failed to load workspace config under {}",
            cli.workspace.display()
        )
    })?;

    let heuristic_types = parse_heuristics(&cli.heuristics)?;
    let runner = EvaluationRunner::new(config);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let outcome = runner.run(
        &EvaluationRequest {
            heuristic_types,
            iteration_count: cli.iterations,
        },
        &mut rng,
    )?;

    let trend = cli.trend.then(|| {
        runner.trend_report(&mut rng, "local", outcome.overall_score, &Baseline::default())
    });

    let mut out = std::io::stdout();
    match cli.output {
        OutputFormat::Json => {
            let report = CliReport {
                evaluation: &outcome,
                trend: trend.as_ref(),
            };
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            write_evaluation_table(&outcome, cli.mode, &mut out)?;
            if let Some(trend) = &trend {
                writeln!(out)?;
                write_trend_table(trend, &mut out)?;
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The CLI is the strict validation boundary: unknown names are an error
/// here, unlike the detector's permissive string path.
fn parse_heuristics(raw: &str) -> Result<Vec<HeuristicType>> {
    let mut kinds = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let kind = part.parse::<HeuristicType>().map_err(anyhow::Error::msg)?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        bail!("no heuristic types provided");
    }
    Ok(kinds)
}

fn parse_mode(value: &str) -> Result<DescriptionMode, String> {
    value.parse()
}

fn parse_output_format(value: &str) -> Result<OutputFormat, String> {
    match value.trim() {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!(
            "invalid output format '{other}', expected table or json"
        )),
    }
}

fn write_evaluation_table(
    outcome: &EvaluationOutcome,
    mode: DescriptionMode,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    writeln!(out, "overall_score\t{:.2}", outcome.overall_score)?;
    writeln!(out, "zone_status\t{}", outcome.zone_status.as_str())?;
    writeln!(out)?;

    writeln!(out, "heuristic\tseverity\tscore\tconfidence\tdetections")?;
    for finding in &outcome.findings {
        writeln!(
            out,
            "{}\t{}\t{:.2}\t{:.2}\t{}",
            finding.heuristic_type.as_str(),
            finding.severity.as_str(),
            finding.severity_score,
            finding.confidence_level,
            finding.detection_count
        )?;
    }
    writeln!(out)?;

    writeln!(out, "priority\theuristic\taction\tdescription")?;
    for recommendation in &outcome.recommendations {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            recommendation.priority,
            recommendation.heuristic_type.as_str(),
            recommendation.action_title,
            recommendation.description(mode)
        )?;
    }

    Ok(())
}

fn write_trend_table(report: &TrendReport, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "current_zone\t{}", report.current_zone.as_str())?;
    writeln!(out, "drift_alert\t{}", report.drift_alert)?;
    if let Some(message) = &report.drift_message {
        writeln!(out, "drift_message\t{message}")?;
    }
    writeln!(out)?;

    writeln!(out, "timestamp\tscore\tzone")?;
    for point in &report.data_points {
        writeln!(
            out,
            "{}\t{:.2}\t{}",
            point.timestamp,
            point.score,
            point.zone.as_str()
        )?;
    }

    Ok(())
}
