use anyhow::Context;
use chrono::Local;
use clap::Parser;
use generator::template::sample_csv;
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::DashboardModel;
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::DashboardConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "RS422 debug dashboard driver")]
struct Args {
    /// Load dashboard settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// YAML parameter table replacing the built-in thresholds
    #[arg(long)]
    parameters: Option<PathBuf>,
    /// Import a telemetry CSV (Timestamp, Parameter, Value) and print a summary
    #[arg(long)]
    import: Option<PathBuf>,
    /// Generate simulated series for every parameter
    #[arg(long, default_value_t = false)]
    simulate: bool,
    /// Write an example telemetry CSV to this path
    #[arg(long)]
    template: Option<PathBuf>,
    /// Append the printed summary to this file
    #[arg(long)]
    report: Option<PathBuf>,
    #[arg(long)]
    bind: Option<SocketAddr>,
    #[arg(long)]
    points: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// Keep the HTTP bridge alive for the visualizer
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if args.parameters.is_some() {
        config.parameters = args.parameters.clone();
    }
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(points) = args.points {
        config.points = points;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let table = Arc::new(config.parameter_table()?);
    info!("loaded {} parameters", table.len());
    let runner = Arc::new(Runner::new(config.clone(), table.clone()));

    if let Some(path) = &args.template {
        let text = sample_csv(&table, Local::now().naive_local())?;
        fs::write(path, text).with_context(|| format!("writing template {}", path.display()))?;
        println!("Sample telemetry written to {}", path.display());
    }

    let mut model = runner.empty_model();

    if args.simulate {
        model = runner.simulated_model()?;
        emit_summary(&model, args.report.as_ref())?;
    }

    if let Some(path) = &args.import {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading telemetry {}", path.display()))?;
        let outcome = runner
            .import_csv(&text)
            .with_context(|| format!("importing telemetry {}", path.display()))?;
        println!(
            "Imported {} rows ({} dropped) from {}",
            outcome.accepted_rows,
            outcome.dropped_rows,
            path.display()
        );
        model = runner.imported_model(outcome);
        emit_summary(&model, args.report.as_ref())?;
    }

    if args.serve {
        let gui_bridge = GuiBridge::new(runner.clone(), runner.empty_model());
        gui_bridge.publish(model);
        let bound = gui_bridge.serve(config.bind)?;
        println!("HTTP bridge running on http://{bound} (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
        let counters = runner.metrics().snapshot();
        info!(
            "bridge stopped after {} imports ({} rejected)",
            counters.imports, counters.rejected
        );
    }

    Ok(())
}

fn emit_summary(model: &DashboardModel, report: Option<&PathBuf>) -> anyhow::Result<()> {
    let mut summary = format!(
        "source={:?} parameters={} samples={} link={} ({:.2} Mbit/s, {:.1}% valid)\n",
        model.source,
        model.parameters.len(),
        model.sample_count(),
        model.link.grade.label(),
        model.link.metrics.current_rate,
        model.link.success_rate
    );
    for (name, record) in &model.parameters {
        let current = record
            .current_value()
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "n/a".into());
        summary.push_str(&format!(
            "  {} {}: current {} {} [{}]",
            record.config.icon,
            name,
            current,
            record.config.unit,
            record.current_status()
        ));
        if let Some(stats) = record.stats() {
            summary.push_str(&format!(
                " avg {:.2} min {:.2} max {:.2}",
                stats.mean, stats.min, stats.max
            ));
        }
        summary.push('\n');
    }
    for note in &model.notes {
        summary.push_str(&format!("  note: {note}\n"));
    }
    print!("{summary}");

    if let Some(report_path) = report {
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)
            .with_context(|| format!("opening report {}", report_path.display()))?;
        file.write_all(summary.as_bytes())?;
    }
    Ok(())
}
