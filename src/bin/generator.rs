//! Sample chart generator for visual verification
//!
//! Builds a synthetic series with a forecast band and flagged anomalies, then
//! draws it with every helper on both backends. Output goes to the directory
//! named by `ANOMALY_CHARTS_OUTPUT` (default `output/`).

use anomaly_charts::data::{sample_series, SampleData};
use anomaly_charts::{export, interactive, static_chart};
use anyhow::{Context, Result};
use chrono::{Duration, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let output_dir = std::env::var_os("ANOMALY_CHARTS_OUTPUT")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("output"));
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let start = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .context("invalid start timestamp")?;
    let sample = sample_series(24 * 14, start, Duration::hours(1));
    info!(
        points = sample.series.len(),
        anomalies = sample.is_anomaly.iter().filter(|&&f| f == 1).count(),
        "generated sample series"
    );

    generate_static_charts(&output_dir, &sample)?;
    generate_whitegrid_charts(&output_dir, &sample)?;
    generate_interactive_charts(&output_dir, &sample)?;

    info!(dir = %output_dir.display(), "chart generation completed");
    Ok(())
}

fn generate_static_charts(output_dir: &Path, sample: &SampleData) -> Result<()> {
    let (fig, ax) = static_chart::plot_time_series(&sample.series, "Requests")?;
    export::save(&fig, &ax, &output_dir.join("01_static_series.png"))?;

    let (fig, mut ax) = static_chart::plot_time_series(&sample.series, "Requests")?;
    static_chart::add_anomalies(
        &mut ax,
        &sample.series,
        &sample.is_anomaly,
        &sample.expected,
        &sample.bounds,
    )?;
    export::save(&fig, &ax, &output_dir.join("02_static_anomalies.png"))?;
    export::save(&fig, &ax, &output_dir.join("03_static_anomalies.svg"))?;
    Ok(())
}

fn generate_whitegrid_charts(output_dir: &Path, sample: &SampleData) -> Result<()> {
    let (fig, mut ax) = static_chart::whitegrid::create_time_series(&sample.series, "Requests")?;
    static_chart::whitegrid::add_anomalies(
        &mut ax,
        &sample.series,
        &sample.is_anomaly,
        &sample.expected,
        &sample.bounds,
    )?;
    export::save(&fig, &ax, &output_dir.join("04_whitegrid_anomalies.png"))?;
    Ok(())
}

fn generate_interactive_charts(output_dir: &Path, sample: &SampleData) -> Result<()> {
    let mut plot = interactive::plot_time_series(&sample.series, "Requests")?;
    interactive::add_anomalies(
        &mut plot,
        &sample.series,
        &sample.is_anomaly,
        &sample.expected,
        &sample.bounds,
    )?;

    let path = output_dir.join("05_interactive_anomalies.html");
    fs::write(&path, plot.to_html()).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "exported interactive chart");
    Ok(())
}
