//! Reporting and export — JSON, CSV and Markdown artifacts.
//!
//! - **JSON**: full round-trip of a `BacktestReport` with schema versioning
//! - **CSV**: the daily PnL series for spreadsheets and plotting tools
//! - **Markdown**: a human-readable summary of one run
//!
//! Unknown schema versions and non-parallel series are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dualtrend_core::ResultSeries;

use crate::runner::{BacktestReport, SCHEMA_VERSION};

pub const REPORT_FILE: &str = "report.json";
pub const SERIES_FILE: &str = "pnl.csv";
pub const SUMMARY_FILE: &str = "summary.md";

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestReport` to pretty JSON.
pub fn export_json(report: &BacktestReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize BacktestReport to JSON")
}

/// Deserialize a `BacktestReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestReport> {
    let report: BacktestReport =
        serde_json::from_str(json).context("failed to deserialize BacktestReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    if let Some(name) = report.series.misaligned_series() {
        bail!(
            "corrupt report: series '{name}' does not have one entry per date ({} dates)",
            report.series.len()
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the daily series as CSV, one row per simulated day.
///
/// Columns: date, long_realized, short_realized, total_realized,
/// long_unrealized, short_unrealized, total_unrealized, total_pnl
pub fn export_series_csv(series: &ResultSeries) -> Result<String> {
    if let Some(name) = series.misaligned_series() {
        bail!("cannot export series: '{name}' is not parallel to the dates");
    }
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "long_realized",
        "short_realized",
        "total_realized",
        "long_unrealized",
        "short_unrealized",
        "total_unrealized",
        "total_pnl",
    ])?;

    for i in 0..series.len() {
        wtr.write_record([
            series.dates[i].to_string(),
            format!("{:.6}", series.long_realized[i]),
            format!("{:.6}", series.short_realized[i]),
            format!("{:.6}", series.total_realized[i]),
            format!("{:.6}", series.long_unrealized[i]),
            format!("{:.6}", series.short_unrealized[i]),
            format!("{:.6}", series.total_unrealized[i]),
            format!("{:.6}", series.total_pnl[i]),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Markdown summary ───────────────────────────────────────────────

/// Human-readable summary of one run.
pub fn export_summary_markdown(report: &BacktestReport) -> String {
    let s = &report.summary;
    let mut md = String::with_capacity(1024);

    md.push_str("# Backtest Summary\n\n");

    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Run ID | {} |\n", short_hash(&report.run_id)));
    md.push_str(&format!("| Benchmark | {} |\n", report.benchmark));
    md.push_str(&format!(
        "| Period | {} to {} ({} days) |\n",
        report.start_date, report.end_date, s.days
    ));
    md.push_str(&format!("| Instruments | {} |\n", report.instruments.len()));
    md.push_str(&format!(
        "| Data | {} fetched, {} dropped (error), {} dropped (missing data) |\n",
        report.load.fetched, report.load.dropped_errors, report.load.dropped_misaligned
    ));
    md.push_str(&format!(
        "| Dataset Hash | {} |\n",
        short_hash(&report.dataset_hash)
    ));
    if report.synthetic {
        md.push_str("| Source | **SYNTHETIC** |\n");
    }
    md.push('\n');

    md.push_str("## Results\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Long trades | {} |\n", s.long_trades));
    md.push_str(&format!("| Short trades | {} |\n", s.short_trades));
    md.push_str(&format!("| Realized PnL (long) | {:.2} |\n", s.realized_long));
    md.push_str(&format!("| Realized PnL (short) | {:.2} |\n", s.realized_short));
    md.push_str(&format!("| Total closed PnL | {:.2} |\n", s.realized_total));
    md.push_str(&format!("| Peak total PnL | {:.2} |\n", s.peak_total_pnl));
    md.push_str(&format!("| Max drawdown | {:.2} |\n", s.max_drawdown));

    md
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `report.json`, `pnl.csv` and `summary.md` into `dir`.
///
/// Returns the directory written to.
pub fn save_artifacts(report: &BacktestReport, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create artifact dir: {}", dir.display()))?;

    std::fs::write(dir.join(REPORT_FILE), export_json(report)?)
        .with_context(|| format!("failed to write {REPORT_FILE}"))?;
    std::fs::write(dir.join(SERIES_FILE), export_series_csv(&report.series)?)
        .with_context(|| format!("failed to write {SERIES_FILE}"))?;
    std::fs::write(dir.join(SUMMARY_FILE), export_summary_markdown(report))
        .with_context(|| format!("failed to write {SUMMARY_FILE}"))?;

    Ok(dir.to_path_buf())
}

/// Load a `BacktestReport` from an artifact directory.
pub fn load_artifacts(dir: &Path) -> Result<BacktestReport> {
    let path = dir.join(REPORT_FILE);
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
