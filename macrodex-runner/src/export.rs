//! Report export: JSON, CSV, and Markdown.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: the index history, one row per timeline date
//! - **Markdown**: human-readable summary of the latest reading and correlation
//!
//! Persisted reports carry a `schema_version`. Newer versions are rejected
//! on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use macrodex_core::DirectionIndex;

use crate::runner::{MacroReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `MacroReport` to pretty JSON.
pub fn export_json(report: &MacroReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize MacroReport to JSON")
}

/// Deserialize a `MacroReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<MacroReport> {
    let report: MacroReport =
        serde_json::from_str(json).context("failed to deserialize MacroReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export an index history as CSV.
///
/// Columns: timestamp, index, liquidity_z_score, pmi_z_score, btc_trend,
/// interpretation
pub fn export_history_csv(history: &[DirectionIndex]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "timestamp",
        "index",
        "liquidity_z_score",
        "pmi_z_score",
        "btc_trend",
        "interpretation",
    ])?;

    for p in history {
        wtr.write_record([
            &p.timestamp.to_rfc3339(),
            &format!("{:.2}", p.index),
            &format!("{:.6}", p.liquidity_z_score),
            &format!("{:.6}", p.pmi_z_score),
            &format!("{:.6}", p.btc_trend),
            p.interpretation.as_str(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save a report under `output_dir/{hash prefix}_{timestamp}/`:
/// - `report.json`: the full `MacroReport`
/// - `history.csv`: the index history
/// - `summary.md`: the Markdown summary
///
/// Returns the created directory.
pub fn save_report(report: &MacroReport, output_dir: &Path) -> Result<PathBuf> {
    let prefix: String = report.dataset_hash.chars().take(12).collect();
    let dirname = format!(
        "{}_{}",
        if prefix.is_empty() { "report" } else { &prefix },
        report.generated_at.format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create report dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("report.json"), export_json(report)?)?;
    std::fs::write(run_dir.join("history.csv"), export_history_csv(&report.history)?)?;
    std::fs::write(run_dir.join("summary.md"), generate_summary(report))?;

    Ok(run_dir)
}

/// Load a report from a directory written by [`save_report`].
pub fn load_report(dir: &Path) -> Result<MacroReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Markdown summary ───────────────────────────────────────────────

/// Markdown summary of a report.
pub fn generate_summary(report: &MacroReport) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str("# Direction Index Report\n\n");

    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!(
        "| Generated | {} |\n",
        report.generated_at.to_rfc3339()
    ));
    md.push_str(&format!("| Dataset Hash | {} |\n", report.dataset_hash));
    md.push_str(&format!("| History Points | {} |\n", report.history.len()));
    if let (Some(first), Some(last)) = (report.history.first(), report.history.last()) {
        md.push_str(&format!(
            "| Period | {} to {} |\n",
            first.timestamp.date_naive(),
            last.timestamp.date_naive()
        ));
    }
    if report.synthetic {
        md.push_str("| Data | **SYNTHETIC** |\n");
    }
    md.push('\n');

    md.push_str("## Current Reading\n\n");
    match &report.current {
        Some(c) => {
            md.push_str("| Component | Value |\n");
            md.push_str("| --- | ---: |\n");
            md.push_str(&format!("| Index | {:.2} |\n", c.index));
            md.push_str(&format!("| Interpretation | {} |\n", c.interpretation));
            md.push_str(&format!("| Liquidity Z | {:.3} |\n", c.liquidity_z_score));
            md.push_str(&format!("| PMI Z | {:.3} |\n", c.pmi_z_score));
            md.push_str(&format!("| Price Trend | {:.3} |\n", c.btc_trend));
        }
        None => md.push_str("No reading: the sources share no common date.\n"),
    }
    md.push('\n');

    let corr = &report.correlation;
    md.push_str("## Correlation with Price\n\n");
    md.push_str("| Measure | Value |\n");
    md.push_str("| --- | ---: |\n");
    md.push_str(&format!("| Pearson r | {:.3} |\n", corr.coefficient));
    md.push_str(&format!(
        "| Lagged r ({} days) | {:.3} |\n",
        corr.lag_days, corr.lagged_coefficient
    ));
    md.push_str(&format!("| Samples | {} |\n", corr.sample_size));
    md.push('\n');

    md
}
