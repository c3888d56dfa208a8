//! Report rendering.

use anyhow::Result;
use asarprobe_schema::{ClassificationResult, ScanReport, UNKNOWN_VERSION};
use std::fmt::Write;
use std::path::Path;

const TABLE_RULE: &str =
    "===================================================================================";
const NAME_WIDTH: usize = 28;

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &ScanReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render the human-readable report.
pub fn render_text(report: &ScanReport) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "Electron ASAR Integrity Scanner v{}", report.tool_version)?;
    writeln!(out, "-------------------------------")?;
    writeln!(out, "Platform: {}", report.platform)?;
    writeln!(out, "Generated: {}", report.generated_at)?;
    writeln!(out)?;
    writeln!(out, "Results:")?;
    writeln!(out, "========")?;

    for (index, result) in report.detailed().enumerate() {
        write_detail(&mut out, index + 1, result)?;
    }

    let summary = &report.summary;
    writeln!(out)?;
    writeln!(out, "Summary:")?;
    writeln!(out, "  Total apps scanned: {}", summary.total_scanned)?;
    writeln!(out, "  Electron apps: {}", summary.electron_apps)?;
    writeln!(out, "  Apps with ASAR files: {}", summary.with_asar_file)?;
    writeln!(out, "  Apps with ASAR integrity enabled: {}", summary.integrity_enabled)?;
    writeln!(
        out,
        "  Apps with OnlyLoadAppFromAsar enabled: {}",
        summary.only_load_from_asar_enabled
    )?;

    writeln!(out)?;
    writeln!(out, "Summary Table:")?;
    writeln!(out, "{}", TABLE_RULE)?;
    writeln!(
        out,
        "{:<30} | {:<10} | {:<10} | {:<10} | {:<15}",
        "Application", "Version", "ASAR File", "Integrity", "OnlyLoadAppFromAsar"
    )?;
    writeln!(out, "{}", TABLE_RULE)?;
    for result in report.detailed() {
        let has_asar = if result.has_asar_file() { "Yes" } else { "No" };
        writeln!(
            out,
            "{:<30} | {:<10} | {:<10} | {:<10} | {:<15}",
            display_name(result.path()),
            display_version(result.version()),
            has_asar,
            result.asar_integrity().label(),
            result.only_load_from_asar().label()
        )?;
    }
    writeln!(out, "{}", TABLE_RULE)?;

    Ok(out)
}

fn write_detail(out: &mut String, index: usize, result: &ClassificationResult) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "[{}] {}", index, result.path())?;
    writeln!(out, "  Is Electron App: {}", result.is_electron())?;
    writeln!(out, "  Electron Version: {}", result.version())?;
    writeln!(out, "  Has ASAR File: {}", result.has_asar_file())?;

    if result.has_asar_file() {
        writeln!(out, "  ASAR Integrity Enabled: {}", result.asar_integrity())?;
        writeln!(out, "  OnlyLoadFromAsar Enabled: {}", result.only_load_from_asar())?;
        if let Some(error) = result.integrity_error() {
            writeln!(out, "  Error: {}", error)?;
        }
        for warning in result.warnings() {
            writeln!(out, "  Warning: {}", warning)?;
        }
    }

    if !result.node_files().is_empty() {
        writeln!(out, "  .node Files ({} found):", result.node_files().len())?;
        for (i, node_file) in result.node_files().iter().enumerate() {
            writeln!(out, "    {}. {}", i + 1, node_file)?;
        }
    }

    Ok(())
}

/// Final path component, shortened to fit the table column.
fn display_name(path: &str) -> String {
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());
    if name.chars().count() > NAME_WIDTH {
        let head: String = name.chars().take(NAME_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        name
    }
}

fn display_version(version: &str) -> &str {
    if version.is_empty() || version == UNKNOWN_VERSION {
        "Unknown"
    } else {
        version
    }
}
