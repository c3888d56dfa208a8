//! Scan report - output of a full scan, consumed by renderers.

use crate::result::ClassificationResult;
use asarprobe_common::{Platform, Timestamp};
use serde::{Deserialize, Serialize};

/// Aggregate counts over every scanned candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Candidates inspected, Electron or not.
    pub total_scanned: usize,
    pub electron_apps: usize,
    pub with_asar_file: usize,
    pub integrity_enabled: usize,
    pub only_load_from_asar_enabled: usize,
}

impl ScanSummary {
    pub fn from_results(results: &[ClassificationResult]) -> Self {
        let mut summary = ScanSummary {
            total_scanned: results.len(),
            ..Default::default()
        };

        for result in results.iter().filter(|r| r.is_electron()) {
            summary.electron_apps += 1;
            if !result.has_asar_file() {
                continue;
            }
            summary.with_asar_file += 1;
            if result.asar_integrity().is_enabled() {
                summary.integrity_enabled += 1;
            }
            if result.only_load_from_asar().is_enabled() {
                summary.only_load_from_asar_enabled += 1;
            }
        }

        summary
    }
}

/// The complete report of one scan invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Unique identifier for this scan.
    pub scan_id: String,
    /// Version of the tool that produced the report.
    pub tool_version: String,
    /// Bundle conventions applied.
    pub platform: Platform,
    /// When the report was assembled.
    pub generated_at: Timestamp,
    /// Results in candidate-discovery order.
    pub results: Vec<ClassificationResult>,
    pub summary: ScanSummary,
}

impl ScanReport {
    pub fn new(
        tool_version: impl Into<String>,
        platform: Platform,
        results: Vec<ClassificationResult>,
    ) -> Self {
        let summary = ScanSummary::from_results(&results);
        Self {
            scan_id: uuid::Uuid::new_v4().to_string(),
            tool_version: tool_version.into(),
            platform,
            generated_at: Timestamp::now(),
            results,
            summary,
        }
    }

    /// Results a renderer should list in detail.
    pub fn detailed(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.results
            .iter()
            .filter(|r| r.disposition() == crate::Disposition::Detail)
    }
}
