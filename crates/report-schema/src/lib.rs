//! Report schema definitions for asarprobe.
//!
//! This crate defines the per-bundle classification record, the evidence
//! trail attached to it, and the scan report handed to renderers.

pub mod evidence;
pub mod report;
pub mod result;

pub use evidence::{EvidenceHit, EvidenceSource, Signal};
pub use report::{ScanReport, ScanSummary};
pub use result::{ClassificationResult, Disposition, FeatureState, IntegrityVerdict};

/// Version sentinel used when a bundle is Electron but no version could be resolved.
pub const UNKNOWN_VERSION: &str = "unknown";
