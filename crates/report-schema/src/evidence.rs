//! Evidence trail types: which marker was seen, where, and what it counts for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict a marker contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// ASAR integrity validation is configured.
    AsarIntegrity,
    /// The `OnlyLoadAppFromAsar` fuse is configured.
    OnlyLoadFromAsar,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::AsarIntegrity => write!(f, "asar_integrity"),
            Signal::OnlyLoadFromAsar => write!(f, "only_load_from_asar"),
        }
    }
}

/// File a marker was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    /// The bundle's `Info.plist`.
    Metadata,
    /// The bundle's main executable.
    Executable,
}

impl fmt::Display for EvidenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceSource::Metadata => write!(f, "metadata"),
            EvidenceSource::Executable => write!(f, "executable"),
        }
    }
}

/// A single marker occurrence that fed into a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceHit {
    /// Verdict this marker supports.
    pub signal: Signal,
    /// Where the marker was found.
    pub source: EvidenceSource,
    /// The marker text.
    pub marker: String,
    /// Contribution to a weighted score (1 for plain OR markers).
    pub weight: u32,
}

impl EvidenceHit {
    pub fn new(signal: Signal, source: EvidenceSource, marker: impl Into<String>, weight: u32) -> Self {
        Self {
            signal,
            source,
            marker: marker.into(),
            weight,
        }
    }
}

impl fmt::Display for EvidenceHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {} (+{} {})",
            self.marker, self.source, self.weight, self.signal
        )
    }
}
