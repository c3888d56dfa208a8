//! Marker rule tables and the raw-byte evidence scanner.
//!
//! Every marker is a `(pattern, signal, weight)` row. A table is compiled once
//! into an [`EvidenceScanner`], which reports every marker present in a byte
//! buffer in a single pass. Verdict policies (threshold or OR) are applied to
//! the resulting [`MarkerHits`] by the integrity aggregator.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use asarprobe_schema::{EvidenceHit, EvidenceSource, Signal};
use std::sync::LazyLock;

/// One row of a marker rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub pattern: &'static str,
    pub signal: Signal,
    /// Contribution to the signal's score. Weight 0 markers corroborate a
    /// verdict without changing it.
    pub weight: u32,
}

impl Marker {
    pub const fn new(pattern: &'static str, signal: Signal, weight: u32) -> Self {
        Self {
            pattern,
            signal,
            weight,
        }
    }
}

/// Spellings of the only-load-from-asar fuse.
pub const ONLY_LOAD_SPELLINGS: [&str; 3] = [
    "OnlyLoadAppFromAsar",
    "OnlyLoadFromAsar",
    "FuseV1Options.OnlyLoadAppFromAsar",
];

/// Integrity key in a macOS `Info.plist`.
pub const PLIST_INTEGRITY_KEY: &str = "<key>ElectronAsarIntegrity</key>";
/// Sub-keys of a well-formed integrity dictionary.
pub const PLIST_INTEGRITY_SUBKEYS: [&str; 2] = ["<key>hash</key>", "<key>algorithm</key>"];

/// Strong marker for embedded integrity validation in a Windows executable.
pub const EMBEDDED_INTEGRITY_VALIDATION: &str = "EnableEmbeddedAsarIntegrityValidation";

/// Score at which the Windows executable is considered to have integrity enabled.
pub const WINDOWS_INTEGRITY_THRESHOLD: u32 = 2;
/// The integrity key alone is authoritative in macOS metadata.
pub const MACOS_INTEGRITY_THRESHOLD: u32 = 1;

/// Markers searched in a macOS `Info.plist`.
pub const MACOS_METADATA_RULES: &[Marker] = &[
    Marker::new(PLIST_INTEGRITY_KEY, Signal::AsarIntegrity, 1),
    Marker::new(PLIST_INTEGRITY_SUBKEYS[0], Signal::AsarIntegrity, 0),
    Marker::new(PLIST_INTEGRITY_SUBKEYS[1], Signal::AsarIntegrity, 0),
    Marker::new(ONLY_LOAD_SPELLINGS[0], Signal::OnlyLoadFromAsar, 1),
    Marker::new(ONLY_LOAD_SPELLINGS[1], Signal::OnlyLoadFromAsar, 1),
    Marker::new(ONLY_LOAD_SPELLINGS[2], Signal::OnlyLoadFromAsar, 1),
];

/// Markers searched in a macOS main executable.
pub const MACOS_EXECUTABLE_RULES: &[Marker] =
    &[Marker::new(ONLY_LOAD_SPELLINGS[0], Signal::OnlyLoadFromAsar, 1)];

/// Markers searched in a Windows main executable.
pub const WINDOWS_EXECUTABLE_RULES: &[Marker] = &[
    Marker::new("ElectronAsar", Signal::AsarIntegrity, 1),
    Marker::new("Integrity", Signal::AsarIntegrity, 1),
    Marker::new("sha256", Signal::AsarIntegrity, 1),
    Marker::new(EMBEDDED_INTEGRITY_VALIDATION, Signal::AsarIntegrity, 2),
    Marker::new(ONLY_LOAD_SPELLINGS[0], Signal::OnlyLoadFromAsar, 1),
    Marker::new(ONLY_LOAD_SPELLINGS[1], Signal::OnlyLoadFromAsar, 1),
    Marker::new(ONLY_LOAD_SPELLINGS[2], Signal::OnlyLoadFromAsar, 1),
];

pub static MACOS_METADATA: LazyLock<EvidenceScanner> =
    LazyLock::new(|| EvidenceScanner::new(MACOS_METADATA_RULES));

pub static MACOS_EXECUTABLE: LazyLock<EvidenceScanner> =
    LazyLock::new(|| EvidenceScanner::new(MACOS_EXECUTABLE_RULES));

pub static WINDOWS_EXECUTABLE: LazyLock<EvidenceScanner> =
    LazyLock::new(|| EvidenceScanner::new(WINDOWS_EXECUTABLE_RULES));

/// Finds which markers of a rule table occur in a byte buffer.
///
/// Markers are searched independently: overlapping occurrences all count, so a
/// marker embedded in a longer one (`Integrity` inside
/// `EnableEmbeddedAsarIntegrityValidation`) is reported as well.
#[derive(Debug, Clone)]
pub struct EvidenceScanner {
    rules: &'static [Marker],
    automaton: AhoCorasick,
}

impl EvidenceScanner {
    pub fn new(rules: &'static [Marker]) -> Self {
        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::Standard)
            .build(rules.iter().map(|m| m.pattern))
            .unwrap();
        Self { rules, automaton }
    }

    pub fn scan(&self, haystack: &[u8]) -> MarkerHits {
        let mut found = vec![false; self.rules.len()];
        let mut remaining = self.rules.len();

        for m in self.automaton.find_overlapping_iter(haystack) {
            let idx = m.pattern().as_usize();
            if !found[idx] {
                found[idx] = true;
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
        }

        MarkerHits {
            rules: self.rules,
            found,
        }
    }
}

/// Markers present in one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerHits {
    rules: &'static [Marker],
    found: Vec<bool>,
}

impl MarkerHits {
    /// Markers that were found, in rule-table order.
    pub fn found(&self) -> impl Iterator<Item = &'static Marker> + '_ {
        self.rules
            .iter()
            .zip(&self.found)
            .filter(|(_, hit)| **hit)
            .map(|(marker, _)| marker)
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.found().any(|m| m.pattern == pattern)
    }

    /// Sum of weights of the found markers for `signal`.
    pub fn score(&self, signal: Signal) -> u32 {
        self.found()
            .filter(|m| m.signal == signal)
            .map(|m| m.weight)
            .sum()
    }

    /// True if any weighted marker for `signal` was found.
    pub fn any(&self, signal: Signal) -> bool {
        self.found().any(|m| m.signal == signal && m.weight > 0)
    }

    /// Evidence trail entries for the found markers.
    pub fn evidence(&self, source: EvidenceSource) -> Vec<EvidenceHit> {
        self.found()
            .map(|m| EvidenceHit::new(m.signal, source, m.pattern, m.weight))
            .collect()
    }
}
