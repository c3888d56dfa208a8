//! Integrity evidence aggregation.
//!
//! Two verdicts are produced for a bundle that ships `app.asar`:
//!
//! - ASAR integrity. On macOS the `ElectronAsarIntegrity` plist key alone is
//!   authoritative. On Windows no single string is, so markers are weighted
//!   and the sum must reach [`WINDOWS_INTEGRITY_THRESHOLD`].
//! - Only-load-from-asar. Any one recognized fuse spelling is enough, in any
//!   searched file.
//!
//! The `evaluate_*` functions work on byte buffers only and carry the whole
//! policy; the `check_*` functions add the filesystem reads around them.

use crate::layout::{read_optional, BundleLayout};
use crate::markers::{
    MACOS_EXECUTABLE, MACOS_INTEGRITY_THRESHOLD, MACOS_METADATA, PLIST_INTEGRITY_SUBKEYS,
    WINDOWS_EXECUTABLE, WINDOWS_INTEGRITY_THRESHOLD,
};
use asarprobe_common::Platform;
use asarprobe_schema::{EvidenceSource, IntegrityVerdict, Signal};
use tracing::{debug, warn};

/// Warning attached when the integrity key has no hash/algorithm entries.
pub const MISSING_SUBKEYS_WARNING: &str =
    "ElectronAsarIntegrity key exists but hash/algorithm missing - may be misconfigured";

/// Aggregate integrity evidence for a bundle known to have an archive.
pub fn check_integrity(layout: &BundleLayout) -> IntegrityVerdict {
    match layout.platform() {
        Platform::MacOs => check_macos(layout),
        Platform::Windows => check_windows(layout),
    }
}

fn check_macos(layout: &BundleLayout) -> IntegrityVerdict {
    let Some(plist_path) = layout.metadata_path() else {
        return IntegrityVerdict::unreadable("bundle has no Info.plist location");
    };
    debug!(
        "Checking Info.plist for ElectronAsarIntegrity: {}",
        plist_path.display()
    );

    let plist = match std::fs::read(&plist_path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Cannot read {}: {}", plist_path.display(), e);
            return IntegrityVerdict::unreadable(format!("error reading Info.plist: {}", e));
        }
    };

    let exe_path = layout.resolve_executable(Some(plist.as_slice()));
    debug!(
        "  Checking executable for OnlyLoadAppFromAsar fuse: {}",
        exe_path.display()
    );
    let executable = read_optional(&exe_path);

    evaluate_macos(&plist, executable.as_deref())
}

fn check_windows(layout: &BundleLayout) -> IntegrityVerdict {
    let exe_path = layout.executable_path();
    debug!(
        "Checking for ASAR integrity in Windows executable: {}",
        exe_path.display()
    );

    match std::fs::read(&exe_path) {
        Ok(content) => evaluate_windows(&content),
        Err(e) => {
            warn!("Cannot read {}: {}", exe_path.display(), e);
            IntegrityVerdict::unreadable(format!("error reading executable: {}", e))
        }
    }
}

/// Combine macOS evidence: the bundle's `Info.plist` and, when readable, its
/// main executable.
pub fn evaluate_macos(plist: &[u8], executable: Option<&[u8]>) -> IntegrityVerdict {
    let metadata_hits = MACOS_METADATA.scan(plist);
    let executable_hits = executable.map(|exe| MACOS_EXECUTABLE.scan(exe));

    let mut verdict = IntegrityVerdict {
        asar_integrity: metadata_hits.score(Signal::AsarIntegrity) >= MACOS_INTEGRITY_THRESHOLD,
        ..Default::default()
    };

    if verdict.asar_integrity {
        debug!("  Found ElectronAsarIntegrity key in Info.plist");
        if PLIST_INTEGRITY_SUBKEYS
            .iter()
            .all(|key| metadata_hits.contains(key))
        {
            debug!("  Found hash and algorithm keys - ASAR integrity appears properly configured");
        } else {
            debug!("  {}", MISSING_SUBKEYS_WARNING);
            verdict.warnings.push(MISSING_SUBKEYS_WARNING.to_string());
        }
    } else {
        debug!("  No ElectronAsarIntegrity key found in Info.plist");
    }

    let in_executable = executable_hits
        .as_ref()
        .is_some_and(|hits| hits.any(Signal::OnlyLoadFromAsar));
    let in_metadata = metadata_hits.any(Signal::OnlyLoadFromAsar);
    verdict.only_load_from_asar = in_executable || in_metadata;

    if in_executable {
        debug!("  Found OnlyLoadAppFromAsar fuse signature in executable");
    } else if in_metadata {
        debug!("  Found OnlyLoadAppFromAsar reference in Info.plist");
    } else {
        debug!("  No OnlyLoadAppFromAsar fuse detected");
    }

    verdict.evidence = metadata_hits.evidence(EvidenceSource::Metadata);
    if let Some(hits) = executable_hits {
        verdict
            .evidence
            .extend(hits.evidence(EvidenceSource::Executable));
    }
    verdict
}

/// Combine Windows evidence from the raw bytes of the main executable.
pub fn evaluate_windows(executable: &[u8]) -> IntegrityVerdict {
    let hits = WINDOWS_EXECUTABLE.scan(executable);
    for marker in hits.found() {
        debug!("  Found signature: {} ({})", marker.pattern, marker.signal);
    }

    let score = hits.score(Signal::AsarIntegrity);
    let asar_integrity = score >= WINDOWS_INTEGRITY_THRESHOLD;
    if asar_integrity {
        debug!(
            "  ASAR integrity score {} - multiple indicators found, likely enabled",
            score
        );
    } else {
        debug!("  ASAR integrity score {} - no strong indicators found", score);
    }

    let only_load_from_asar = hits.any(Signal::OnlyLoadFromAsar);
    if !only_load_from_asar {
        debug!("  No OnlyLoadAppFromAsar fuse detected");
    }

    IntegrityVerdict {
        asar_integrity,
        only_load_from_asar,
        error: None,
        warnings: Vec::new(),
        evidence: hits.evidence(EvidenceSource::Executable),
    }
}
