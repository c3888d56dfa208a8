//! asarprobe detector - locate Electron bundles and judge their ASAR protections.

pub mod archive;
pub mod classifier;
pub mod inspect;
pub mod integrity;
pub mod layout;
pub mod locator;
pub mod markers;
pub mod modules;
pub mod patterns;
pub mod walk;

#[cfg(test)]
mod fixtures;

pub use inspect::{Detector, DetectorOptions};
pub use layout::{BundleCandidate, BundleLayout, BundleShape};
pub use locator::{default_roots, Locator};

use asarprobe_schema::ClassificationResult;

/// Inspect candidates one at a time, keeping discovery order.
pub fn scan(
    detector: &Detector,
    candidates: impl IntoIterator<Item = BundleCandidate>,
) -> Vec<ClassificationResult> {
    candidates
        .into_iter()
        .map(|candidate| detector.inspect(&candidate))
        .collect()
}
