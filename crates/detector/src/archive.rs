//! Archive presence check.

use crate::layout::BundleLayout;

/// True if the bundle ships `app.asar` at its conventional location.
///
/// Any failure to stat the path counts as absence.
pub fn has_archive(layout: &BundleLayout) -> bool {
    layout.archive_path().exists()
}
