//! Bounded worker pool for bundle inspection.

use anyhow::{Context, Result};
use asarprobe_detector::{BundleCandidate, Detector};
use asarprobe_schema::ClassificationResult;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Inspect `candidates` with at most `jobs` inspections in flight.
///
/// Discovery walks the filesystem, so the iterator is drained on a blocking
/// thread too. Results come back in candidate order regardless of completion
/// order.
pub async fn inspect_all<I>(
    detector: Detector,
    candidates: I,
    jobs: usize,
) -> Result<Vec<ClassificationResult>>
where
    I: IntoIterator<Item = BundleCandidate> + Send + 'static,
{
    if jobs <= 1 {
        return tokio::task::spawn_blocking(move || asarprobe_detector::scan(&detector, candidates))
            .await
            .context("Scan task failed");
    }

    let (tx, mut rx) = mpsc::channel(jobs);
    let discovery = tokio::task::spawn_blocking(move || {
        for candidate in candidates {
            if tx.blocking_send(candidate).is_err() {
                break;
            }
        }
    });

    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut handles = Vec::new();
    while let Some(candidate) = rx.recv().await {
        let permit = semaphore.clone().acquire_owned().await?;
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            detector.inspect(&candidate)
        }));
    }
    discovery.await.context("Candidate discovery failed")?;

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.context("Inspection task failed")?);
    }
    Ok(results)
}
