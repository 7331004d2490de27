use crate::libs::error::PipelineError;
use log::{error, info};
use rayon::prelude::*;

/// Runs one task per label, all at once, and waits for every one of them.
///
/// Each label gets its own worker thread, so no task queues behind another.
/// A failing task does not stop the others. Once all have finished, the
/// failed labels are reported together, in the order of `labels`.
pub fn run_all<F>(labels: &[&str], task: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> anyhow::Result<()> + Sync,
{
    if labels.is_empty() {
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(labels.len())
        .build()?;

    let results: Vec<(&str, anyhow::Result<()>)> = pool.install(|| {
        labels
            .par_iter()
            .map(|label| (*label, task(label)))
            .collect()
    });

    let mut failed = vec![];
    for (label, result) in results {
        match result {
            Ok(()) => info!("    {} done", label),
            Err(e) => {
                error!("    {} failed: {:#}", label, e);
                failed.push(label.to_string());
            }
        }
    }

    if !failed.is_empty() {
        return Err(PipelineError::ChromosomesFailed(failed).into());
    }

    Ok(())
}
