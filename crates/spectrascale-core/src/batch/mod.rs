//! Folder mode: `N` numbered files split round robin over `T` worker threads.
//!
//! Every worker builds its own upscaler inside its thread and runs its files
//! end to end. Errors are contained according to [`SpectraError::scope`].

use std::any::Any;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::compute::{create_upscaler, UpscaleParams, Upscaler};
use crate::consts::BYTES_PER_MIB;
use crate::error::{ErrorScope, Result, SpectraError};
use crate::io::{batch_file, load_rgb, save_rgb_png, worker_indices};
use crate::pipeline::config::UpscaleConfig;
use crate::pipeline::{NoOpReporter, ProgressReporter};

/// One file of a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchItem {
    /// 1-based file number.
    pub index: usize,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Immutable work description sent to one worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerJob {
    pub worker: usize,
    pub items: Vec<BatchItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FileStatus {
    Done { elapsed: Duration, width: u32, height: u32 },
    Failed { error: String, scope: ErrorScope },
    /// Never attempted because its worker (or the run) stopped first.
    Skipped,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FileOutcome {
    pub worker: usize,
    pub item: BatchItem,
    pub status: FileStatus,
}

#[derive(Clone, Debug)]
pub struct BatchReport {
    /// Sorted by file index.
    pub outcomes: Vec<FileOutcome>,
    pub elapsed: Duration,
    /// Largest device footprint of any worker.
    pub device_bytes_per_worker: u64,
    pub workers: usize,
    /// Files the run was asked for.
    pub file_count: usize,
}

impl BatchReport {
    fn count(&self, f: impl Fn(&FileStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| f(&o.status)).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Done { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Skipped))
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.len() == self.file_count && self.succeeded() == self.file_count
    }
}

/// Split `count` numbered files over `workers` jobs: file `i` (0-based) goes
/// to worker `i mod workers`.
pub fn partition(config: &UpscaleConfig) -> Vec<WorkerJob> {
    let batch = &config.batch;
    let workers = batch.threads.max(1);
    (0..workers)
        .map(|worker| WorkerJob {
            worker,
            items: worker_indices(batch.file_count, workers, worker)
                .into_iter()
                .map(|index| BatchItem {
                    index,
                    input: batch_file(&batch.input_folder, index),
                    output: batch_file(&batch.output_folder, index),
                })
                .collect(),
        })
        .collect()
}

/// Builds the upscaler for one worker, inside that worker's thread.
pub type UpscalerFactory<'a> = dyn Fn(usize) -> Result<Box<dyn Upscaler>> + Sync + 'a;

/// Run a batch with no progress reporting.
pub fn run_batch(config: &UpscaleConfig) -> Result<BatchReport> {
    run_batch_reported(config, &NoOpReporter)
}

/// Run a batch, reporting each finished file.
pub fn run_batch_reported(
    config: &UpscaleConfig,
    reporter: &dyn ProgressReporter,
) -> Result<BatchReport> {
    let device = &config.device;
    let precision = config.upscale.precision;
    run_batch_with(config, reporter, &|_| {
        create_upscaler(device.preference, device.device_id, precision)
    })
}

/// Run a batch with upscalers from `factory`.
pub fn run_batch_with(
    config: &UpscaleConfig,
    reporter: &dyn ProgressReporter,
    factory: &UpscalerFactory<'_>,
) -> Result<BatchReport> {
    if config.batch.file_count == 0 {
        return Err(SpectraError::Config("batch needs at least one file".into()));
    }
    if config.batch.threads == 0 {
        return Err(SpectraError::Config("batch needs at least one thread".into()));
    }

    let params = config.params();
    params.validate()?;

    let jobs = partition(config);
    let workers = jobs.len();
    let abort = AtomicBool::new(false);
    let (outcome_tx, outcome_rx) = mpsc::channel::<FileOutcome>();

    reporter.begin(config.batch.file_count);
    let start = Instant::now();
    let (mut outcomes, device_bytes) = thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let (job_tx, job_rx) = mpsc::channel();
                let outcomes = outcome_tx.clone();
                let params = &params;
                let abort = &abort;
                let items = job.items.clone();
                let worker = job.worker;
                let handle = scope
                    .spawn(move || run_worker(job_rx, factory, params, outcomes, abort));
                job_tx.send(job).ok();
                (worker, items, handle)
            })
            .collect();
        drop(outcome_tx);

        let mut outcomes = Vec::with_capacity(config.batch.file_count);
        for outcome in outcome_rx {
            let elapsed = match outcome.status {
                FileStatus::Done { elapsed, .. } => Some(elapsed),
                _ => None,
            };
            reporter.file_done(&outcome.item.input, elapsed);
            outcomes.push(outcome);
        }

        let mut device_bytes = 0;
        for (worker, items, handle) in handles {
            match handle.join() {
                Ok(bytes) => device_bytes = device_bytes.max(bytes),
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    error!(worker, "Worker panicked: {reason}");
                    let reported: HashSet<usize> = outcomes
                        .iter()
                        .filter(|o| o.worker == worker)
                        .map(|o| o.item.index)
                        .collect();
                    for item in items.into_iter().filter(|i| !reported.contains(&i.index)) {
                        reporter.file_done(&item.input, None);
                        outcomes.push(FileOutcome {
                            worker,
                            item,
                            status: FileStatus::Failed {
                                error: format!("worker {worker} panicked: {reason}"),
                                scope: ErrorScope::Worker,
                            },
                        });
                    }
                }
            }
        }
        (outcomes, device_bytes)
    });
    let elapsed = start.elapsed();
    reporter.finish();

    outcomes.sort_by_key(|o| o.item.index);
    let report = BatchReport {
        outcomes,
        elapsed,
        device_bytes_per_worker: device_bytes,
        workers,
        file_count: config.batch.file_count,
    };
    info!(
        files = report.outcomes.len(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        skipped = report.skipped(),
        elapsed_s = elapsed.as_secs_f64(),
        "Batch finished"
    );
    Ok(report)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn send(outcomes: &Sender<FileOutcome>, worker: usize, item: BatchItem, status: FileStatus) {
    outcomes.send(FileOutcome { worker, item, status }).ok();
}

fn failed(e: &SpectraError) -> FileStatus {
    FileStatus::Failed {
        error: e.to_string(),
        scope: e.scope(),
    }
}

/// Body of one worker thread. Returns the device bytes its upscaler held.
fn run_worker(
    job_rx: Receiver<WorkerJob>,
    factory: &UpscalerFactory<'_>,
    params: &UpscaleParams,
    outcomes: Sender<FileOutcome>,
    abort: &AtomicBool,
) -> u64 {
    let Ok(job) = job_rx.recv() else {
        return 0;
    };
    let worker = job.worker;
    debug!(worker, files = job.items.len(), "Worker started");

    let mut upscaler = match factory(worker) {
        Ok(u) => u,
        Err(e) => {
            error!(worker, "Worker could not start: {e}");
            if e.scope() == ErrorScope::Run {
                abort.store(true, Ordering::SeqCst);
            }
            let mut items = job.items.into_iter();
            if let Some(first) = items.next() {
                send(&outcomes, worker, first, failed(&e));
            }
            for item in items {
                send(&outcomes, worker, item, FileStatus::Skipped);
            }
            return 0;
        }
    };

    let mut device_bytes = 0;
    let mut stopped = false;
    for item in job.items {
        if stopped || abort.load(Ordering::SeqCst) {
            send(&outcomes, worker, item, FileStatus::Skipped);
            continue;
        }

        let result = load_rgb(&item.input).and_then(|image| {
            let output = upscaler.upscale(&image, params)?;
            save_rgb_png(&output.image, &item.output)?;
            Ok(output)
        });
        match result {
            Ok(output) => {
                if device_bytes == 0 && upscaler.device_bytes() > 0 {
                    device_bytes = upscaler.device_bytes();
                    debug!(
                        worker,
                        vram_mib = device_bytes / BYTES_PER_MIB,
                        "Device memory per worker"
                    );
                }
                info!(
                    worker,
                    file = %item.input.display(),
                    ms = output.elapsed.as_secs_f64() * 1000.0,
                    "File upscaled"
                );
                let status = FileStatus::Done {
                    elapsed: output.elapsed,
                    width: output.plan.output_width(),
                    height: output.plan.output_height(),
                };
                send(&outcomes, worker, item, status);
            }
            Err(e) => {
                match e.scope() {
                    ErrorScope::File => warn!(worker, file = %item.input.display(), "{e}"),
                    ErrorScope::Worker => {
                        error!(worker, file = %item.input.display(), "{e}; worker stopping");
                        stopped = true;
                    }
                    ErrorScope::Run => {
                        error!(worker, file = %item.input.display(), "{e}; aborting run");
                        abort.store(true, Ordering::SeqCst);
                        stopped = true;
                    }
                }
                send(&outcomes, worker, item, failed(&e));
            }
        }
    }
    debug!(worker, "Worker finished");
    device_bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_is_round_robin() {
        let mut config = UpscaleConfig::default();
        config.batch.file_count = 5;
        config.batch.threads = 2;
        let jobs = partition(&config);
        let indices: Vec<Vec<usize>> = jobs
            .iter()
            .map(|j| j.items.iter().map(|i| i.index).collect())
            .collect();
        assert_eq!(indices, vec![vec![1, 3, 5], vec![2, 4]]);
    }
}
