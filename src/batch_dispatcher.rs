/*!
 * Batch dispatch of subtitle conversions.
 *
 * This module contains functionality for running a conversion over every
 * matching file in a directory, with support for concurrency, progress
 * tracking and per-file failure accounting.
 */

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use futures::stream::{self, StreamExt};
use log::{error, info, warn};
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task;

use crate::app_config::{Config, NamingConfig, NamingPolicy, OperationKind};
use crate::errors::{ConvertError, DispatchError};
use crate::file_utils::FileManager;
use crate::subtitle_converter::SubtitleConverter;

/// One requested conversion over an input directory
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Operation to apply to every matching file
    pub operation: OperationKind,

    /// Directory whose direct entries are considered
    pub input_dir: PathBuf,

    /// Directory the output files are written into
    pub output_dir: PathBuf,

    /// Output naming options
    pub naming: NamingConfig,

    /// Whether to run tasks across a worker pool
    pub parallel: bool,
}

impl BatchJob {
    /// Build a job from the application configuration and a directory pair
    pub fn from_config(config: &Config, input_dir: PathBuf, output_dir: PathBuf) -> Self {
        BatchJob {
            operation: config.operation,
            input_dir,
            output_dir,
            naming: config.naming.clone(),
            parallel: config.parallel,
        }
    }
}

/// One input file paired with its computed output path
#[derive(Debug, Clone)]
pub struct FileTask {
    /// Input file path
    pub input: PathBuf,

    /// Computed output file path
    pub output: PathBuf,

    /// 1-based position in enumeration order
    pub index: usize,
}

/// Aggregate counts for a finished batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    /// Number of files converted successfully
    pub processed: usize,

    /// Number of files that failed
    pub failed: usize,

    /// Last progress fraction reported, 1.0 once every task completed
    pub progress: f64,
}

impl BatchResult {
    /// Total number of file tasks accounted for
    pub fn total(&self) -> usize {
        self.processed + self.failed
    }
}

/// Outcome of a batch run that passed configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// The input directory held no files matching the operation
    NoMatchingFiles,

    /// Every file task ran and was accounted for
    Completed(BatchResult),
}

/// Lifecycle of a batch job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// No job has been started yet
    Idle,
    /// A job is currently running
    Running,
    /// The last job finished and reported its counts
    Complete,
}

/// One progress tick, emitted after each task completes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    /// Number of tasks completed so far
    pub completed: usize,

    /// Total number of tasks in the batch
    pub total: usize,

    /// Running success count
    pub processed: usize,

    /// Running failure count
    pub failed: usize,
}

impl ProgressUpdate {
    /// Completion fraction in the range (0, 1]
    pub fn fraction(&self) -> f64 {
        self.completed as f64 / self.total as f64
    }
}

/// Receiver for progress ticks.
///
/// Invoked from worker completion; a hosting interface is responsible for
/// marshalling onto its own event loop if it needs to.
pub trait ProgressSink: Send + Sync {
    /// Called after each task completes
    fn on_progress(&self, update: ProgressUpdate);
}

/// Progress sink that discards every update
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn on_progress(&self, _update: ProgressUpdate) {}
}

/// Collaborator asked for a replacement output name per file when the
/// interactive rename policy is active.
///
/// Prompts are issued sequentially, before any conversion work is
/// dispatched, so implementations never see concurrent calls.
pub trait RenamePrompt: Send + Sync {
    /// Ask for a replacement name for `base_name`. Returning `None` or a
    /// blank string keeps the derived base name unmodified.
    fn ask(&self, base_name: &str) -> Option<String>;
}

/// Rename prompt that always keeps the derived name
pub struct NullRenamePrompt;

impl RenamePrompt for NullRenamePrompt {
    fn ask(&self, _base_name: &str) -> Option<String> {
        None
    }
}

/// Derive the output base name from an input file name.
///
/// The zero-hour operation strips a literal trailing `.mp4.vtt` if present,
/// otherwise a trailing `.vtt`; the conversion operation strips a trailing
/// `.srt`. Names without the expected suffix are kept whole.
pub fn derive_base_name(file_name: &str, operation: OperationKind) -> &str {
    let stripped = match operation {
        OperationKind::ZeroHourVtt => file_name
            .strip_suffix(".mp4.vtt")
            .or_else(|| file_name.strip_suffix(".vtt")),
        OperationKind::SrtToVtt => file_name.strip_suffix(".srt"),
    };
    stripped.unwrap_or(file_name)
}

/// Compute the output file name for a derived base name at a 1-based index,
/// under the configured naming options.
pub fn resolve_output_name(
    base_name: &str,
    index: usize,
    naming: &NamingConfig,
    prompt: &dyn RenamePrompt,
) -> String {
    match naming.policy() {
        NamingPolicy::Sequential => {
            format!("{}{}.vtt", naming.sequence_prefix.trim(), index)
        }
        NamingPolicy::Interactive => match prompt.ask(base_name) {
            Some(name) if !name.trim().is_empty() => format!("{}_{}.vtt", name.trim(), index),
            _ => format!("{}.vtt", base_name),
        },
        NamingPolicy::Default => format!("{}_{}.vtt", base_name, index),
    }
}

/// Size of the worker pool used when parallel execution is enabled
pub fn worker_pool_size() -> usize {
    let available = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2);
    available.clamp(2, 4)
}

/// Dispatcher for batch subtitle conversions.
///
/// Holds the job state machine: `Idle -> Running -> Complete`. Starting a
/// job while one is running is rejected synchronously and leaves the
/// current job untouched; a finished job always reaches `Complete`, even
/// when it errors, so another job may be started afterwards. There is no
/// mid-batch cancellation.
pub struct BatchDispatcher {
    // @field: Job state, serialized behind a mutex
    state: Mutex<JobState>,
}

impl Default for BatchDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchDispatcher {
    /// Create a dispatcher with no job started
    pub fn new() -> Self {
        BatchDispatcher {
            state: Mutex::new(JobState::Idle),
        }
    }

    /// Current job state
    pub fn state(&self) -> JobState {
        *self.state.lock()
    }

    /// Run a batch job to completion.
    ///
    /// Selects the matching input files, resolves every output path (asking
    /// `prompt` per file under the interactive rename policy), then converts
    /// each file either sequentially in enumeration order or across a
    /// bounded worker pool. Per-file failures are folded into the aggregate
    /// counts and never abort sibling tasks; `progress` receives one tick
    /// per completed task. Configuration problems fail the whole job before
    /// any file is touched.
    pub async fn run(
        &self,
        job: &BatchJob,
        prompt: &dyn RenamePrompt,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<BatchOutcome, DispatchError> {
        {
            let mut state = self.state.lock();
            if *state == JobState::Running {
                return Err(DispatchError::JobAlreadyRunning);
            }
            *state = JobState::Running;
        }

        let outcome = self.run_job(job, prompt, progress).await;

        // The job finalizes whatever happened, reporting accumulated counts
        // or the configuration error
        *self.state.lock() = JobState::Complete;

        outcome
    }

    async fn run_job(
        &self,
        job: &BatchJob,
        prompt: &dyn RenamePrompt,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<BatchOutcome, DispatchError> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&job.input_dir) {
            return Err(DispatchError::InputDirMissing(job.input_dir.clone()));
        }

        FileManager::ensure_dir(&job.output_dir).map_err(|e| {
            DispatchError::OutputDirUncreatable {
                path: job.output_dir.clone(),
                message: e.to_string(),
            }
        })?;

        let extension = job.operation.input_extension();
        let files = FileManager::list_files_with_extension(&job.input_dir, extension)
            .map_err(|e| DispatchError::InputDirUnreadable {
                path: job.input_dir.clone(),
                message: e.to_string(),
            })?;

        if files.is_empty() {
            info!(
                "No matching .{} files found in {:?}",
                extension, job.input_dir
            );
            return Ok(BatchOutcome::NoMatchingFiles);
        }

        let tasks = self.plan_tasks(job, &files, prompt);
        let total = tasks.len();
        info!(
            "{}: processing {} file(s) from {:?}",
            job.operation.display_name(),
            total,
            job.input_dir
        );

        let processed = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));

        if job.parallel && total > 1 {
            self.run_parallel(job.operation, tasks, &processed, &failed, &completed, &progress)
                .await;
        } else {
            for task in &tasks {
                Self::record_outcome(
                    convert_task(job.operation, task),
                    task,
                    &processed,
                    &failed,
                );
                emit_progress(&progress, &completed, total, &processed, &failed);
            }
        }

        let result = BatchResult {
            processed: processed.load(Ordering::SeqCst),
            failed: failed.load(Ordering::SeqCst),
            progress: 1.0,
        };

        info!(
            "Batch complete in {:.1?}: {} processed, {} failed",
            start_time.elapsed(),
            result.processed,
            result.failed
        );

        Ok(BatchOutcome::Completed(result))
    }

    /// Resolve every output path up front, in enumeration order. Interactive
    /// rename prompts happen here, strictly one at a time, so parallel
    /// dispatch later never issues concurrent prompts.
    fn plan_tasks(
        &self,
        job: &BatchJob,
        files: &[PathBuf],
        prompt: &dyn RenamePrompt,
    ) -> Vec<FileTask> {
        let tasks: Vec<FileTask> = files
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let index = i + 1;
                let file_name = input
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let base_name = derive_base_name(&file_name, job.operation);
                let output = job
                    .output_dir
                    .join(resolve_output_name(base_name, index, &job.naming, prompt));
                FileTask {
                    input: input.clone(),
                    output,
                    index,
                }
            })
            .collect();

        // Two inputs can collide on one output path; last writer wins
        let mut seen = HashSet::new();
        for task in &tasks {
            if !seen.insert(&task.output) {
                warn!(
                    "Output path {:?} is produced by more than one input file; last writer wins",
                    task.output
                );
            }
        }

        tasks
    }

    async fn run_parallel(
        &self,
        operation: OperationKind,
        tasks: Vec<FileTask>,
        processed: &Arc<AtomicUsize>,
        failed: &Arc<AtomicUsize>,
        completed: &Arc<AtomicUsize>,
        progress: &Arc<dyn ProgressSink>,
    ) {
        let total = tasks.len();
        let pool_size = worker_pool_size();

        // Bound in-flight conversions to the pool size
        let semaphore = Arc::new(Semaphore::new(pool_size));

        stream::iter(tasks.into_iter())
            .map(|task| {
                let semaphore = Arc::clone(&semaphore);
                let processed = Arc::clone(processed);
                let failed = Arc::clone(failed);
                let completed = Arc::clone(completed);
                let progress = Arc::clone(progress);

                async move {
                    // Acquire a permit from the semaphore
                    let _permit = semaphore.acquire().await.unwrap();

                    let outcome = task::spawn_blocking(move || {
                        let result = convert_task(operation, &task);
                        (task, result)
                    })
                    .await;

                    match outcome {
                        Ok((task, result)) => {
                            Self::record_outcome(result, &task, &processed, &failed);
                        }
                        Err(e) => {
                            error!("Conversion worker failed: {}", e);
                            failed.fetch_add(1, Ordering::SeqCst);
                        }
                    }

                    emit_progress(&progress, &completed, total, &processed, &failed);
                }
            })
            .buffer_unordered(pool_size)
            .collect::<Vec<_>>()
            .await;
    }

    fn record_outcome(
        result: Result<(), ConvertError>,
        task: &FileTask,
        processed: &AtomicUsize,
        failed: &AtomicUsize,
    ) {
        match result {
            Ok(()) => {
                info!("Success: {}", task.output.display());
                processed.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => {
                error!("Error converting {:?}: {}", task.input, e);
                failed.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}

fn convert_task(operation: OperationKind, task: &FileTask) -> Result<(), ConvertError> {
    match operation {
        OperationKind::ZeroHourVtt => SubtitleConverter::zero_hour_vtt(&task.input, &task.output),
        OperationKind::SrtToVtt => SubtitleConverter::srt_to_vtt(&task.input, &task.output),
    }
}

fn emit_progress(
    progress: &Arc<dyn ProgressSink>,
    completed: &AtomicUsize,
    total: usize,
    processed: &AtomicUsize,
    failed: &AtomicUsize,
) {
    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
    progress.on_progress(ProgressUpdate {
        completed: done,
        total,
        processed: processed.load(Ordering::SeqCst),
        failed: failed.load(Ordering::SeqCst),
    });
}
