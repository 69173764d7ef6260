//! Stage observers: the pipeline's logging sinks.
//!
//! Each stage entry operation reports to an optional [`PipelineObserver`]:
//!
//! - `on_stage_started` when the stage begins
//! - `on_progress` after each completed step (read, split, fit, write, ...)
//! - `on_stage_finished` on success, with row/column counts
//! - `on_failure` before the wrapped [`StageError`] is returned

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Stage, StageError};

/// Context about a stage run.
#[derive(Debug, Clone)]
pub struct StageContext {
    /// Which stage is running.
    pub stage: Stage,
    /// Input files the stage reads.
    pub inputs: Vec<PathBuf>,
}

impl StageContext {
    /// Create a context for `stage` reading `inputs`.
    pub fn new(stage: Stage, inputs: Vec<PathBuf>) -> Self {
        Self { stage, inputs }
    }

    fn inputs_display(&self) -> String {
        self.inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Counts reported when a stage succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStats {
    /// Rows in the training output.
    pub train_rows: usize,
    /// Rows in the test output.
    pub test_rows: usize,
    /// Columns in the outputs.
    pub columns: usize,
}

/// Observer interface for stage outcomes.
///
/// Implementors can record logs or metrics. All methods default to no-ops.
pub trait PipelineObserver: Send + Sync {
    /// Called when a stage begins.
    fn on_stage_started(&self, _ctx: &StageContext) {}

    /// Called after a step inside a stage completes.
    fn on_progress(&self, _ctx: &StageContext, _message: &str) {}

    /// Called when a stage succeeds.
    fn on_stage_finished(&self, _ctx: &StageContext, _stats: StageStats) {}

    /// Called when a stage fails, before the error is returned to the caller.
    fn on_failure(&self, _ctx: &StageContext, _error: &StageError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_stage_started(&self, ctx: &StageContext) {
        for o in &self.observers {
            o.on_stage_started(ctx);
        }
    }

    fn on_progress(&self, ctx: &StageContext, message: &str) {
        for o in &self.observers {
            o.on_progress(ctx, message);
        }
    }

    fn on_stage_finished(&self, ctx: &StageContext, stats: StageStats) {
        for o in &self.observers {
            o.on_stage_finished(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &StageContext, error: &StageError) {
        for o in &self.observers {
            o.on_failure(ctx, error);
        }
    }
}

/// Emits stage events through `tracing`.
///
/// Output format and filtering are decided by whichever subscriber the host installs.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_stage_started(&self, ctx: &StageContext) {
        tracing::info!(stage = %ctx.stage, inputs = %ctx.inputs_display(), "stage started");
    }

    fn on_progress(&self, ctx: &StageContext, message: &str) {
        tracing::info!(stage = %ctx.stage, "{message}");
    }

    fn on_stage_finished(&self, ctx: &StageContext, stats: StageStats) {
        tracing::info!(
            stage = %ctx.stage,
            train_rows = stats.train_rows,
            test_rows = stats.test_rows,
            columns = stats.columns,
            "stage completed"
        );
    }

    fn on_failure(&self, ctx: &StageContext, error: &StageError) {
        tracing::error!(stage = %ctx.stage, "{error}");
    }
}

/// Appends stage events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Create `dir` and log to a file in it named after the current local time
    /// (`%m_%d_%Y_%H_%M_%S.log`).
    pub fn in_dir(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let name = chrono::Local::now().format("%m_%d_%Y_%H_%M_%S.log").to_string();
        Ok(Self::new(dir.join(name)))
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_line(&self, stage: Stage, level: &str, message: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(
                f,
                "[ {} ] {stage} - {level} - {message}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
            );
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_stage_started(&self, ctx: &StageContext) {
        self.append_line(
            ctx.stage,
            "INFO",
            &format!("stage started inputs={}", ctx.inputs_display()),
        );
    }

    fn on_progress(&self, ctx: &StageContext, message: &str) {
        self.append_line(ctx.stage, "INFO", message);
    }

    fn on_stage_finished(&self, ctx: &StageContext, stats: StageStats) {
        self.append_line(
            ctx.stage,
            "INFO",
            &format!(
                "stage completed train_rows={} test_rows={} columns={}",
                stats.train_rows, stats.test_rows, stats.columns
            ),
        );
    }

    fn on_failure(&self, ctx: &StageContext, error: &StageError) {
        self.append_line(ctx.stage, "ERROR", &error.to_string());
    }
}

/// Optional observer handle carried by each stage.
#[derive(Clone, Default)]
pub(crate) struct Reporter {
    observer: Option<Arc<dyn PipelineObserver>>,
}

impl Reporter {
    pub(crate) fn new(observer: Option<Arc<dyn PipelineObserver>>) -> Self {
        Self { observer }
    }

    pub(crate) fn started(&self, ctx: &StageContext) {
        if let Some(obs) = &self.observer {
            obs.on_stage_started(ctx);
        }
    }

    pub(crate) fn progress(&self, ctx: &StageContext, message: &str) {
        if let Some(obs) = &self.observer {
            obs.on_progress(ctx, message);
        }
    }

    pub(crate) fn finished(&self, ctx: &StageContext, stats: StageStats) {
        if let Some(obs) = &self.observer {
            obs.on_stage_finished(ctx, stats);
        }
    }

    pub(crate) fn failed(&self, ctx: &StageContext, error: &StageError) {
        if let Some(obs) = &self.observer {
            obs.on_failure(ctx, error);
        }
    }
}
