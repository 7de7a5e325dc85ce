use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::LoadError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (load failed on the input's content).
    Error,
    /// Critical error (missing input, I/O failures).
    Critical,
}

/// Context about a load attempt.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// Resolved input path, if discovery got that far.
    pub path: Option<PathBuf>,
    /// Configured primary encoding label.
    pub encoding: String,
}

impl LoadContext {
    fn path_display(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unresolved>".to_string())
    }
}

/// Stats reported on a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows in the wide input.
    pub wide_rows: usize,
    /// Time-slot columns in the wide input.
    pub time_slots: usize,
    /// Records in the normalized long table.
    pub records: usize,
    /// Whether the header row was replaced by the canonical header.
    pub header_repaired: bool,
    /// Whether the UTF-8 fallback decoded the input.
    pub used_fallback_encoding: bool,
}

/// Observer interface for load outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait LoadObserver: Send + Sync {
    /// Called when loading succeeds.
    fn on_success(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    /// Called when loading fails.
    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &LoadError) {}

    /// Called when a load failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Classify a load error for observers.
pub fn severity_for_error(e: &LoadError) -> LoadSeverity {
    match e {
        LoadError::NotFound { .. } | LoadError::Io(_) => LoadSeverity::Critical,
        LoadError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => LoadSeverity::Critical,
            _ => LoadSeverity::Error,
        },
        LoadError::Decode { .. } | LoadError::UnknownEncoding { .. } | LoadError::MissingColumns { .. } => {
            LoadSeverity::Error
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
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

impl LoadObserver for CompositeObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits load events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        tracing::info!(
            path = %ctx.path_display(),
            encoding = %ctx.encoding,
            wide_rows = stats.wide_rows,
            time_slots = stats.time_slots,
            records = stats.records,
            header_repaired = stats.header_repaired,
            fallback_encoding = stats.used_fallback_encoding,
            "congestion data loaded"
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        tracing::error!(
            path = %ctx.path_display(),
            severity = ?severity,
            err = %error,
            "congestion data load failed"
        );
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        tracing::error!(
            alert = true,
            path = %ctx.path_display(),
            severity = ?severity,
            err = %error,
            "congestion data load failed"
        );
    }
}

/// Appends load events to a local log file.
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

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl LoadObserver for FileObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.append_line(&format!(
            "{} ok path={} encoding={} wide_rows={} time_slots={} records={} header_repaired={}",
            unix_ts(),
            ctx.path_display(),
            ctx.encoding,
            stats.wide_rows,
            stats.time_slots,
            stats.records,
            stats.header_repaired
        ));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.append_line(&format!(
            "{} fail severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.path_display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &LoadError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.path_display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
