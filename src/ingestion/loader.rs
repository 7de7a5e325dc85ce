//! Loader entrypoint.
//!
//! Most callers should use [`load`], which locates the input file, decodes it, repairs the
//! header, coerces congestion cells and reshapes the result into a [`CongestionTable`].
//!
//! - If [`LoadOptions::path`] is `None`, the first `*.csv` file (sorted by path) under
//!   [`LoadOptions::data_dir`] is used.
//! - If a [`LoadObserver`] is configured, success/failure/alerts are reported to it.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{LoadError, LoadResult};
use crate::types::{CongestionTable, WideTable};

use super::encoding::{DEFAULT_ENCODING, decode_with_fallback, encoding_for_label};
use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats, severity_for_error};
use super::{csv, reshape};

/// Directory searched when no explicit path is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Options controlling how input is located and decoded.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// Explicit input file; overrides discovery when set.
    pub path: Option<PathBuf>,
    /// Directory searched for `*.csv` when `path` is `None`.
    pub data_dir: PathBuf,
    /// Primary encoding label (UTF-8 is always tried as a fallback).
    pub encoding: String,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("path", &self.path)
            .field("data_dir", &self.data_dir)
            .field("encoding", &self.encoding)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            path: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            encoding: DEFAULT_ENCODING.to_string(),
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

impl LoadOptions {
    /// Options that load `path` directly, skipping discovery.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }
}

/// Basic information about the input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    pub file_name: String,
    /// Size in MiB, rounded to 2 decimals.
    pub file_size_mb: f64,
    pub file_path: PathBuf,
}

/// Load and normalize the congestion export described by `options`.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with [`LoadStats`]
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use subway_congestion::ingestion::{load, LoadOptions};
///
/// # fn main() -> Result<(), subway_congestion::LoadError> {
/// // Picks the first data/*.csv, decoded as CP949 with a UTF-8 fallback.
/// let table = load(&LoadOptions::default())?;
/// println!("records={}", table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load(options: &LoadOptions) -> LoadResult<CongestionTable> {
    let mut ctx = LoadContext {
        path: None,
        encoding: options.encoding.clone(),
    };

    let result = resolve_path(options).and_then(|path| {
        ctx.path = Some(path.clone());
        let bytes = read_source(&path)?;
        normalize_with_stats(&bytes, &options.encoding)
    });

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok((_, stats)) => obs.on_success(&ctx, *stats),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result.map(|(table, _)| table)
}

/// Load `path` with otherwise default options.
pub fn load_from_path(path: impl AsRef<Path>) -> LoadResult<CongestionTable> {
    load(&LoadOptions::for_path(path.as_ref()))
}

/// Normalize raw file bytes decoded with the `encoding` label (UTF-8 fallback).
pub fn normalize_bytes(bytes: &[u8], encoding: &str) -> LoadResult<CongestionTable> {
    normalize_with_stats(bytes, encoding).map(|(table, _)| table)
}

/// Decode, repair and coerce raw bytes into the wide table, without reshaping.
pub fn load_wide_from_bytes(bytes: &[u8], encoding: &str) -> LoadResult<WideTable> {
    decode_to_wide(bytes, encoding).map(|(wide, _)| wide)
}

fn decode_to_wide(bytes: &[u8], encoding: &str) -> LoadResult<(WideTable, bool)> {
    let primary = encoding_for_label(encoding)?;
    let decoded = decode_with_fallback(bytes, primary)?;
    let raw = csv::read_raw_table(&decoded.text)?;
    Ok((csv::coerce_to_wide(&raw)?, decoded.used_fallback))
}

fn normalize_with_stats(bytes: &[u8], encoding: &str) -> LoadResult<(CongestionTable, LoadStats)> {
    let (wide, used_fallback_encoding) = decode_to_wide(bytes, encoding)?;
    let table = reshape::to_long_format(&wide);

    let stats = LoadStats {
        wide_rows: wide.row_count(),
        time_slots: wide.time_column_count(),
        records: table.row_count(),
        header_repaired: wide.header_repaired,
        used_fallback_encoding,
    };
    Ok((table, stats))
}

/// Resolve the input path: the explicit override, or the first `*.csv` under `data_dir`.
pub fn resolve_path(options: &LoadOptions) -> LoadResult<PathBuf> {
    match &options.path {
        Some(path) => Ok(path.clone()),
        None => discover_csv(&options.data_dir),
    }
}

/// Find the first `*.csv` file (sorted by path) directly under `dir`.
pub fn discover_csv(dir: &Path) -> LoadResult<PathBuf> {
    let pattern = format!(
        "{}/*.csv",
        glob::Pattern::escape(&dir.to_string_lossy())
    );

    let entries = glob::glob(&pattern).map_err(|e| LoadError::NotFound {
        searched: format!("{pattern} ({e})"),
    })?;
    let mut found = entries.filter_map(Result::ok).collect::<Vec<_>>();
    found.sort();

    tracing::debug!(pattern = %pattern, candidates = found.len(), "searched for input files");
    found
        .into_iter()
        .next()
        .ok_or(LoadError::NotFound { searched: pattern })
}

fn read_source(path: &Path) -> LoadResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::NotFound {
            searched: path.display().to_string(),
        },
        _ => LoadError::Io(e),
    })
}

/// Describe the input file that [`load`] would read, or `None` if there is none.
pub fn csv_info(options: &LoadOptions) -> Option<FileInfo> {
    let path = resolve_path(options).ok()?;
    let meta = std::fs::metadata(&path).ok()?;
    if !meta.is_file() {
        return None;
    }

    let size_mb = meta.len() as f64 / (1024.0 * 1024.0);
    Some(FileInfo {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        file_size_mb: (size_mb * 100.0).round_ties_even() / 100.0,
        file_path: path,
    })
}

/// Convenience helper for callers that want an owned request object.
///
/// Useful when the load is deferred to a background job or keyed in a cache.
#[derive(Clone, Debug)]
pub struct LoadRequest {
    pub options: LoadOptions,
}

impl LoadRequest {
    /// Execute the request by calling [`load`].
    pub fn run(&self) -> LoadResult<CongestionTable> {
        load(&self.options)
    }
}
