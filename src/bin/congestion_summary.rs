//! Print a JSON summary of a congestion export.
//!
//! Usage: `congestion_summary [path/to/export.csv]`
//!
//! Without a path the first `data/*.csv` is used. Set `RUST_LOG` to adjust logging.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use serde::Serialize;
use subway_congestion::ingestion::{FileInfo, LoadOptions, TracingObserver, csv_info, load};
use subway_congestion::processing::{
    CongestionStats, DatasetSummary, DirectionSummary, FilterSpec, Kpis, LineSummary, RankBy, StationRank,
    WeekdayComparison, aggregate_for_line, compare_by_direction, compare_by_weekday, compute_kpis,
    dataset_summary, get_congestion_stats, top_n_stations,
};
use tracing_subscriber::{EnvFilter, fmt};

const TOP_STATIONS: usize = 10;

#[derive(Serialize)]
struct Report {
    file: Option<FileInfo>,
    summary: DatasetSummary,
    kpis: Kpis,
    stats: CongestionStats,
    lines: Vec<LineSummary>,
    directions: Vec<DirectionSummary>,
    weekday: Vec<WeekdayComparison>,
    top_stations: Vec<StationRank>,
}

fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let options = LoadOptions {
        path: std::env::args_os().nth(1).map(PathBuf::from),
        observer: Some(Arc::new(TracingObserver)),
        ..Default::default()
    };

    let table = match load(&options) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let report = Report {
        file: csv_info(&options),
        summary: dataset_summary(&table),
        kpis: compute_kpis(&table, &FilterSpec::default()),
        stats: get_congestion_stats(&table),
        lines: aggregate_for_line(&table),
        directions: compare_by_direction(&table),
        weekday: compare_by_weekday(&table),
        top_stations: top_n_stations(&table, TOP_STATIONS, RankBy::Max),
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize report: {e}");
            ExitCode::FAILURE
        }
    }
}
