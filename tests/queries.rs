use subway_congestion::QueryError;
use subway_congestion::ingestion::{LoadOptions, load};
use subway_congestion::processing::{
    FilterSpec, NOT_AVAILABLE, RankBy, aggregate_for_heatmap, aggregate_for_line, apply_filters,
    column_profiles, compare_by_direction, compare_by_weekday, compute_kpis, dataset_summary,
    get_congestion_stats, top_n_stations,
};
use subway_congestion::types::CongestionTable;

fn fixture() -> CongestionTable {
    load(&LoadOptions {
        encoding: "utf-8".to_string(),
        ..LoadOptions::for_path("tests/fixtures/congestion.csv")
    })
    .unwrap()
}

#[test]
fn kpis_without_filters_cover_the_whole_table() {
    let kpis = compute_kpis(&fixture(), &FilterSpec::default());
    assert_eq!(kpis.total_records, 48);
    assert_eq!(kpis.peak_congestion, 130.5);
    // 130.5 appears at 강남 내선 08:00 and 강남 외선 18:00; 내선 sorts first.
    assert_eq!(kpis.peak_time, "08:00");
    assert_eq!(kpis.avg_congestion, 38.7);
}

#[test]
fn kpis_for_line_weekday_and_commute_window() {
    let spec = FilterSpec::new()
        .with_line("2호선")
        .with_weekday("평일")
        .with_time_period("출근");
    let kpis = compute_kpis(&fixture(), &spec);
    assert_eq!(kpis.total_records, 6);
    assert_eq!(kpis.peak_congestion, 130.5);
    assert_eq!(kpis.peak_time, "08:00");
}

#[test]
fn late_night_window_includes_post_midnight_slots() {
    let table = fixture();
    let late = apply_filters(&table, &FilterSpec::new().with_time_period("심야"));
    assert_eq!(late.row_count(), 18);
    assert!(
        late.iter()
            .all(|r| ["23:30", "24:00", "24:30"].contains(&r.time_slot.as_str()))
    );

    let kpis = compute_kpis(&table, &FilterSpec::new().with_time_period("심야"));
    assert_eq!(kpis.peak_congestion, 50.0);
    assert_eq!(kpis.peak_time, "23:30");
}

#[test]
fn filters_that_match_nothing_yield_empty_kpis() {
    let kpis = compute_kpis(&fixture(), &FilterSpec::new().with_station("없는역"));
    assert_eq!(kpis.total_records, 0);
    assert_eq!(kpis.peak_congestion, 0.0);
    assert_eq!(kpis.avg_congestion, 0.0);
    assert_eq!(kpis.peak_time, NOT_AVAILABLE);
}

#[test]
fn filter_spec_from_json_matches_builder() {
    let json = r#"{"line":["1호선"],"direction":["상선"],"time_period":"출근"}"#;
    let from_json = serde_json::from_str::<FilterSpec>(json).unwrap();
    let built = FilterSpec::new()
        .with_line("1호선")
        .with_direction("상선")
        .with_time_period("출근");
    assert_eq!(from_json, built);

    let table = fixture();
    let filtered = apply_filters(&table, &from_json);
    // 평일 + 일요일 상선 rows, 06:00 / 07:30 / 08:00
    assert_eq!(filtered.row_count(), 6);
}

#[test]
fn line_summaries_are_sorted_by_average_descending() {
    let lines = aggregate_for_line(&fixture());
    let names = lines.iter().map(|l| l.line.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["2호선", "1호선"]);

    assert_eq!(lines[0].max_congestion, 130.5);
    assert_eq!(lines[0].peak_time, "08:00");
    assert_eq!(lines[1].avg_congestion, 31.4);
    assert_eq!(lines[1].max_congestion, 95.1);
}

#[test]
fn direction_summaries_are_in_direction_order() {
    let directions = compare_by_direction(&fixture());
    let names = directions
        .iter()
        .map(|d| d.direction.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["내선", "상선", "외선", "하선"]);

    let outer = &directions[2];
    assert_eq!(outer.avg_congestion, 52.8);
    assert_eq!(outer.max_congestion, 130.5);
    assert_eq!(outer.peak_time, "18:00");
}

#[test]
fn weekday_comparison_groups_weekend_days() {
    let weekday = compare_by_weekday(&fixture());
    assert_eq!(weekday.len(), 2);
    assert_eq!(weekday[0].category, "평일");
    assert_eq!(weekday[0].avg_congestion, 46.4);
    assert_eq!(weekday[0].max_congestion, 130.5);
    assert_eq!(weekday[1].category, "주말");
    assert_eq!(weekday[1].max_congestion, 60.0);
}

#[test]
fn heatmap_has_one_cell_per_slot_and_line() {
    let heatmap = aggregate_for_heatmap(&fixture());
    assert_eq!(heatmap.time_slots.len(), 8);
    assert_eq!(heatmap.lines, vec!["1호선", "2호선"]);
    assert_eq!(heatmap.time_slots.last().map(String::as_str), Some("24:30"));
    assert_eq!(heatmap.get("08:00", "1호선"), Some(71.3));
    assert_eq!(heatmap.get("24:30", "1호선"), Some(0.3));
    assert_eq!(heatmap.get("09:00", "1호선"), None);
}

#[test]
fn top_stations_rank_by_max_and_average() {
    let table = fixture();

    let by_max = top_n_stations(&table, 3, RankBy::Max);
    assert_eq!(by_max.len(), 2);
    assert_eq!(by_max[0].rank, 1);
    assert_eq!(by_max[0].station_name, "강남");
    assert_eq!(by_max[0].line, "2호선");
    assert_eq!(by_max[0].congestion, 130.5);
    assert_eq!(by_max[1].station_name, "서울역");
    assert_eq!(by_max[1].congestion, 95.1);

    let by_avg = top_n_stations(&table, 1, "avg".parse::<RankBy>().unwrap());
    assert_eq!(by_avg.len(), 1);
    assert_eq!(by_avg[0].station_name, "강남");

    assert!(top_n_stations(&table, 0, RankBy::Max).is_empty());
}

#[test]
fn unknown_rank_by_is_rejected() {
    let err = "median".parse::<RankBy>().unwrap_err();
    assert_eq!(
        err,
        QueryError::InvalidRankBy {
            value: "median".to_string(),
        }
    );
}

#[test]
fn stats_and_profiles_over_fixture() {
    let table = fixture();

    let stats = get_congestion_stats(&table);
    assert_eq!(stats.mean, 38.7);
    assert_eq!(stats.std, 40.2);
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 130.5);
    assert_eq!(stats.q25, 8.0);
    assert_eq!(stats.q50, 25.0);
    assert_eq!(stats.q75, 60.0);

    let summary = dataset_summary(&table);
    assert_eq!(summary.total_records, 48);
    assert_eq!(summary.stations, 2);
    assert_eq!(summary.lines, 2);
    assert_eq!(summary.time_slots, 8);

    let profiles = column_profiles(&table);
    let weekday = profiles.iter().find(|p| p.name == "weekday").unwrap();
    assert_eq!(weekday.unique_count, 3);
}
