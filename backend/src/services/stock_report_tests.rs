use super::*;
use crate::models::{upsert_record, Yard, WeeklyRecord};

fn week(s: &str) -> WeekKey {
    s.parse().unwrap()
}

fn yard(name: &str, category: Category, min: Option<u32>, max: Option<u32>) -> Yard {
    Yard::new(name, category).with_band(min, max)
}

fn catalog(yards: Vec<Yard>) -> YardCatalog {
    yards.into_iter().map(|y| (y.name.clone(), y)).collect()
}

fn report(history: &mut WeeklyHistory, yard: &str, stock: u32, w: &str) {
    let key = week(w);
    upsert_record(history, key, WeeklyRecord::new(yard, stock, key.date()));
}

fn row<'a>(report: &'a StockReport, name: &str) -> &'a YardStockRow {
    report.rows.iter().find(|r| r.yard == name).unwrap()
}

#[test]
fn test_empty_catalog_yields_zero_summary() {
    let mut history = WeeklyHistory::new();
    report(&mut history, "Orphan", 10, "2024-01-15");

    let result = summarize(&YardCatalog::new(), &history, week("2024-01-15"));

    assert!(result.rows.is_empty());
    assert_eq!(result.summary.total, 0);
    assert_eq!(result.summary.by_category, CategoryTotals::default());
    assert_eq!(result.summary.yard_count, 0);
    assert!(result.summary.unreported_yards.is_empty());
}

#[test]
fn test_empty_history_rows_mirror_catalog() {
    let yards = catalog(vec![
        yard("North", Category::SelfOwned, None, None),
        yard("South", Category::External, Some(1), Some(2)),
    ]);

    let result = summarize(&yards, &WeeklyHistory::new(), week("2024-01-15"));

    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.summary.total, 0);
    for r in &result.rows {
        assert_eq!(r.current_stock, None);
        assert_eq!(r.previous_stock, None);
        assert_eq!(r.delta, None);
        assert_eq!(r.reporting, Reporting::Never);
        assert_eq!(r.staleness, Staleness::Critical);
        assert!(!r.out_of_band);
        assert!(!r.estimated);
    }
    assert_eq!(result.summary.unreported_yards, vec!["North", "South"]);
    assert_eq!(result.summary.unresolved_yards, vec!["North", "South"]);
}

#[test]
fn test_backfill_from_two_weeks_earlier() {
    let yards = catalog(vec![yard("A", Category::SelfOwned, Some(10), Some(50))]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 40, "2024-01-01");

    let result = summarize(&yards, &history, week("2024-01-15"));
    let a = row(&result, "A");

    assert_eq!(a.current_stock, Some(40));
    assert!(a.estimated);
    assert!(!a.reported_this_week());
    assert_eq!(a.unreported_weeks(), Some(2));
    assert_eq!(a.reporting, Reporting::Lapsed { weeks: 2 });
    assert_eq!(a.staleness, Staleness::Warning);
    assert_eq!(a.band, BandStatus::WithinBand);
    assert!(!a.out_of_band);
    assert_eq!(result.summary.unreported_yards, vec!["A"]);
    assert_eq!(result.summary.total, 40);
}

#[test]
fn test_nearest_prior_week_wins_and_flags_out_of_band() {
    let yards = catalog(vec![yard("A", Category::SelfOwned, Some(10), Some(50))]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 40, "2024-01-01");
    report(&mut history, "A", 60, "2024-01-08");

    let result = summarize(&yards, &history, week("2024-01-15"));
    let a = row(&result, "A");

    assert_eq!(a.current_stock, Some(60));
    assert_eq!(a.band, BandStatus::AboveMax);
    assert!(a.out_of_band);
    assert_eq!(a.unreported_weeks(), Some(1));
    assert_eq!(result.summary.out_of_band_yards, vec!["A"]);
}

#[test]
fn test_reported_this_week() {
    let yards = catalog(vec![yard("A", Category::External, None, None)]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 25, "2024-01-08");
    report(&mut history, "A", 30, "2024-01-15");

    let result = summarize(&yards, &history, week("2024-01-15"));
    let a = row(&result, "A");

    assert_eq!(a.current_stock, Some(30));
    assert!(!a.estimated);
    assert!(a.reported_this_week());
    assert_eq!(a.unreported_weeks(), Some(0));
    assert_eq!(a.staleness, Staleness::Ok);
    assert_eq!(a.previous_stock, Some(25));
    assert_eq!(a.delta, Some(5));
    assert_eq!(a.band, BandStatus::NoLimits);
    assert!(result.summary.unreported_yards.is_empty());
}

#[test]
fn test_delta_is_unknown_without_previous_stock() {
    let yards = catalog(vec![yard("A", Category::External, None, None)]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 30, "2024-01-15");

    let a = summarize(&yards, &history, week("2024-01-15")).rows.remove(0);

    assert_eq!(a.current_stock, Some(30));
    assert_eq!(a.previous_stock, None);
    assert_eq!(a.delta, None);
}

#[test]
fn test_unchanged_stock_gives_zero_delta() {
    let yards = catalog(vec![yard("A", Category::External, None, None)]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 30, "2024-01-08");
    report(&mut history, "A", 30, "2024-01-15");

    let a = summarize(&yards, &history, week("2024-01-15")).rows.remove(0);
    assert_eq!(a.delta, Some(0));
}

#[test]
fn test_previous_week_is_backfilled_from_older_weeks() {
    let yards = catalog(vec![yard("A", Category::External, None, None)]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 10, "2024-01-01");
    report(&mut history, "A", 18, "2024-01-15");

    let a = summarize(&yards, &history, week("2024-01-15")).rows.remove(0);

    // 2024-01-08 has no record, so previous stock comes from 2024-01-01
    assert_eq!(a.previous_stock, Some(10));
    assert_eq!(a.delta, Some(8));
}

#[test]
fn test_negative_delta() {
    let yards = catalog(vec![yard("A", Category::External, None, None)]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 50, "2024-01-08");
    report(&mut history, "A", 20, "2024-01-15");

    let a = summarize(&yards, &history, week("2024-01-15")).rows.remove(0);
    assert_eq!(a.delta, Some(-30));
}

#[test]
fn test_records_after_target_are_ignored() {
    let yards = catalog(vec![yard("A", Category::External, None, None)]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 10, "2024-01-01");
    report(&mut history, "A", 99, "2024-02-05");

    let a = summarize(&yards, &history, week("2024-01-15")).rows.remove(0);

    assert_eq!(a.current_stock, Some(10));
    assert_eq!(a.last_report_week, Some(week("2024-01-01")));
    assert_eq!(a.unreported_weeks(), Some(2));
}

#[test]
fn test_last_report_date_comes_from_latest_record() {
    let yards = catalog(vec![yard("A", Category::External, None, None)]);
    let mut history = WeeklyHistory::new();
    let submitted = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    upsert_record(
        &mut history,
        week("2024-01-08"),
        WeeklyRecord::new("A", 5, submitted),
    );

    let a = summarize(&yards, &history, week("2024-01-22")).rows.remove(0);

    assert_eq!(a.last_report_week, Some(week("2024-01-08")));
    assert_eq!(a.last_report_date, Some(submitted));
    assert_eq!(a.reporting, Reporting::Lapsed { weeks: 2 });
}

#[test]
fn test_long_gap_is_critical() {
    let yards = catalog(vec![yard("A", Category::External, None, None)]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 5, "2023-12-04");

    let a = summarize(&yards, &history, week("2024-01-15")).rows.remove(0);
    assert_eq!(a.unreported_weeks(), Some(6));
    assert_eq!(a.staleness, Staleness::Critical);
}

#[test]
fn test_category_totals_and_grand_total() {
    let yards = catalog(vec![
        yard("A", Category::SelfOwned, None, None),
        yard("B", Category::SelfOwned, None, None),
        yard("C", Category::JointVenture, None, None),
        yard("D", Category::External, None, None),
        yard("E", Category::Other("Consignment".to_string()), None, None),
        yard("F", Category::External, None, None),
    ]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 10, "2024-01-15");
    report(&mut history, "B", 5, "2024-01-08");
    report(&mut history, "C", 7, "2024-01-15");
    report(&mut history, "D", 3, "2024-01-15");
    report(&mut history, "E", 4, "2024-01-15");

    let result = summarize(&yards, &history, week("2024-01-15"));
    let totals = result.summary.by_category;

    assert_eq!(totals.self_owned, 15);
    assert_eq!(totals.joint_venture, 7);
    assert_eq!(totals.external, 3);
    assert_eq!(totals.other, 4);
    assert_eq!(result.summary.total, 29);
    assert_eq!(totals.sum(), result.summary.total);
    assert_eq!(result.summary.unreported_yards, vec!["B", "F"]);
    assert_eq!(result.summary.unresolved_yards, vec!["F"]);
    assert_eq!(result.summary.yard_count, 6);
}

#[test]
fn test_orphan_records_do_not_count() {
    let yards = catalog(vec![yard("A", Category::SelfOwned, None, None)]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 10, "2024-01-15");
    report(&mut history, "Deleted", 500, "2024-01-15");

    let result = summarize(&yards, &history, week("2024-01-15"));
    assert_eq!(result.summary.total, 10);
    assert_eq!(result.rows.len(), 1);
}

#[test]
fn test_rows_sorted_by_yard_name() {
    let yards = catalog(vec![
        yard("Zeta", Category::SelfOwned, None, None),
        yard("Alpha", Category::SelfOwned, None, None),
        yard("Mid", Category::SelfOwned, None, None),
    ]);
    let result = summarize(&yards, &WeeklyHistory::new(), week("2024-01-15"));
    let names: Vec<&str> = result.rows.iter().map(|r| r.yard.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
}

#[test]
fn test_summarize_is_deterministic() {
    let yards = catalog(vec![
        yard("A", Category::SelfOwned, Some(1), Some(100)),
        yard("B", Category::External, None, None),
    ]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 10, "2024-01-01");
    report(&mut history, "B", 3, "2024-01-15");
    let snapshot = Snapshot::new(yards, history);

    assert_eq!(
        snapshot.summarize(week("2024-01-15")),
        snapshot.summarize(week("2024-01-15"))
    );
}

#[test]
fn test_only_min_threshold_never_out_of_band() {
    let yards = catalog(vec![yard("A", Category::SelfOwned, Some(100), None)]);
    let mut history = WeeklyHistory::new();
    report(&mut history, "A", 1, "2024-01-15");

    let a = summarize(&yards, &history, week("2024-01-15")).rows.remove(0);
    assert_eq!(a.band, BandStatus::NoLimits);
    assert!(!a.out_of_band);
}

#[test]
fn test_first_representable_week_has_no_previous_stock() {
    let first = (0..7)
        .find_map(|d| WeekKey::containing(chrono::NaiveDate::MIN + chrono::Days::new(d)))
        .unwrap();
    assert!(first.previous().is_none());

    let yards = catalog(vec![yard("North", Category::SelfOwned, None, None)]);
    let mut history = WeeklyHistory::new();
    upsert_record(&mut history, first, WeeklyRecord::new("North", 12, first.date()));

    let result = summarize(&yards, &history, first);
    let north = row(&result, "North");
    assert_eq!(north.current_stock, Some(12));
    assert_eq!(north.previous_stock, None);
    assert_eq!(north.delta, None);
}
