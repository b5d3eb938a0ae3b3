//! Consecutive-visit streak computation.
//!
//! A streak is a run of visits for one patient where each visit is exactly
//! one calendar day after the previous one. The running count is zero at any
//! visit that does not continue a streak (first visit of a patient included)
//! and grows by one per continuing visit, so n consecutive daily visits reach
//! a maximum count of n - 1.

use chrono::NaiveDate;
use polars::prelude::*;

use adherence_model::{
    COL_CONSECUTIVE_VISITS, COL_DAYS_SINCE_LAST_VISIT, COL_EFFECTIVE_FROM_DATE, COL_PATIENT_ID,
    INPUT_DATE_FORMAT, Result, StreakOptions,
};

/// Internal run identifier, bumped at every streak break per patient.
const COL_STREAK_ID: &str = "streak_id";

/// Date columns store days since 1970-01-01.
fn days_from_epoch(date: NaiveDate) -> i32 {
    (date - NaiveDate::default()).num_days() as i32
}

/// The visit date as its physical day number, for gap arithmetic.
fn visit_day() -> Expr {
    col(COL_EFFECTIVE_FROM_DATE).cast(DataType::Int32)
}

/// Parse the raw `MMddyyyy` visit date string into a `Date` column.
///
/// Non-strict: unparseable values become null and drop out at the window
/// filter, matching the lenient behavior of the source extract.
pub fn parse_visit_dates(lf: LazyFrame) -> LazyFrame {
    lf.with_column(col(COL_EFFECTIVE_FROM_DATE).str().to_date(StrptimeOptions {
        format: Some(INPUT_DATE_FORMAT.into()),
        strict: false,
        exact: true,
        cache: true,
    }))
}

/// Keep visits inside `[end_date - window_days, end_date]`, both inclusive.
///
/// Null dates fail both comparisons and are dropped here.
pub fn filter_window(lf: LazyFrame, options: &StreakOptions) -> LazyFrame {
    let start = days_from_epoch(options.window_start());
    let end = days_from_epoch(options.end_date);
    let day = visit_day();
    lf.filter(day.clone().gt_eq(lit(start)).and(day.lt_eq(lit(end))))
}

/// Compute the day gap to the previous visit of the same patient.
///
/// Sorts by patient and date first so the lag is well defined; the first
/// visit of each patient gets a null gap.
pub fn days_since_last_visit(lf: LazyFrame) -> LazyFrame {
    let day = visit_day();
    lf.sort(
        [COL_PATIENT_ID, COL_EFFECTIVE_FROM_DATE],
        SortMultipleOptions::default(),
    )
    .with_column(
        (day.clone() - day.shift(lit(1)))
            .over([col(COL_PATIENT_ID)])
            .alias(COL_DAYS_SINCE_LAST_VISIT),
    )
}

/// Count the running streak length per patient.
///
/// A visit continues a streak only when its gap is exactly one day; any other
/// gap (the null first gap included, since it fails the comparison) starts a
/// new run with a count of zero.
pub fn count_consecutive_visits(lf: LazyFrame) -> LazyFrame {
    let is_step = col(COL_DAYS_SINCE_LAST_VISIT).eq(lit(1));
    let new_run = when(is_step.clone()).then(lit(0i32)).otherwise(lit(1i32));
    lf.with_column(
        new_run
            .cum_sum(false)
            .over([col(COL_PATIENT_ID)])
            .alias(COL_STREAK_ID),
    )
    .with_column(
        when(is_step)
            .then(lit(1i32))
            .otherwise(lit(0i32))
            .cum_sum(false)
            .over([col(COL_PATIENT_ID), col(COL_STREAK_ID)])
            .cast(DataType::Int32)
            .alias(COL_CONSECUTIVE_VISITS),
    )
}

/// Aggregate per patient: one boolean per threshold, true when the maximum
/// streak count reached it. Sorted by patient so output is deterministic.
pub fn threshold_flags(lf: LazyFrame, options: &StreakOptions) -> LazyFrame {
    let aggs: Vec<Expr> = options
        .thresholds
        .iter()
        .map(|threshold| {
            col(COL_CONSECUTIVE_VISITS)
                .max()
                .gt_eq(lit(threshold.min_streak))
                .alias(threshold.label.as_str())
        })
        .collect();
    lf.group_by([col(COL_PATIENT_ID)])
        .agg(aggs)
        .sort([COL_PATIENT_ID], SortMultipleOptions::default())
}

/// Reshape into the fixed output schema: `patient_id` as string followed by
/// the flag columns as booleans, in threshold order.
pub fn coerce_report_schema(lf: LazyFrame, options: &StreakOptions) -> LazyFrame {
    let mut columns = vec![col(COL_PATIENT_ID).cast(DataType::String)];
    for threshold in &options.thresholds {
        columns.push(col(threshold.label.as_str()).cast(DataType::Boolean));
    }
    lf.select(columns)
}

/// Stages 1-4: parsed, windowed, per-visit gap and streak columns.
///
/// Exposed separately so callers can report row counts before aggregation.
pub fn prepare_visits(lf: LazyFrame, options: &StreakOptions) -> LazyFrame {
    let lf = parse_visit_dates(lf);
    let lf = filter_window(lf, options);
    let lf = days_since_last_visit(lf);
    count_consecutive_visits(lf)
}

/// Run the full pipeline and collect the per-patient report.
pub fn build_streak_report(lf: LazyFrame, options: &StreakOptions) -> Result<DataFrame> {
    let visits = prepare_visits(lf, options);
    let report = coerce_report_schema(threshold_flags(visits, options), options).collect()?;
    tracing::debug!(patients = report.height(), "built streak report");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visits(rows: &[(&str, &str)]) -> LazyFrame {
        let dates: Vec<String> = rows.iter().map(|(date, _)| (*date).to_string()).collect();
        let patients: Vec<String> = rows.iter().map(|(_, id)| (*id).to_string()).collect();
        DataFrame::new(vec![
            Series::new(COL_EFFECTIVE_FROM_DATE.into(), dates).into(),
            Series::new(COL_PATIENT_ID.into(), patients).into(),
        ])
        .unwrap()
        .lazy()
    }

    fn mmddyyyy(date: NaiveDate) -> String {
        date.format("%m%d%Y").to_string()
    }

    fn daily_rows(patient: &str, start: NaiveDate, count: usize) -> Vec<(String, String)> {
        (0..count)
            .map(|offset| {
                let date = start + chrono::Duration::days(offset as i64);
                (mmddyyyy(date), patient.to_string())
            })
            .collect()
    }

    fn rows_as_refs(rows: &[(String, String)]) -> Vec<(&str, &str)> {
        rows.iter()
            .map(|(date, id)| (date.as_str(), id.as_str()))
            .collect()
    }

    fn flag(report: &DataFrame, patient: &str, column: &str) -> bool {
        let ids = report.column(COL_PATIENT_ID).unwrap().str().unwrap();
        let idx = ids
            .into_iter()
            .position(|value| value == Some(patient))
            .unwrap_or_else(|| panic!("patient {patient} missing from report"));
        report
            .column(column)
            .unwrap()
            .bool()
            .unwrap()
            .get(idx)
            .unwrap()
    }

    #[test]
    fn test_twelve_consecutive_visits_set_all_flags() {
        let start = NaiveDate::from_ymd_opt(2016, 9, 1).unwrap();
        let rows = daily_rows("P001", start, 12);
        let report =
            build_streak_report(visits(&rows_as_refs(&rows)), &StreakOptions::default()).unwrap();

        assert!(flag(&report, "P001", "5months"));
        assert!(flag(&report, "P001", "9months"));
        assert!(flag(&report, "P001", "11months"));
    }

    #[test]
    fn test_ten_consecutive_visits_miss_eleven_threshold() {
        // Ten consecutive dates yield a maximum running count of nine.
        let start = NaiveDate::from_ymd_opt(2016, 9, 1).unwrap();
        let rows = daily_rows("P001", start, 10);
        let report =
            build_streak_report(visits(&rows_as_refs(&rows)), &StreakOptions::default()).unwrap();

        assert!(flag(&report, "P001", "5months"));
        assert!(flag(&report, "P001", "9months"));
        assert!(!flag(&report, "P001", "11months"));
    }

    #[test]
    fn test_five_visits_do_not_reach_five_threshold() {
        // Five consecutive dates are four one-day steps; six are needed.
        let start = NaiveDate::from_ymd_opt(2016, 9, 1).unwrap();
        let five = daily_rows("P005", start, 5);
        let six = daily_rows("P006", start, 6);
        let mut rows = five;
        rows.extend(six);
        let report =
            build_streak_report(visits(&rows_as_refs(&rows)), &StreakOptions::default()).unwrap();

        assert!(!flag(&report, "P005", "5months"));
        assert!(flag(&report, "P006", "5months"));
    }

    #[test]
    fn test_single_visit_sets_no_flags() {
        let report = build_streak_report(
            visits(&[("09152016", "P001")]),
            &StreakOptions::default(),
        )
        .unwrap();

        assert!(!flag(&report, "P001", "5months"));
        assert!(!flag(&report, "P001", "9months"));
        assert!(!flag(&report, "P001", "11months"));
    }

    #[test]
    fn test_gap_resets_streak_count() {
        // 09-01..09-03, a two-day jump, then 09-05..09-06.
        let rows = [
            ("09012016", "P001"),
            ("09022016", "P001"),
            ("09032016", "P001"),
            ("09052016", "P001"),
            ("09062016", "P001"),
        ];
        let frame = prepare_visits(visits(&rows), &StreakOptions::default())
            .collect()
            .unwrap();

        let gaps = frame.column(COL_DAYS_SINCE_LAST_VISIT).unwrap().i32().unwrap();
        assert_eq!(gaps.get(0), None);
        assert_eq!(gaps.get(1), Some(1));
        assert_eq!(gaps.get(2), Some(1));
        assert_eq!(gaps.get(3), Some(2));
        assert_eq!(gaps.get(4), Some(1));

        let counts = frame.column(COL_CONSECUTIVE_VISITS).unwrap().i32().unwrap();
        assert_eq!(counts.get(0), Some(0));
        assert_eq!(counts.get(1), Some(1));
        assert_eq!(counts.get(2), Some(2));
        assert_eq!(counts.get(3), Some(0)); // reset at the two-day gap
        assert_eq!(counts.get(4), Some(1));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        // Default window: 2015-10-01 through 2016-09-30.
        let rows = [
            ("09302015", "P001"), // day before window start
            ("10012015", "P001"), // window start
            ("09302016", "P001"), // window end
            ("10012016", "P001"), // day after window end
        ];
        let frame = prepare_visits(visits(&rows), &StreakOptions::default())
            .collect()
            .unwrap();

        assert_eq!(frame.height(), 2);
    }

    #[test]
    fn test_out_of_window_visit_excluded_from_gap() {
        // 2015-09-30 is adjacent to 2015-10-01 but outside the window, so the
        // in-window visit must start a fresh run instead of continuing one.
        let rows = [
            ("09302015", "P001"),
            ("10012015", "P001"),
            ("10022015", "P001"),
        ];
        let frame = prepare_visits(visits(&rows), &StreakOptions::default())
            .collect()
            .unwrap();

        assert_eq!(frame.height(), 2);
        let gaps = frame.column(COL_DAYS_SINCE_LAST_VISIT).unwrap().i32().unwrap();
        assert_eq!(gaps.get(0), None);
        let counts = frame.column(COL_CONSECUTIVE_VISITS).unwrap().i32().unwrap();
        assert_eq!(counts.get(0), Some(0));
        assert_eq!(counts.get(1), Some(1));
    }

    #[test]
    fn test_unparseable_dates_are_dropped() {
        let rows = [
            ("notadate", "P001"),
            ("02302016", "P001"), // February 30th
            ("09152016", "P001"),
        ];
        let frame = prepare_visits(visits(&rows), &StreakOptions::default())
            .collect()
            .unwrap();

        assert_eq!(frame.height(), 1);
    }

    #[test]
    fn test_streaks_are_partitioned_per_patient() {
        // Interleaved input rows; P002's visit on 09-02 must not continue
        // P001's streak.
        let rows = [
            ("09012016", "P001"),
            ("09022016", "P002"),
            ("09022016", "P001"),
            ("09032016", "P002"),
        ];
        let frame = prepare_visits(visits(&rows), &StreakOptions::default())
            .collect()
            .unwrap();

        // Sorted by patient then date.
        let ids = frame.column(COL_PATIENT_ID).unwrap().str().unwrap();
        assert_eq!(ids.get(0), Some("P001"));
        assert_eq!(ids.get(2), Some("P002"));
        let counts = frame.column(COL_CONSECUTIVE_VISITS).unwrap().i32().unwrap();
        assert_eq!(counts.get(0), Some(0));
        assert_eq!(counts.get(1), Some(1));
        assert_eq!(counts.get(2), Some(0));
        assert_eq!(counts.get(3), Some(1));
    }

    #[test]
    fn test_report_is_sorted_by_patient_id() {
        let rows = [
            ("09012016", "P900"),
            ("09012016", "P100"),
            ("09012016", "P500"),
        ];
        let report =
            build_streak_report(visits(&rows), &StreakOptions::default()).unwrap();

        let ids = report.column(COL_PATIENT_ID).unwrap().str().unwrap();
        assert_eq!(ids.get(0), Some("P100"));
        assert_eq!(ids.get(1), Some("P500"));
        assert_eq!(ids.get(2), Some("P900"));
    }

    #[test]
    fn test_report_schema_matches_options() {
        let report = build_streak_report(
            visits(&[("09152016", "P001")]),
            &StreakOptions::default(),
        )
        .unwrap();

        let names: Vec<&str> = report
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, vec!["patient_id", "5months", "9months", "11months"]);
        assert_eq!(report.column("patient_id").unwrap().dtype(), &DataType::String);
        assert_eq!(report.column("5months").unwrap().dtype(), &DataType::Boolean);
    }

    #[test]
    fn test_custom_window_options() {
        let options = StreakOptions::default()
            .with_end_date(NaiveDate::from_ymd_opt(2020, 3, 31).unwrap())
            .with_window_days(30);
        let rows = [
            ("03012020", "P001"),
            ("03022020", "P001"),
            ("01152020", "P001"), // outside the 30-day window
        ];
        let frame = prepare_visits(visits(&rows), &options).collect().unwrap();

        assert_eq!(frame.height(), 2);
    }
}
