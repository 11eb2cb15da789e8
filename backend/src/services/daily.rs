//! Daily impression volume per flag.

use chrono::NaiveDate;
use log::warn;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{RecordError, RejectedRecord};
use crate::models::Timestamp;
use crate::routes::daily::{DailyChartData, DailyPoint, DailySeries};
use crate::services::normalizer::{
    lenient_count, resolve_flag, value_text, FieldAccessor, COUNT_FIELD,
};

/// Label of the "every flag" filter option.
pub const ALL_FLAGS: &str = "All";

pub const DATE_FIELD: FieldAccessor = FieldAccessor {
    canonical: "date",
    candidates: &["impression_date", "date", "utc"],
};

/// One normalized row of the daily export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRecord {
    pub flag: String,
    pub date: NaiveDate,
    pub count: u64,
}

/// Which series the chart shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlagFilter {
    #[default]
    All,
    Flag(String),
}

impl FlagFilter {
    /// `"All"` selects every flag, anything else a single flag.
    pub fn parse(label: &str) -> Self {
        match label {
            ALL_FLAGS => FlagFilter::All,
            flag => FlagFilter::Flag(flag.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FlagFilter::All => ALL_FLAGS,
            FlagFilter::Flag(flag) => flag,
        }
    }

    fn matches(&self, flag: &str) -> bool {
        match self {
            FlagFilter::All => true,
            FlagFilter::Flag(selected) => selected == flag,
        }
    }
}

/// Day of an `impression_date` value: the leading `YYYY-MM-DD` token, or any
/// full timestamp.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    let head = raw.split_whitespace().next()?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .ok()
        .or_else(|| Timestamp::parse(raw).map(|t| t.date()))
}

pub fn normalize_daily_record(raw: &Value) -> Result<DailyRecord, RecordError> {
    let record = raw.as_object().ok_or(RecordError::NotAnObject)?;
    let date_text = DATE_FIELD
        .resolve(record)
        .and_then(value_text)
        .ok_or(RecordError::MissingDate)?;
    let date = parse_day(&date_text).ok_or(RecordError::UnparseableDate(date_text))?;

    Ok(DailyRecord {
        flag: resolve_flag(record),
        date,
        count: lenient_count(COUNT_FIELD.resolve(record)),
    })
}

/// `count` dates picked from sorted distinct `dates` at a fixed stride of
/// `max(1, (len - 1) / (count - 1))`, clamped to the last date.
pub fn date_ticks(dates: &[NaiveDate], count: usize) -> Vec<NaiveDate> {
    let last = match dates.last() {
        Some(last) => *last,
        None => return vec![],
    };
    match count {
        0 => vec![],
        1 => vec![dates[0]],
        _ => {
            let interval = ((dates.len() - 1) / (count - 1)).max(1);
            (0..count)
                .map(|i| dates.get(i * interval).copied().unwrap_or(last))
                .collect()
        }
    }
}

/// Build the daily chart for raw export records.
pub fn build_daily_chart(
    records: &[Value],
    filter: &FlagFilter,
    tick_count: usize,
) -> DailyChartData {
    let mut rejected = Vec::new();
    let mut series: Vec<DailySeries> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (i, raw) in records.iter().enumerate() {
        let record = match normalize_daily_record(raw) {
            Ok(record) => record,
            Err(reason) => {
                warn!("Skipping daily record #{}: {}", i, reason);
                rejected.push(RejectedRecord { index: i, reason });
                continue;
            }
        };

        let slot = *index.entry(record.flag.clone()).or_insert_with(|| {
            series.push(DailySeries {
                flag: record.flag.clone(),
                points: vec![],
                total: 0,
            });
            series.len() - 1
        });
        let entry = &mut series[slot];
        entry.total += record.count;
        entry.points.push(DailyPoint {
            date: record.date,
            count: record.count,
        });
    }

    for s in &mut series {
        s.points.sort_by_key(|p| p.date);
    }

    let mut ranked: Vec<&DailySeries> = series.iter().collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total));
    let flags: Vec<String> = ranked.iter().map(|s| s.flag.clone()).collect();

    let selected: Vec<DailySeries> = series
        .into_iter()
        .filter(|s| filter.matches(&s.flag))
        .collect();

    let mut dates: Vec<NaiveDate> = selected
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.date))
        .collect();
    dates.sort();
    dates.dedup();

    DailyChartData {
        ticks: date_ticks(&dates, tick_count),
        series: selected,
        flags,
        selected: filter.label().to_string(),
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn days(n: u32) -> Vec<NaiveDate> {
        (1..=n)
            .map(|d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap())
            .collect()
    }

    #[test]
    fn test_normalize_daily_record() {
        let record = normalize_daily_record(&json!({
            "spltName": "checkout",
            "impression_date": "2024-05-01 00:00:00.000",
            "impression_count": "17"
        }))
        .unwrap();
        assert_eq!(record.flag, "checkout");
        assert_eq!(record.date, day("2024-05-01"));
        assert_eq!(record.count, 17);
    }

    #[test]
    fn test_normalize_daily_record_defaults() {
        let record = normalize_daily_record(&json!({
            "impression_date": "2024-05-01",
            "impression_count": "lots"
        }))
        .unwrap();
        assert_eq!(record.flag, "Unknown");
        assert_eq!(record.count, 0);
    }

    #[test]
    fn test_normalize_daily_record_errors() {
        assert_eq!(
            normalize_daily_record(&json!({"flag": "a"})),
            Err(RecordError::MissingDate)
        );
        assert_eq!(
            normalize_daily_record(&json!({"flag": "a", "impression_date": "May 1st"})),
            Err(RecordError::UnparseableDate("May 1st".to_string()))
        );
    }

    #[test]
    fn test_date_ticks_stride() {
        let dates = days(13);
        let ticks = date_ticks(&dates, 7);
        assert_eq!(ticks.len(), 7);
        assert_eq!(ticks[0], day("2024-05-01"));
        assert_eq!(ticks[1], day("2024-05-03"));
        assert_eq!(ticks[6], day("2024-05-13"));
    }

    #[test]
    fn test_date_ticks_few_dates_clamp_to_last() {
        let ticks = date_ticks(&days(3), 7);
        assert_eq!(
            ticks,
            vec![
                day("2024-05-01"),
                day("2024-05-02"),
                day("2024-05-03"),
                day("2024-05-03"),
                day("2024-05-03"),
                day("2024-05-03"),
                day("2024-05-03"),
            ]
        );
    }

    #[test]
    fn test_date_ticks_edge_counts() {
        assert!(date_ticks(&[], 7).is_empty());
        assert!(date_ticks(&days(5), 0).is_empty());
        assert_eq!(date_ticks(&days(5), 1), vec![day("2024-05-01")]);
    }

    #[test]
    fn test_build_daily_chart() {
        let records = vec![
            json!({"splitName": "small", "impression_date": "2024-05-02", "impression_count": 1}),
            json!({"splitName": "big", "impression_date": "2024-05-02", "impression_count": 50}),
            json!({"splitName": "small", "impression_date": "2024-05-01", "impression_count": 2}),
            json!({"splitName": "big", "impression_date": "bogus", "impression_count": 9}),
        ];
        let chart = build_daily_chart(&records, &FlagFilter::All, 7);

        assert_eq!(chart.flags, vec!["big", "small"]);
        assert_eq!(chart.selected, "All");
        assert_eq!(chart.series.len(), 2);
        let small = &chart.series[0];
        assert_eq!(small.flag, "small");
        assert_eq!(small.total, 3);
        assert_eq!(small.points[0].date, day("2024-05-01"));
        assert_eq!(chart.rejected.len(), 1);
        assert_eq!(chart.rejected[0].index, 3);
    }

    #[test]
    fn test_build_daily_chart_filtered() {
        let records = vec![
            json!({"splitName": "a", "impression_date": "2024-05-01", "impression_count": 1}),
            json!({"splitName": "b", "impression_date": "2024-05-09", "impression_count": 5}),
        ];
        let chart = build_daily_chart(&records, &FlagFilter::parse("a"), 7);

        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].flag, "a");
        // filter options still list every flag
        assert_eq!(chart.flags, vec!["b", "a"]);
        assert!(chart.ticks.iter().all(|d| *d == day("2024-05-01")));
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(FlagFilter::parse("All"), FlagFilter::All);
        assert_eq!(FlagFilter::parse("x").label(), "x");
    }
}
