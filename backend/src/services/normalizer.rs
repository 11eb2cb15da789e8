//! Raw record normalization.
//!
//! Impression exports do not agree on field names (`splitName`, `splitname`,
//! `flag`, ...). Each canonical field is resolved through an explicit, ordered
//! list of candidate keys; the first candidate holding a usable value wins.

use log::warn;
use serde_json::{Map, Value};

use crate::error::{DashboardError, DashboardResult, RecordError, RejectedRecord};
use crate::models::{Impression, Timestamp};

/// Placeholder flag name for records without any flag field.
pub const UNKNOWN_FLAG: &str = "Unknown";

/// Ordered candidate keys for one canonical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldAccessor {
    pub canonical: &'static str,
    pub candidates: &'static [&'static str],
}

pub const FLAG_FIELD: FieldAccessor = FieldAccessor {
    canonical: "flag",
    candidates: &["spltName", "splitName", "splitname", "flag"],
};

pub const TIMESTAMP_FIELD: FieldAccessor = FieldAccessor {
    canonical: "timestamp",
    candidates: &["utc", "timestamp", "impression_date"],
};

pub const TREATMENT_FIELD: FieldAccessor = FieldAccessor {
    canonical: "treatment",
    candidates: &["treatment"],
};

pub const COUNT_FIELD: FieldAccessor = FieldAccessor {
    canonical: "count",
    candidates: &["impression_count", "count"],
};

impl FieldAccessor {
    /// First candidate holding a usable value: present, non-null and, for
    /// strings, non-blank.
    pub fn resolve<'a>(&self, record: &'a Map<String, Value>) -> Option<&'a Value> {
        self.candidates
            .iter()
            .filter_map(|key| record.get(*key))
            .find(|value| is_usable(value))
    }

    /// Resolved value rendered as text.
    pub fn resolve_text(&self, record: &Map<String, Value>) -> Option<String> {
        self.resolve(record).and_then(value_text)
    }
}

fn is_usable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Scalar value as text; `None` for null, arrays and objects.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Leading integer of a string, the way form inputs are read: optional sign,
/// then digits, anything after ignored. `"30 days"` is 30, `"abc"` is `None`.
pub(crate) fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Lenient count: numbers are truncated, strings read by their leading
/// integer, anything else (or a negative result) becomes 0.
pub fn lenient_count(value: Option<&Value>) -> u64 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => parse_leading_int(s),
        _ => None,
    };
    parsed.map(|n| n.max(0) as u64).unwrap_or(0)
}

/// Flag name of a record, falling back to [`UNKNOWN_FLAG`].
pub fn resolve_flag(record: &Map<String, Value>) -> String {
    FLAG_FIELD
        .resolve_text(record)
        .unwrap_or_else(|| UNKNOWN_FLAG.to_string())
}

fn resolve_timestamp(record: &Map<String, Value>) -> Result<Timestamp, RecordError> {
    let value = TIMESTAMP_FIELD
        .resolve(record)
        .ok_or(RecordError::MissingTimestamp)?;

    let parsed = match value {
        Value::Number(n) => n.as_i64().and_then(Timestamp::from_millis),
        Value::String(s) => Timestamp::parse(s),
        _ => None,
    };

    parsed.ok_or_else(|| {
        RecordError::UnparseableTimestamp(value_text(value).unwrap_or_else(|| value.to_string()))
    })
}

/// Normalize one raw record into an [`Impression`].
///
/// A missing flag becomes [`UNKNOWN_FLAG`] and a missing treatment the empty
/// label; only a missing or unparseable timestamp rejects the record.
pub fn normalize_record(raw: &Value) -> Result<Impression, RecordError> {
    let record = raw.as_object().ok_or(RecordError::NotAnObject)?;
    let timestamp = resolve_timestamp(record)?;
    let treatment = TREATMENT_FIELD.resolve_text(record).unwrap_or_default();

    Ok(Impression {
        flag: resolve_flag(record),
        timestamp,
        treatment,
    })
}

/// Outcome of normalizing a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    /// Normalized impressions, in input order
    pub impressions: Vec<Impression>,
    pub rejected: Vec<RejectedRecord>,
}

/// Normalize every record of a batch; malformed records are reported, never
/// fatal.
pub fn normalize_batch(records: &[Value]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for (index, raw) in records.iter().enumerate() {
        match normalize_record(raw) {
            Ok(impression) => batch.impressions.push(impression),
            Err(reason) => {
                warn!("Skipping impression record #{}: {}", index, reason);
                batch.rejected.push(RejectedRecord { index, reason });
            }
        }
    }

    batch
}

/// Parse a JSON export into its list of records.
///
/// Accepts a top-level array, or an object wrapping the array under
/// `records`, `items` or `data`.
pub fn parse_records(json: &str) -> DashboardResult<Vec<Value>> {
    let document: Value = serde_json::from_str(json)?;
    match document {
        Value::Array(records) => Ok(records),
        Value::Object(mut object) => ["records", "items", "data"]
            .iter()
            .find_map(|key| match object.remove(*key) {
                Some(Value::Array(records)) => Some(records),
                _ => None,
            })
            .ok_or_else(|| {
                DashboardError::InvalidDocument(format!(
                    "expected an array of records, found object with keys {:?}",
                    object.keys().collect::<Vec<_>>()
                ))
            }),
        other => Err(DashboardError::InvalidDocument(format!(
            "expected an array of records, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
