use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::*;

/// Point in time with millisecond resolution (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp, truncating anything finer than a millisecond.
    pub fn new(dt: DateTime<Utc>) -> Self {
        let millis = dt.timestamp_millis();
        Self(DateTime::from_timestamp_millis(millis).unwrap_or(dt))
    }

    /// Create from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Milliseconds since the Unix epoch.
    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Calendar date (UTC) of this instant.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// `YYYY-MM-DD` label used on chart axes.
    pub fn date_label(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Parse the timestamp shapes found in impression exports.
    ///
    /// Accepts RFC 3339 (`2024-05-01T12:00:00.123Z`), the space separated form
    /// Athena emits (`2024-05-01 12:00:00.123`, UTC assumed), a bare date
    /// (`2024-05-01`, midnight UTC) and integer epoch milliseconds.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self::new(dt.with_timezone(&Utc)));
        }

        for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Self::new(naive.and_utc()));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Self::new(naive.and_utc()));
        }

        s.parse::<i64>().ok().and_then(Self::from_millis)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::new(dt)
    }
}

/// Global time span shared by every series rendered together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub min_time: Timestamp,
    pub max_time: Timestamp,
}

impl TimeWindow {
    /// Build a window from two bounds in either order.
    pub fn new(a: Timestamp, b: Timestamp) -> Self {
        if a <= b {
            Self {
                min_time: a,
                max_time: b,
            }
        } else {
            Self {
                min_time: b,
                max_time: a,
            }
        }
    }

    /// Smallest window covering every timestamp, or `None` when there are none.
    pub fn covering<I>(timestamps: I) -> Option<Self>
    where
        I: IntoIterator<Item = Timestamp>,
    {
        timestamps.into_iter().fold(None, |window, t| match window {
            None => Some(Self::new(t, t)),
            Some(w) => Some(Self::new(w.min_time.min(t), w.max_time.max(t))),
        })
    }

    pub fn span_millis(&self) -> i64 {
        self.max_time.millis() - self.min_time.millis()
    }

    /// True when every observation shares one timestamp.
    pub fn is_degenerate(&self) -> bool {
        self.span_millis() == 0
    }

    /// Denominator for fractional coordinates; 1 for a zero-length window.
    pub fn denominator(&self) -> f64 {
        match self.span_millis() {
            0 => 1.0,
            span => span as f64,
        }
    }

    /// Clamp an instant into the window.
    pub fn clamp(&self, t: Timestamp) -> Timestamp {
        t.max(self.min_time).min(self.max_time)
    }

    /// Position of `t` within the window as a fraction in `[0, 1]`.
    pub fn fraction_of(&self, t: Timestamp) -> f64 {
        let offset = self.clamp(t).millis() - self.min_time.millis();
        (offset as f64 / self.denominator()).clamp(0.0, 1.0)
    }
}
