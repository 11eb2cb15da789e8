//! Journey query validation.

use serde::{Deserialize, Serialize};

use crate::config::QueryConfig;
use crate::error::QueryError;
use crate::services::normalizer::parse_leading_int;

/// A validated user-journey lookup: impressions of `key` over the last `days`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JourneyQuery {
    key: String,
    days: u32,
}

impl JourneyQuery {
    /// Validate raw form input. The key is trimmed; the day count is read by
    /// its leading integer.
    pub fn parse(key: &str, days: &str, limits: &QueryConfig) -> Result<Self, QueryError> {
        let key = key.trim();
        if key.chars().count() < limits.min_key_len {
            return Err(QueryError::KeyTooShort {
                min_len: limits.min_key_len,
            });
        }

        let out_of_range = QueryError::DaysOutOfRange {
            min: limits.min_days,
            max: limits.max_days,
        };
        let days = parse_leading_int(days).ok_or_else(|| out_of_range.clone())?;
        if days < i64::from(limits.min_days) || days > i64::from(limits.max_days) {
            return Err(out_of_range);
        }

        Ok(Self {
            key: key.to_string(),
            days: days as u32,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn days(&self) -> u32 {
        self.days
    }
}
