use serde::{Deserialize, Serialize};

use super::time::Timestamp;

/// Canonical impression: which treatment of a flag was shown, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Impression {
    pub flag: String,
    pub timestamp: Timestamp,
    pub treatment: String,
}

impl Impression {
    pub fn new(
        flag: impl Into<String>,
        timestamp: Timestamp,
        treatment: impl Into<String>,
    ) -> Self {
        Self {
            flag: flag.into(),
            timestamp,
            treatment: treatment.into(),
        }
    }
}
