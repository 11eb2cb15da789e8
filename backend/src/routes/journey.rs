use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::services::table_sort::TableRow;

// =========================================================
// Journey table types
// =========================================================

/// Table sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Header arrow shown next to the sorted column.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("Unknown sort direction '{}'. Use asc or desc.", other)),
        }
    }
}

/// Column and direction of a table sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Desc)
    }
}

/// Parses `column[:asc|desc]`; the direction defaults to ascending.
impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.split_once(':') {
            Some((column, direction)) => (column, direction.parse::<SortDirection>()?),
            None => (s, SortDirection::Asc),
        };
        let column = column.trim();
        if column.is_empty() {
            return Err(format!("Missing sort column in '{}'", s));
        }
        Ok(SortSpec::new(column, direction))
    }
}

/// Sorted journey table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyTable {
    /// Column names, taken from the first row
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
    pub sort: SortSpec,
}
