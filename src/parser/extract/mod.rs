pub mod body;
pub mod meta;
pub mod tags;
pub mod video;

use crate::error::ScrapeError;

/// Outcome of one named selector + extraction rule. `Malformed` carries the
/// raw text that failed the rule, so anomalies are loggable instead of
/// turning into silently corrupted fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Found(T),
    Missing,
    Malformed(String),
}

impl<T> Field<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Field::Found(v) => Some(v),
            Field::Missing | Field::Malformed(_) => None,
        }
    }

    /// Treat absence or malformation as a structural failure for this page.
    pub fn require(self, what: &str) -> Result<T, ScrapeError> {
        match self {
            Field::Found(v) => Ok(v),
            Field::Missing => Err(ScrapeError::Structure(format!("{what} not found"))),
            Field::Malformed(raw) => Err(ScrapeError::Structure(format!(
                "{what} malformed: {raw:?}"
            ))),
        }
    }
}

impl Field<chrono::NaiveDate> {
    /// Dates distinguish "span absent" (structure) from "text present but
    /// not a date" (date format).
    pub fn require_date(self, what: &str) -> Result<chrono::NaiveDate, ScrapeError> {
        match self {
            Field::Found(d) => Ok(d),
            Field::Missing => Err(ScrapeError::Structure(format!("{what} not found"))),
            Field::Malformed(raw) => Err(ScrapeError::DateFormat { raw }),
        }
    }
}
