use thiserror::Error;

/// Everything that can go wrong while processing a single article URL.
/// The crawler catches these per URL and keeps going; only run-level
/// failures (seed fetch, DB open) abort the whole run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("page structure mismatch: {0}")]
    Structure(String),

    #[error("date text {raw:?} does not match %m.%d.%y")]
    DateFormat { raw: String },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Coarse error class, used for run-summary counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Structure,
    DateFormat,
    Storage,
}

impl ScrapeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::Fetch { .. } => ErrorKind::Fetch,
            ScrapeError::Structure(_) => ErrorKind::Structure,
            ScrapeError::DateFormat { .. } => ErrorKind::DateFormat,
            ScrapeError::Storage(_) => ErrorKind::Storage,
        }
    }
}
