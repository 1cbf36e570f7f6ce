use std::time::{Duration, Instant};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use scraper::Html;
use tracing::{info, warn};

use crate::db::{self, ArticleRecord};
use crate::error::{ErrorKind, ScrapeError};
use crate::fetcher::PageSource;
use crate::{parser, segment};

const BASE_BACKOFF_MS: u64 = 500;

pub struct CrawlOptions {
    /// Minimum interval between page fetches.
    pub delay: Duration,
    /// Extra fetch attempts for `Fetch` errors only; 0 keeps the
    /// no-retry reference behavior.
    pub retries: u32,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            retries: 0,
        }
    }
}

/// Per-run outcome counts, one bucket per error kind.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub ok: usize,
    pub fetch: usize,
    pub structure: usize,
    pub date_format: usize,
    pub storage: usize,
}

impl RunSummary {
    fn record(&mut self, kind: ErrorKind) {
        match kind {
            ErrorKind::Fetch => self.fetch += 1,
            ErrorKind::Structure => self.structure += 1,
            ErrorKind::DateFormat => self.date_format += 1,
            ErrorKind::Storage => self.storage += 1,
        }
    }

    pub fn failed(&self) -> usize {
        self.fetch + self.structure + self.date_format + self.storage
    }

    pub fn print(&self) {
        println!(
            "Processed {} links: {} ok, {} failed ({} fetch, {} structure, {} date, {} storage).",
            self.total, self.ok, self.failed(),
            self.fetch, self.structure, self.date_format, self.storage,
        );
    }
}

/// Process every link strictly sequentially: fetch, extract, segment,
/// persist. A failure of any kind skips that URL and the run continues;
/// only the passed-in collaborators failing to exist at all (seed fetch, DB
/// open) abort a run, and that happens before this function is called.
///
/// With `conn` set to None the pipeline runs without the sink (dry runs).
pub async fn crawl<S: PageSource>(
    source: &S,
    conn: Option<&Connection>,
    links: &[String],
    opts: &CrawlOptions,
) -> Result<RunSummary> {
    let mut summary = RunSummary {
        total: links.len(),
        ..Default::default()
    };

    let pb = ProgressBar::new(links.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({eta})")?
            .progress_chars("=> "),
    );

    let mut last_fetch: Option<Instant> = None;
    for url in links {
        if let Some(t) = last_fetch {
            let since = t.elapsed();
            if since < opts.delay {
                tokio::time::sleep(opts.delay - since).await;
            }
        }
        last_fetch = Some(Instant::now());

        match process_url(source, url, opts.retries).await {
            Ok(record) => {
                let persisted = match conn {
                    Some(conn) => db::insert_article(conn, &record).map(Some),
                    None => Ok(None),
                };
                match persisted {
                    Ok(docid) => {
                        if let Some(docid) = docid {
                            info!(url = %url, docid, sentences = record.sentences.len(), "stored");
                        }
                        summary.ok += 1;
                    }
                    Err(e) => {
                        warn!(url = %url, error = %e, "not successful");
                        summary.record(e.kind());
                    }
                }
            }
            Err(e) => {
                warn!(url = %url, error = %e, "not successful");
                summary.record(e.kind());
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        ok = summary.ok,
        failed = summary.failed(),
        "crawl finished"
    );
    Ok(summary)
}

/// Fetch, parse and segment a single URL into a ready-to-persist record.
pub async fn process_url<S: PageSource>(
    source: &S,
    url: &str,
    retries: u32,
) -> Result<ArticleRecord, ScrapeError> {
    let body = fetch_with_retry(source, url, retries).await?;
    let doc = Html::parse_document(&body);
    let mut record = parser::process_page(&doc, url)?;
    record.sentences = segment::split_sentences(&record.body);
    Ok(record)
}

async fn fetch_with_retry<S: PageSource>(
    source: &S,
    url: &str,
    retries: u32,
) -> Result<String, ScrapeError> {
    let mut attempt = 0;
    loop {
        match source.get(url).await {
            Ok(body) => return Ok(body),
            Err(e @ ScrapeError::Fetch { .. }) if attempt < retries => {
                let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
                warn!(url = %url, error = %e, "fetch failed, backing off {:?}", backoff);
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

// ── Tests ──
