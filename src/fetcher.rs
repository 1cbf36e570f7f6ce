use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::info;

use crate::error::ScrapeError;

pub const SEED_URL: &str = "https://www.wired.com/";

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://www\.wired\.com/").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Where page bodies come from. The crawler is generic over this so tests
/// can run against canned documents instead of the live site.
pub trait PageSource {
    async fn get(&self, url: &str) -> Result<String, ScrapeError>;
}

pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wired_scraper/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    async fn get(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        response.text().await.map_err(|e| ScrapeError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Fetch the seed page and collect deduplicated candidate article links:
/// every anchor whose href matches the site-prefix pattern.
pub async fn discover_links<S: PageSource>(
    source: &S,
    seed: &str,
) -> Result<Vec<String>, ScrapeError> {
    info!("Fetching seed page: {}", seed);
    let body = source.get(seed).await?;

    let doc = Html::parse_document(&body);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut links = Vec::new();
    for anchor in doc.select(&ANCHOR_SEL) {
        if let Some(href) = anchor.value().attr("href") {
            if LINK_RE.is_match(href) && seen.insert(href) {
                links.push(href.to_string());
            }
        }
    }

    info!("Candidate article links: {}", links.len());
    Ok(links)
}

// ── Tests ──
