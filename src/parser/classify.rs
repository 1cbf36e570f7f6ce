use std::sync::LazyLock;

use scraper::{Html, Selector};

static LISTICLE_INTRO_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#listicle-intro").unwrap());

/// Three-way page classification. There is no fallback kind: a page that
/// classifies as `Standard` but lacks the expected structure fails during
/// extraction instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Video,
    Listicle,
    Standard,
}

pub fn classify(doc: &Html, url: &str) -> PageKind {
    if url.contains("video") {
        return PageKind::Video;
    }
    if doc.select(&LISTICLE_INTRO_SEL).next().is_some() {
        PageKind::Listicle
    } else {
        PageKind::Standard
    }
}
