use std::sync::LazyLock;

use scraper::{Html, Selector};

static TAGS_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#article-tags").unwrap());

/// Tags are optional: pages without an `#article-tags` element yield None.
/// Present tags come back as a `;`-joined, per-segment-trimmed list in
/// document order.
pub fn extract(doc: &Html) -> Option<String> {
    let el = doc.select(&TAGS_SEL).next()?;
    let joined = el
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(";");
    Some(joined)
}
