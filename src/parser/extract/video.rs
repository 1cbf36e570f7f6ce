use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};

use super::Field;

static ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("main article div.row").unwrap());
static SPAN_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());
static CATEGORY_LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span a").unwrap());
static DESCRIPTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"div[class*="vid-exchange"]"#).unwrap());
static DATE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}\.\d{2}\.\d{2}").unwrap());

/// Fields specific to video pages. Author is intentionally absent: video
/// pages carry none.
#[derive(Debug)]
pub struct VideoFields {
    pub pub_date: Field<NaiveDate>,
    pub category: Field<String>,
    pub body: Field<String>,
}

pub fn extract(doc: &Html) -> VideoFields {
    let Some(row) = doc.select(&ROW_SEL).next() else {
        return VideoFields {
            pub_date: Field::Missing,
            category: Field::Missing,
            body: Field::Missing,
        };
    };

    // Date: first span in the description row whose text looks like MM.DD.YY.
    let pub_date = match row.select(&SPAN_SEL).find_map(|span| {
        let text: String = span.text().collect();
        DATE_TOKEN_RE.is_match(&text).then_some(text)
    }) {
        Some(raw) => match NaiveDate::parse_from_str(&raw, "%m.%d.%y") {
            Ok(date) => Field::Found(date),
            Err(_) => Field::Malformed(raw),
        },
        None => Field::Missing,
    };

    // Category: title attribute of the first linked label.
    let category = match row
        .select(&CATEGORY_LINK_SEL)
        .next()
        .and_then(|a| a.value().attr("title"))
    {
        Some(title) => Field::Found(title.to_string()),
        None => Field::Missing,
    };

    let body = match row.select(&DESCRIPTION_SEL).next() {
        Some(desc) => Field::Found(desc.text().collect::<String>().trim().to_string()),
        None => Field::Missing,
    };

    VideoFields {
        pub_date,
        category,
        body,
    }
}

// ── Tests ──
