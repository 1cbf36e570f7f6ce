use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};

use super::Field;

static AUTHOR_SPAN_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("main header ul li span").unwrap());
static HEADER_SPAN_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("main header ul span").unwrap());
static CATEGORY_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"main header span[itemprop="articleSection"]"#).unwrap());
static DATE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}\.\d{2}\.\d{2}").unwrap());

/// Header metadata shared by standard articles and listicles.
#[derive(Debug)]
pub struct BlogMeta {
    pub author: Field<String>,
    pub pub_date: Field<NaiveDate>,
    pub category: Field<String>,
}

pub fn extract(doc: &Html) -> BlogMeta {
    BlogMeta {
        author: author(doc),
        pub_date: pub_date(doc),
        category: category(doc),
    }
}

/// Author rule: first header list span, with the site's fixed 8-char prefix
/// ("Author: ") and one trailing artifact char sliced off. The slice is
/// markup-coupled, so an empty or too-short result is reported as malformed
/// instead of being stored as garbage.
fn author(doc: &Html) -> Field<String> {
    let Some(span) = doc.select(&AUTHOR_SPAN_SEL).next() else {
        return Field::Missing;
    };
    let raw: String = span.text().collect();
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() < 10 {
        return Field::Malformed(raw);
    }
    let name: String = chars[8..chars.len() - 1].iter().collect();
    if name.trim().is_empty() {
        return Field::Malformed(raw);
    }
    Field::Found(name)
}

/// Date rule: first header span whose text reads `<label>: MM.DD.YY<x>`,
/// where the trailing character is dropped before parsing.
fn pub_date(doc: &Html) -> Field<NaiveDate> {
    let raw = doc.select(&HEADER_SPAN_SEL).find_map(|span| {
        let text: String = span.text().collect();
        let (_, rest) = text.split_once(": ")?;
        DATE_TOKEN_RE.is_match(rest).then(|| rest.to_string())
    });
    let Some(raw) = raw else {
        return Field::Missing;
    };

    let mut chars = raw.chars();
    chars.next_back();
    match NaiveDate::parse_from_str(chars.as_str(), "%m.%d.%y") {
        Ok(date) => Field::Found(date),
        Err(_) => Field::Malformed(raw),
    }
}

fn category(doc: &Html) -> Field<String> {
    match doc.select(&CATEGORY_SEL).next() {
        Some(el) => Field::Found(el.text().collect::<String>().trim().to_string()),
        None => Field::Missing,
    }
}

// ── Tests ──
