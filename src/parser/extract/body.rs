use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use super::Field;

static ARTICLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("main article").unwrap());
static LISTICLE_INTRO_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#listicle-intro").unwrap());
static ITEM_PARA_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div p").unwrap());

fn element_text(el: ElementRef) -> String {
    el.text().collect()
}

/// Standard-article body: walk the direct children of `main article` in
/// document order and collect text segments.
///
/// `p` and `h3` elements get a terminating period when their text does not
/// already end in punctuation (headings reused as pseudo-sentences would
/// otherwise glue onto the next sentence). Other elements and raw text nodes
/// are taken verbatim; comments are skipped.
pub fn extract_standard(doc: &Html) -> Field<String> {
    let Some(article) = doc.select(&ARTICLE_SEL).next() else {
        return Field::Missing;
    };

    let mut segments: Vec<String> = Vec::new();
    for child in article.children() {
        match child.value() {
            Node::Element(el) => {
                let Some(elem) = ElementRef::wrap(child) else {
                    continue;
                };
                let text = element_text(elem);
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                if el.name() == "p" || el.name() == "h3" {
                    let mut segment = text.to_string();
                    if !segment.ends_with(|c: char| c.is_ascii_punctuation()) {
                        segment.push('.');
                    }
                    segments.push(segment);
                } else {
                    segments.push(text.to_string());
                }
            }
            Node::Text(t) => {
                let trimmed = t.trim();
                if !trimmed.is_empty() {
                    segments.push(trimmed.to_string());
                }
            }
            // Comments and anything else carry no body text.
            _ => {}
        }
    }

    Field::Found(segments.join(" "))
}

/// Listicle body: the intro element's text first, then the first nested
/// paragraph of each direct-child listicle div, in document order.
///
/// Unlike the standard path, no punctuation completion is applied here.
pub fn extract_listicle(doc: &Html) -> Field<String> {
    let Some(intro) = doc.select(&LISTICLE_INTRO_SEL).next() else {
        return Field::Missing;
    };
    let Some(article) = doc.select(&ARTICLE_SEL).next() else {
        return Field::Missing;
    };

    let mut segments = vec![element_text(intro).trim().to_string()];
    for child in article.children() {
        let Some(elem) = ElementRef::wrap(child) else {
            continue;
        };
        if elem.value().name() != "div" {
            continue;
        }
        let class = elem.value().attr("class").unwrap_or("");
        if !class.contains("listicle") {
            continue;
        }
        match elem.select(&ITEM_PARA_SEL).next() {
            Some(para) => segments.push(element_text(para).trim().to_string()),
            None => return Field::Malformed(format!("listicle item {class:?} has no paragraph")),
        }
    }

    Field::Found(segments.join(" "))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_and_headings_get_terminated() {
        let doc = Html::parse_document(
            "<main><article>\
               <p>Hello world</p>\
               <h3>A heading</h3>\
               <p>Already done.</p>\
             </article></main>",
        );
        let body = extract_standard(&doc).ok().unwrap();
        assert_eq!(body, "Hello world. A heading. Already done.");
    }

    #[test]
    fn other_elements_and_text_nodes_are_verbatim() {
        let doc = Html::parse_document(
            "<main><article>\
               <div>Sidebar note</div>\
               loose text\
               <p>Real paragraph</p>\
             </article></main>",
        );
        let body = extract_standard(&doc).ok().unwrap();
        // No forced period on the div or the raw text node.
        assert_eq!(body, "Sidebar note loose text Real paragraph.");
    }

    #[test]
    fn comments_and_empty_children_are_skipped() {
        let doc = Html::parse_document(
            "<main><article>\
               <!-- tracking pixel -->\
               <p>   </p>\
               <p>Kept</p>\
             </article></main>",
        );
        let body = extract_standard(&doc).ok().unwrap();
        assert_eq!(body, "Kept.");
    }

    #[test]
    fn missing_article_container_is_a_miss() {
        let doc = Html::parse_document("<main><div><p>no article here</p></div></main>");
        assert_eq!(extract_standard(&doc), Field::Missing);
    }

    #[test]
    fn listicle_intro_first_then_items_in_order() {
        let doc = Html::parse_document(
            r#"<main><article>
                 <div id="listicle-intro">The best gadgets this year</div>
                 <div class="listicle-item"><div><p>First gadget rocks</p></div></div>
                 <div class="listicle-item"><div><p>Second gadget rolls.</p></div></div>
                 <div class="related"><div><p>ignored</p></div></div>
               </article></main>"#,
        );
        let body = extract_listicle(&doc).ok().unwrap();
        // Intro keeps its text as-is: the listicle path applies no
        // punctuation completion.
        assert_eq!(
            body,
            "The best gadgets this year First gadget rocks Second gadget rolls."
        );
    }

    #[test]
    fn listicle_item_without_paragraph_is_malformed() {
        let doc = Html::parse_document(
            r#"<main><article>
                 <div id="listicle-intro">Intro</div>
                 <div class="listicle-item"><div><span>no paragraph</span></div></div>
               </article></main>"#,
        );
        assert!(matches!(extract_listicle(&doc), Field::Malformed(_)));
    }
}
