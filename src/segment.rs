use unicode_segmentation::UnicodeSegmentation;

/// Split consolidated body text into sentences using UAX #29 sentence
/// boundaries. Order follows the source text; nothing is dropped or merged
/// beyond whitespace trimming, so joining the output with single spaces
/// reconstructs the input modulo whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
