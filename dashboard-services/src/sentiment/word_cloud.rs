//! Word cloud rendering
//!
//! Word frequencies over the concatenated post text, stopwords removed, laid
//! out in rows from most to least frequent and rendered as a standalone SVG.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use dashboard_core::{PlacedWord, WordCloud};

use super::polarity::tokens;

pub const WORD_CLOUD_WIDTH: u32 = 800;
pub const WORD_CLOUD_HEIGHT: u32 = 400;
pub const MAX_WORDS: usize = 200;

const MIN_FONT_SIZE: f64 = 10.0;
const MAX_FONT_SIZE: f64 = 64.0;
const PADDING: f64 = 8.0;
const ROW_GAP: f64 = 4.0;
const WORD_GAP: f64 = 10.0;
/// Rough advance width of a glyph relative to the font size
const GLYPH_WIDTH: f64 = 0.6;

const PALETTE: &[&str] = &[
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "her", "here", "here's", "hers", "herself", "him",
    "himself", "his", "how", "how's", "http", "https", "i", "i'd", "i'll", "i'm", "i've", "if",
    "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "let's", "like", "me",
    "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on", "once",
    "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own", "r",
    "same", "shall", "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "since",
    "so", "some", "such", "than", "that", "that's", "the", "their", "theirs", "them",
    "themselves", "then", "there", "there's", "these", "they", "they'd", "they'll", "they're",
    "they've", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was",
    "wasn't", "we", "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's",
    "when", "when's", "where", "where's", "which", "while", "who", "who's", "whom", "why",
    "why's", "will", "with", "won't", "would", "wouldn't", "www", "you", "you'd", "you'll",
    "you're", "you've", "your", "yours", "yourself", "yourselves",
];

/// Word counts, most frequent first; ties are broken alphabetically
pub fn word_frequencies(text: &str) -> Vec<(String, usize)> {
    let stopwords: HashSet<&str> = STOPWORDS.iter().copied().collect();
    let text = strip_urls(text).to_lowercase();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in tokens(&text) {
        let word = token.strip_suffix("'s").unwrap_or(token);
        if word.chars().count() < 2 || stopwords.contains(word) {
            continue;
        }
        *counts.entry(word.to_string()).or_default() += 1;
    }

    let mut words: Vec<(String, usize)> = counts.into_iter().collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words
}

fn strip_urls(text: &str) -> String {
    match regex::Regex::new(r"https?://\S+|www\.\S+") {
        Ok(re) => re.replace_all(text, " ").into_owned(),
        Err(_) => text.to_string(),
    }
}

/// Lay out up to [`MAX_WORDS`] words and render them as SVG
///
/// Layout is deterministic: the same text always produces the same image.
/// Words that no longer fit once the canvas is full are left out.
pub fn render_word_cloud(text: &str) -> WordCloud {
    let frequencies = word_frequencies(text);
    let max_frequency = frequencies.first().map(|(_, n)| *n).unwrap_or(1) as f64;

    let width = WORD_CLOUD_WIDTH as f64;
    let height = WORD_CLOUD_HEIGHT as f64;

    let mut words = Vec::new();
    let mut x = PADDING;
    let mut row_top = PADDING;
    let mut row_height = 0.0f64;

    for (text, frequency) in frequencies.into_iter().take(MAX_WORDS) {
        let font_size =
            MIN_FONT_SIZE + (MAX_FONT_SIZE - MIN_FONT_SIZE) * (frequency as f64 / max_frequency);
        let word_width = text.chars().count() as f64 * font_size * GLYPH_WIDTH;

        if word_width > width - 2.0 * PADDING {
            continue;
        }

        if x + word_width > width - PADDING {
            row_top += row_height + ROW_GAP;
            x = PADDING;
            row_height = 0.0;
        }

        if row_top + font_size > height - PADDING {
            continue;
        }

        words.push(PlacedWord {
            text,
            frequency,
            font_size,
            x,
            // text is positioned by its baseline
            y: row_top + font_size,
        });

        x += word_width + WORD_GAP;
        row_height = row_height.max(font_size);
    }

    let svg = to_svg(&words);
    WordCloud {
        width: WORD_CLOUD_WIDTH,
        height: WORD_CLOUD_HEIGHT,
        words,
        svg,
    }
}

fn to_svg(words: &[PlacedWord]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = WORD_CLOUD_WIDTH,
        h = WORD_CLOUD_HEIGHT
    );
    svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);

    for (i, word) in words.iter().enumerate() {
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="{:.1}" fill="{}">{}</text>"#,
            word.x,
            word.y,
            word.font_size,
            PALETTE[i % PALETTE.len()],
            escape(&word.text)
        );
    }

    svg.push_str("</svg>");
    svg
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequencies_drop_stopwords_and_urls() {
        let words = word_frequencies(
            "The ETF is coming. ETF approval https://example.com/etf and the bitcoin ETF's price",
        );

        assert_eq!(words[0], ("etf".to_string(), 3));
        assert!(words.iter().all(|(w, _)| w != "the" && w != "is" && w != "and"));
        assert!(words.iter().all(|(w, _)| !w.contains("example")));
        assert!(words.contains(&("bitcoin".to_string(), 1)));
    }

    #[test]
    fn test_ties_sorted_alphabetically() {
        let words = word_frequencies("zeta alpha mu");
        let order: Vec<&str> = words.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(order, vec!["alpha", "mu", "zeta"]);
    }

    #[test]
    fn test_cloud_fits_canvas_and_is_deterministic() {
        // letters only, so every index becomes a distinct word
        let word = |i: usize| -> String {
            i.to_string()
                .chars()
                .map(|d| (b'a' + d as u8 - b'0') as char)
                .collect()
        };
        let text = (0..400)
            .map(|i| format!("coin{} ", word(i % 250)).repeat(1 + i % 5))
            .collect::<String>();

        let cloud = render_word_cloud(&text);
        assert_eq!((cloud.width, cloud.height), (800, 400));
        assert!(!cloud.words.is_empty());
        assert!(cloud.words.len() <= MAX_WORDS);

        for word in &cloud.words {
            assert!(word.x >= 0.0 && word.x < 800.0);
            assert!(word.y > 0.0 && word.y <= 400.0);
        }

        assert_eq!(cloud, render_word_cloud(&text));
    }

    #[test]
    fn test_largest_word_comes_first_in_svg() {
        let cloud = render_word_cloud("moon moon moon lambo");
        assert_eq!(cloud.words[0].text, "moon");
        assert_eq!(cloud.words[0].font_size, MAX_FONT_SIZE);
        assert!(cloud.svg.starts_with("<svg"));
        assert!(cloud.svg.ends_with("</svg>"));
        assert!(cloud.svg.contains(">moon</text>"));
        assert!(cloud.svg.contains(">lambo</text>"));
    }

    #[test]
    fn test_empty_text_renders_blank_canvas() {
        let cloud = render_word_cloud("");
        assert!(cloud.words.is_empty());
        assert!(cloud.svg.contains("<rect"));
    }
}
