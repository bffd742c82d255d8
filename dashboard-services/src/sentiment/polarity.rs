//! Lexicon-based polarity scoring
//!
//! Each known word carries a polarity in [-1, 1]. A preceding intensifier
//! scales the word, a negation within the previous three tokens flips and
//! halves it, and the text score is the mean over scored words (0 when no
//! word is known).

use std::collections::HashMap;

/// Scores free text on a [-1, 1] polarity scale
///
/// Implementations must be deterministic and hold no per-text state.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

const LEXICON: &[(&str, f64)] = &[
    // general
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("love", 0.5),
    ("happy", 0.8),
    ("glad", 0.5),
    ("hope", 0.3),
    ("hopeful", 0.4),
    ("confident", 0.5),
    ("interesting", 0.5),
    ("exciting", 0.3),
    ("promising", 0.5),
    ("positive", 0.23),
    ("optimistic", 0.4),
    ("strong", 0.43),
    ("stable", 0.3),
    ("safe", 0.5),
    ("secure", 0.4),
    ("smart", 0.21),
    ("easy", 0.43),
    ("win", 0.8),
    ("winning", 0.5),
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("worse", -0.4),
    ("poor", -0.4),
    ("hate", -0.8),
    ("sad", -0.5),
    ("boring", -1.0),
    ("stupid", -0.8),
    ("crazy", -0.6),
    ("wrong", -0.5),
    ("useless", -0.5),
    ("worthless", -0.6),
    ("negative", -0.3),
    ("pessimistic", -0.4),
    ("weak", -0.375),
    ("hard", -0.29),
    ("fail", -0.5),
    ("failed", -0.5),
    ("failure", -0.3),
    ("fear", -0.6),
    ("panic", -0.6),
    ("worried", -0.4),
    ("worry", -0.4),
    ("concern", -0.3),
    ("concerns", -0.3),
    ("risky", -0.4),
    ("dead", -0.2),
    ("lost", -0.3),
    // market
    ("bullish", 0.7),
    ("bearish", -0.7),
    ("moon", 0.6),
    ("mooning", 0.7),
    ("surge", 0.5),
    ("surging", 0.5),
    ("rally", 0.5),
    ("rallying", 0.5),
    ("soar", 0.6),
    ("soaring", 0.6),
    ("gain", 0.4),
    ("gains", 0.4),
    ("profit", 0.5),
    ("profits", 0.5),
    ("recovery", 0.3),
    ("recover", 0.3),
    ("breakout", 0.4),
    ("undervalued", 0.4),
    ("adoption", 0.3),
    ("innovative", 0.5),
    ("cheap", 0.4),
    ("pump", 0.3),
    ("loss", -0.5),
    ("losses", -0.5),
    ("dump", -0.5),
    ("dumping", -0.5),
    ("crash", -0.7),
    ("crashing", -0.7),
    ("plunge", -0.6),
    ("plunging", -0.6),
    ("dip", -0.2),
    ("overvalued", -0.4),
    ("bubble", -0.4),
    ("expensive", -0.5),
    ("volatile", -0.2),
    ("scam", -0.9),
    ("fraud", -0.8),
    ("rug", -0.8),
    ("rugpull", -0.9),
    ("hack", -0.7),
    ("hacked", -0.7),
    ("exploit", -0.6),
    ("stolen", -0.6),
    ("ponzi", -0.9),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("so", 1.2),
    ("super", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("highly", 1.3),
    ("totally", 1.3),
    ("absolutely", 1.4),
    ("quite", 1.1),
    ("somewhat", 0.8),
    ("slightly", 0.6),
    ("barely", 0.5),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "neither", "nor", "without", "hardly"];

/// Tokens after a negation that it still applies to
const NEGATION_SCOPE: usize = 3;
const NEGATION_FACTOR: f64 = -0.5;

/// Default scorer backed by a built-in word lexicon
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    fn is_negation(token: &str) -> bool {
        NEGATIONS.contains(&token) || token.ends_with("n't")
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let mut scores = Vec::new();
        let mut negation_left = 0usize;
        let mut intensity = 1.0;

        for token in tokens(&lowered) {
            if Self::is_negation(token) {
                negation_left = NEGATION_SCOPE;
                intensity = 1.0;
                continue;
            }

            if let Some(factor) = self.intensifiers.get(token) {
                intensity = *factor;
                continue;
            }

            if let Some(value) = self.lexicon.get(token) {
                let mut score = value * intensity;
                if negation_left > 0 {
                    score *= NEGATION_FACTOR;
                    negation_left = 0;
                }
                scores.push(score.clamp(-1.0, 1.0));
            } else {
                negation_left = negation_left.saturating_sub(1);
            }

            intensity = 1.0;
        }

        if scores.is_empty() {
            return 0.0;
        }

        (scores.iter().sum::<f64>() / scores.len() as f64).clamp(-1.0, 1.0)
    }
}

/// Split on anything that is not a letter or an apostrophe
pub(crate) fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphabetic() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
}
