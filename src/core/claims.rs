//! Claim extraction
//!
//! Precision over recall: only sentences that look like factual assertions
//! survive, and at most `max_claims` are returned in document order.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::ArticleConfig;
use crate::types::Claim;

lazy_static! {
    /// A digit, a copula/reporting verb, or an attribution verb
    static ref RE_CLAIM_MARKER: Regex = Regex::new(
        r"(?i)\d+|is |was |has |have |are |were |said |says |claimed |according to|reported|announced|stated|confirmed|denied|captured|strike"
    ).unwrap();
}

/// Sentence filter configured from `ArticleConfig`
#[derive(Debug, Clone)]
pub struct ClaimExtractor {
    min_chars: usize,
    max_chars: usize,
    max_claims: usize,
    caps_ratio_min_words: usize,
    max_caps_ratio: f64,
    boilerplate: Vec<String>,
}

impl Default for ClaimExtractor {
    fn default() -> Self {
        Self::new(&ArticleConfig::default())
    }
}

impl ClaimExtractor {
    pub fn new(config: &ArticleConfig) -> Self {
        Self {
            min_chars: config.claim_min_chars,
            max_chars: config.claim_max_chars,
            max_claims: config.max_claims,
            caps_ratio_min_words: config.caps_ratio_min_words,
            max_caps_ratio: config.max_caps_ratio,
            boilerplate: config.boilerplate_phrases.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    /// Qualifying sentences, capped
    pub fn extract(&self, text: &str) -> Vec<Claim> {
        split_sentences(text)
            .into_iter()
            .map(str::trim)
            .filter(|s| self.is_claim(s))
            .take(self.max_claims)
            .map(Claim::new)
            .collect()
    }

    /// Whether one trimmed sentence qualifies
    pub fn is_claim(&self, sentence: &str) -> bool {
        let len = sentence.chars().count();
        if len < self.min_chars || len > self.max_chars {
            return false;
        }
        if sentence.ends_with('?') {
            return false;
        }

        let lower = sentence.to_lowercase();
        if self.boilerplate.iter().any(|p| lower.contains(p.as_str())) {
            return false;
        }

        let words: Vec<&str> = sentence.split_whitespace().collect();
        if words.len() > self.caps_ratio_min_words {
            let capitalised = words
                .iter()
                .filter(|w| w.chars().next().map_or(false, char::is_uppercase))
                .count();
            if capitalised as f64 / words.len() as f64 > self.max_caps_ratio {
                return false;
            }
        }

        RE_CLAIM_MARKER.is_match(sentence)
    }
}

/// Split after `.` or `?` followed by whitespace, except after abbreviations
/// like "U.S." (`x.y.` pattern) or "Mr." (capital + lowercase + dot)
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;

    for i in 1..chars.len() {
        let (byte_idx, c) = chars[i];
        if !c.is_whitespace() {
            continue;
        }
        let prev = chars[i - 1].1;
        if prev != '.' && prev != '?' {
            continue;
        }
        if is_dotted_abbreviation(&chars, i) || is_title_abbreviation(&chars, i) {
            continue;
        }
        sentences.push(&text[start..byte_idx]);
        start = byte_idx + c.len_utf8();
    }
    sentences.push(&text[start..]);
    sentences
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The four chars before `i` look like `w.w.` (any char last)
fn is_dotted_abbreviation(chars: &[(usize, char)], i: usize) -> bool {
    i >= 4 && is_word_char(chars[i - 4].1) && chars[i - 3].1 == '.' && is_word_char(chars[i - 2].1)
}

/// The three chars before `i` look like `Ab.`
fn is_title_abbreviation(chars: &[(usize, char)], i: usize) -> bool {
    i >= 3
        && chars[i - 3].1.is_ascii_uppercase()
        && chars[i - 2].1.is_ascii_lowercase()
        && chars[i - 1].1 == '.'
}
