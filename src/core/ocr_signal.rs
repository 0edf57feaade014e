//! OCR reliability signals
//!
//! Near-empty OCR output is unreliable: with fewer than the minimum words the
//! keyword check is suppressed, so a lone "fake" cannot flag an image.

use crate::config::ImageConfig;
use crate::types::{OcrOutput, OcrSummary, Signal, SignalDetail, NO_RECOGNITION};

pub const SIGNAL_LOW_WORD_COUNT: &str = "Low OCR word count";
pub const SIGNAL_LOW_CONFIDENCE: &str = "Low OCR confidence";
pub const SIGNAL_FAKE_KEYWORDS: &str = "Contains fake keywords";

/// Word count, mean confidence and reliability of one OCR run
pub fn summarize(output: &OcrOutput, min_words: usize) -> OcrSummary {
    let word_count = output.tokens.iter().filter(|t| !t.trim().is_empty()).count();

    let valid: Vec<f64> = output
        .confidences
        .iter()
        .filter(|&&c| c != NO_RECOGNITION)
        .map(|&c| c as f64)
        .collect();
    let avg_confidence = if valid.is_empty() {
        0.0
    } else {
        valid.iter().sum::<f64>() / valid.len() as f64
    };

    OcrSummary {
        text: output.text.trim().to_string(),
        word_count,
        avg_confidence,
        reliable: word_count >= min_words,
    }
}

/// Keywords found as substrings of the lower-cased text
pub fn find_keywords(text: &str, keywords: &[String]) -> Vec<String> {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .filter(|kw| lower.contains(kw.to_lowercase().as_str()))
        .cloned()
        .collect()
}

/// The three OCR signals, in fixed order
pub fn ocr_signals(summary: &OcrSummary, config: &ImageConfig) -> Vec<Signal> {
    let matched = if summary.reliable {
        find_keywords(&summary.text, &config.fake_keywords)
    } else {
        Vec::new()
    };

    vec![
        Signal::new(
            SIGNAL_LOW_WORD_COUNT,
            summary.word_count < config.min_ocr_words,
            SignalDetail::Count(summary.word_count),
        ),
        Signal::new(
            SIGNAL_LOW_CONFIDENCE,
            summary.avg_confidence < config.min_ocr_confidence,
            SignalDetail::Number(summary.avg_confidence),
        ),
        Signal::new(
            SIGNAL_FAKE_KEYWORDS,
            !matched.is_empty(),
            SignalDetail::Text(matched.join(", ")),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn output(words: &[&str], confidences: &[i32]) -> OcrOutput {
        OcrOutput {
            text: words.join(" "),
            confidences: confidences.to_vec(),
            tokens: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn test_summary_ignores_sentinels_and_blanks() {
        let out = output(&["", "Hello", " ", "world", "again"], &[-1, 80, -1, 60, 70]);
        let summary = summarize(&out, 3);
        assert_eq!(summary.word_count, 3);
        assert!((summary.avg_confidence - 70.0).abs() < 1e-9);
        assert!(summary.reliable);
    }

    #[test]
    fn test_no_valid_confidence_is_zero() {
        let summary = summarize(&output(&[""], &[-1]), 3);
        assert_eq!(summary.avg_confidence, 0.0);
        assert!(!summary.reliable);
    }

    #[test]
    fn test_single_fake_word_never_triggers_keywords() {
        let config = ImageConfig::default();
        let summary = summarize(&output(&["fake"], &[95]), config.min_ocr_words);
        let signals = ocr_signals(&summary, &config);

        assert!(signals[0].triggered, "word count signal should fire");
        assert!(!signals[1].triggered);
        assert!(!signals[2].triggered, "keyword check must be suppressed");
    }

    #[test]
    fn test_reliable_text_with_keyword_triggers() {
        let config = ImageConfig::default();
        let summary = summarize(
            &output(&["This", "is", "a", "DeepFake", "poster"], &[90; 5]),
            config.min_ocr_words,
        );
        let signals = ocr_signals(&summary, &config);
        assert!(signals[2].triggered);
        // "deepfake" contains "fake" as well
        assert_eq!(signals[2].detail, SignalDetail::Text("fake, deepfake".to_string()));
    }

    #[test]
    fn test_low_confidence_threshold_is_strict() {
        let config = ImageConfig::default();
        let at = summarize(&output(&["a", "b", "c"], &[50, 50, 50]), 3);
        let below = summarize(&output(&["a", "b", "c"], &[49, 50, 50]), 3);
        assert!(!ocr_signals(&at, &config)[1].triggered);
        assert!(ocr_signals(&below, &config)[1].triggered);
    }
}
