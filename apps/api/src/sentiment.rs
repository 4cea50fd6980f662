//! Lexicon-based sentiment scoring for free-text feedback notes.
//!
//! Scores land in [-1, 1]. The scorer sits behind a trait so a richer
//! provider can be swapped in without touching the evaluation path.

use std::sync::Arc;

/// Valence lexicon: (token, weight). Weights follow the usual convention of
/// roughly ±1 for mild terms and up to ±3 for strong ones.
const LEXICON: &[(&str, f64)] = &[
    ("excellent", 2.7),
    ("outstanding", 2.8),
    ("great", 2.2),
    ("good", 1.9),
    ("strong", 1.6),
    ("impressive", 2.3),
    ("solid", 1.4),
    ("positive", 1.7),
    ("reliable", 1.5),
    ("helpful", 1.6),
    ("fast", 1.1),
    ("clear", 1.2),
    ("average", -0.2),
    ("okay", 0.4),
    ("ok", 0.4),
    ("fine", 0.8),
    ("slow", -1.2),
    ("weak", -1.6),
    ("poor", -2.1),
    ("bad", -2.0),
    ("terrible", -2.9),
    ("awful", -2.8),
    ("negative", -1.7),
    ("unreliable", -1.8),
    ("improvement", -0.9),
    ("improve", -0.9),
    ("lacking", -1.4),
    ("missed", -1.1),
    ("late", -1.0),
    ("needs", -0.6),
];

/// Normalization constant for the bounded score, same role as the alpha
/// term in compound-score lexicon analyzers.
const NORM_ALPHA: f64 = 15.0;

/// Scores a single piece of free text in [-1, 1].
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

/// Built-in lexicon scorer. Sums matched token valences and squashes the
/// total through s / sqrt(s^2 + alpha), which is bounded in (-1, 1).
pub struct LexiconSentiment;

impl SentimentScorer for LexiconSentiment {
    fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let lowered = text.to_lowercase();
        let sum: f64 = lowered
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .filter_map(|word| {
                LEXICON
                    .iter()
                    .find(|(token, _)| *token == word)
                    .map(|(_, v)| *v)
            })
            .sum();
        if sum == 0.0 {
            return 0.0;
        }
        sum / (sum * sum + NORM_ALPHA).sqrt()
    }
}

/// Mean sentiment over a batch of feedback notes; empty input is neutral.
pub fn mean_sentiment(scorer: &Arc<dyn SentimentScorer>, texts: &[String]) -> f64 {
    if texts.is_empty() {
        return 0.0;
    }
    let sum: f64 = texts.iter().map(|t| scorer.score(t)).sum();
    sum / texts.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> Arc<dyn SentimentScorer> {
        Arc::new(LexiconSentiment)
    }

    #[test]
    fn test_empty_text_is_neutral() {
        assert_eq!(LexiconSentiment.score(""), 0.0);
        assert_eq!(LexiconSentiment.score("   "), 0.0);
    }

    #[test]
    fn test_unknown_words_are_neutral() {
        assert_eq!(LexiconSentiment.score("the quarterly report arrived"), 0.0);
    }

    #[test]
    fn test_positive_feedback_scores_positive() {
        let s = LexiconSentiment.score("Good communication, strong delivery");
        assert!(s > 0.0, "score was {s}");
        assert!(s <= 1.0);
    }

    #[test]
    fn test_negative_feedback_scores_negative() {
        let s = LexiconSentiment.score("Needs improvement, poor follow-through");
        assert!(s < 0.0, "score was {s}");
        assert!(s >= -1.0);
    }

    #[test]
    fn test_score_is_bounded() {
        let gushing = "excellent outstanding great impressive ".repeat(20);
        let s = LexiconSentiment.score(&gushing);
        assert!(s < 1.0 && s > 0.9, "score was {s}");
    }

    #[test]
    fn test_case_insensitive() {
        let a = LexiconSentiment.score("GOOD work");
        let b = LexiconSentiment.score("good work");
        assert_eq!(a, b);
    }

    #[test]
    fn test_mean_sentiment_empty_is_zero() {
        assert_eq!(mean_sentiment(&scorer(), &[]), 0.0);
    }

    #[test]
    fn test_mean_sentiment_averages() {
        let texts = vec!["good".to_string(), "bad".to_string()];
        let m = mean_sentiment(&scorer(), &texts);
        let good = LexiconSentiment.score("good");
        let bad = LexiconSentiment.score("bad");
        assert!((m - (good + bad) / 2.0).abs() < 1e-12);
    }
}
