//! # Result Mapper
//!
//! Turns a validated [`Prediction`] into the display model shown in the
//! conversation pane. Deterministic and free of side effects.
//!
//! ```text
//! Prediction { sentiment, confidence, emotions, word_analysis }
//!        │
//!        ▼
//! AnalysisResult { sentiment, confidence, emotions, word_analysis, scores }
//! ```
//!
//! ## Score heuristic
//!
//! The endpoint only reports the winning class. The other two scores are
//! filler values taken from the remaining mass `1 - confidence`, weighted
//! 0.4 for positive/negative and 0.2 for neutral. The three scores do not
//! have to sum to 1. Existing result consumers rely on these exact numbers,
//! so keep the weights as they are.

use serde::Serialize;

use super::types::{Prediction, Sentiment, WordAnalysis};

/// Share of the non-winning mass given to a losing positive or negative score.
pub const POLAR_FILLER_WEIGHT: f64 = 0.4;
/// Share of the non-winning mass given to a losing neutral score.
pub const NEUTRAL_FILLER_WEIGHT: f64 = 0.2;

/// Three-way score breakdown, each value in `[0, 1]`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl Scores {
    /// Score for the given class.
    pub fn get(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }
}

/// Display-ready outcome of one successful analysis.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub emotions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_analysis: Option<WordAnalysis>,
    pub scores: Scores,
}

impl AnalysisResult {
    /// `"Positive  Confidence: 92.0%"`
    pub fn headline(&self) -> String {
        format!(
            "{}  Confidence: {}",
            self.sentiment,
            format_percent(self.confidence)
        )
    }

    pub fn score_line(&self) -> String {
        format!(
            "Positive {}  Neutral {}  Negative {}",
            format_percent(self.scores.positive),
            format_percent(self.scores.neutral),
            format_percent(self.scores.negative)
        )
    }

    pub fn emotions_line(&self) -> String {
        if self.emotions.is_empty() {
            "Detected emotions: none".to_string()
        } else {
            format!("Detected emotions: {}", self.emotions.join(", "))
        }
    }

    pub fn word_line(&self) -> Option<String> {
        self.word_analysis.map(|w| {
            format!(
                "Words: {} positive, {} negative, {} neutral of {}",
                w.positive_words, w.negative_words, w.neutral_words, w.total_words
            )
        })
    }

    /// Plain-text rendering of the whole card, one entry per line.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![self.headline(), self.score_line(), self.emotions_line()];
        lines.extend(self.word_line());
        lines
    }
}

/// Maps a prediction to its display model.
pub fn map_prediction(prediction: Prediction) -> AnalysisResult {
    let Prediction {
        sentiment,
        confidence,
        emotions,
        word_analysis,
    } = prediction;

    AnalysisResult {
        sentiment,
        confidence,
        emotions,
        word_analysis,
        scores: derive_scores(sentiment, confidence),
    }
}

/// The winning class gets `confidence`; the others get weighted filler.
pub fn derive_scores(sentiment: Sentiment, confidence: f64) -> Scores {
    let remainder = 1.0 - confidence;
    let score = |class: Sentiment, weight: f64| {
        if class == sentiment {
            confidence
        } else {
            remainder * weight
        }
    };

    Scores {
        positive: score(Sentiment::Positive, POLAR_FILLER_WEIGHT),
        neutral: score(Sentiment::Neutral, NEUTRAL_FILLER_WEIGHT),
        negative: score(Sentiment::Negative, POLAR_FILLER_WEIGHT),
    }
}

/// Formats a `[0, 1]` ratio as a percentage with exactly one decimal digit.
///
/// `0.952` becomes `"95.2%"`.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
