use std::fmt;

use serde::{Deserialize, Serialize};

/// Polarity reported by the prediction endpoint.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    /// Parses a wire label, ignoring ASCII case and surrounding whitespace.
    pub fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|sentiment| sentiment.label().eq_ignore_ascii_case(raw))
    }

    /// Returns a human-readable label for display
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Word counts the endpoint may attach to a prediction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WordAnalysis {
    #[serde(default)]
    pub positive_words: u32,
    #[serde(default)]
    pub negative_words: u32,
    #[serde(default)]
    pub neutral_words: u32,
    #[serde(default)]
    pub total_words: u32,
}

/// Request body for `POST /api/predict`.
#[derive(Serialize, Debug)]
pub struct PredictRequest<'a> {
    pub text: &'a str,
}

/// Raw body of a `POST /api/predict` response, success or failure.
///
/// Every field except `success` is optional at the wire level; the client
/// decides which ones a successful payload must carry.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PredictResponse {
    #[serde(default)]
    pub success: bool,
    pub sentiment: Option<String>,
    pub confidence: Option<f64>,
    #[serde(default)]
    pub emotions: Vec<String>,
    pub word_analysis: Option<WordAnalysis>,
    pub error: Option<String>,
}

/// A successful prediction after validation, ready for the result mapper.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub emotions: Vec<String>,
    pub word_analysis: Option<WordAnalysis>,
}

/// Body of `GET /api/health`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub api_version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_request_serialization() {
        let req = PredictRequest { text: "I love this product!" };
        let serialized = serde_json::to_string(&req).unwrap();
        assert_eq!(serialized, r#"{"text":"I love this product!"}"#);
    }

    #[test]
    fn test_sentiment_label_ignores_case_and_padding() {
        for raw in ["Positive", "positive", "POSITIVE", "pOsItIvE", " positive\n"] {
            assert_eq!(Sentiment::from_label(raw), Some(Sentiment::Positive));
        }
        assert_eq!(Sentiment::from_label("Neutral "), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::from_label("nEGATIVE"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::from_label("Mixed"), None);
        assert_eq!(Sentiment::from_label(""), None);
    }

    #[test]
    fn test_sentiment_serializes_canonical_label() {
        assert_eq!(serde_json::to_string(&Sentiment::Neutral).unwrap(), "\"Neutral\"");
    }

    #[test]
    fn test_success_response_parses() {
        let body = r#"{
            "text": "great",
            "success": true,
            "sentiment": "Positive",
            "confidence": 0.92,
            "emotions": ["joy", "satisfaction"],
            "word_analysis": {"positive_words": 1, "negative_words": 0, "neutral_words": 0, "total_words": 1}
        }"#;
        let resp: PredictResponse = serde_json::from_str(body).unwrap();
        assert!(resp.success);
        assert_eq!(resp.sentiment.as_deref(), Some("Positive"));
        assert_eq!(resp.confidence, Some(0.92));
        assert_eq!(resp.emotions, vec!["joy", "satisfaction"]);
        assert_eq!(resp.word_analysis.unwrap().total_words, 1);
    }

    #[test]
    fn test_failure_response_parses() {
        let resp: PredictResponse =
            serde_json::from_str(r#"{"success": false, "error": "Empty text provided"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Empty text provided"));
        assert!(resp.sentiment.is_none());
        assert!(resp.emotions.is_empty());
    }

    #[test]
    fn test_missing_success_flag_is_failure() {
        let resp: PredictResponse = serde_json::from_str(r#"{"error": "boom"}"#).unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus = serde_json::from_str(
            r#"{"status": "healthy", "message": "Sentiment Analysis API is running", "api_version": "1.0.0"}"#,
        )
        .unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.api_version.as_deref(), Some("1.0.0"));

        let degraded: HealthStatus = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(!degraded.is_healthy());
        assert!(degraded.message.is_empty());
    }
}
