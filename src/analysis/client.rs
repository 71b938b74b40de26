//! HTTP client for the remote prediction service.
//!
//! One request per call: no retries, no timeout. A pending call always
//! settles, either with a mapped [`AnalysisResult`] or a [`ClientError`].

use std::fmt;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::mapper::{AnalysisResult, map_prediction};
use super::types::{HealthStatus, PredictRequest, PredictResponse, Prediction, Sentiment};

/// Detail used when a failed payload carries no error string.
pub const GENERIC_FAILURE: &str = "Analysis failed";

/// Errors that can occur while talking to the prediction service.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The request could not be completed at all (DNS, refused, reset).
    Network(String),
    /// The service answered but reported failure: non-2xx status,
    /// `success: false`, or a payload that could not be understood.
    Api { status: Option<u16>, message: String },
}

impl ClientError {
    /// The underlying detail without the "Failed to analyze" prefix.
    pub fn detail(&self) -> &str {
        match self {
            ClientError::Network(msg) => msg,
            ClientError::Api { message, .. } => message,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to analyze sentiment: {}", self.detail())
    }
}

impl std::error::Error for ClientError {}

/// Anything that can classify a piece of text.
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    /// Returns the name of the analyzer (used in logs and the title bar).
    fn name(&self) -> &str;

    /// Classifies `text`. Callers guarantee `text` is not blank.
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, ClientError>;
}

/// Analyzer backed by `POST {base_url}{predict_path}`.
pub struct AnalysisClient {
    base_url: String,
    predict_path: String,
    health_path: String,
    client: reqwest::Client,
}

impl AnalysisClient {
    pub fn new(base_url: &str, predict_path: &str, health_path: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            predict_path: predict_path.to_string(),
            health_path: health_path.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Queries the service health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.url(&self.health_path);
        debug!("Health check: GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Health check failed with HTTP {}", status.as_u16());
            return Err(ClientError::Api {
                status: Some(status.as_u16()),
                message: format!("API error: {}", status.as_u16()),
            });
        }

        response.json::<HealthStatus>().await.map_err(|e| ClientError::Api {
            status: Some(status.as_u16()),
            message: format!("invalid health response: {e}"),
        })
    }
}

#[async_trait]
impl SentimentAnalyzer for AnalysisClient {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, ClientError> {
        let url = self.url(&self.predict_path);
        info!("Prediction request: POST {} ({} bytes)", url, text.len());

        let response = self
            .client
            .post(&url)
            .json(&PredictRequest { text })
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Prediction response status: {}", status);

        // The body is read as text first so a non-JSON error page still
        // yields a status-based message.
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<PredictResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| format!("API error: {}", status.as_u16()));
            warn!("Prediction API error: {} - {}", status.as_u16(), message);
            return Err(ClientError::Api {
                status: Some(status.as_u16()),
                message,
            });
        }

        let payload: PredictResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Api {
                status: Some(status.as_u16()),
                message: format!("invalid response: {e}"),
            })?;

        let prediction = validate(payload)?;
        info!(
            "Prediction: {} ({:.3}), {} emotions",
            prediction.sentiment,
            prediction.confidence,
            prediction.emotions.len()
        );
        Ok(map_prediction(prediction))
    }
}

/// Checks a 2xx payload and extracts the prediction.
///
/// `success: false` fails with the payload's error string or
/// [`GENERIC_FAILURE`]. Confidence outside `[0, 1]` is clamped; a
/// non-finite or missing confidence is rejected.
pub fn validate(payload: PredictResponse) -> Result<Prediction, ClientError> {
    let api_error = |message: String| ClientError::Api {
        status: None,
        message,
    };

    if !payload.success {
        return Err(api_error(
            payload.error.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        ));
    }

    let label = payload
        .sentiment
        .ok_or_else(|| api_error("response is missing a sentiment".to_string()))?;
    let sentiment = Sentiment::from_label(&label)
        .ok_or_else(|| api_error(format!("unrecognized sentiment label: {label}")))?;

    let raw = payload
        .confidence
        .ok_or_else(|| api_error("response is missing a confidence".to_string()))?;
    if !raw.is_finite() {
        return Err(api_error(format!("invalid confidence: {raw}")));
    }
    let confidence = raw.clamp(0.0, 1.0);
    if confidence != raw {
        warn!("Confidence {} outside [0, 1], clamped to {}", raw, confidence);
    }

    Ok(Prediction {
        sentiment,
        confidence,
        emotions: payload.emotions,
        word_analysis: payload.word_analysis,
    })
}
