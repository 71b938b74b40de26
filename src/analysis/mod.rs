pub mod client;
pub mod mapper;
pub mod types;

pub use client::{AnalysisClient, ClientError, SentimentAnalyzer};
pub use mapper::{AnalysisResult, Scores, format_percent, map_prediction};
pub use types::{HealthStatus, Prediction, Sentiment, WordAnalysis};
