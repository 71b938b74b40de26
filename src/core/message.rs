//! # Messages
//!
//! A message is immutable once created. User messages carry the submitted
//! text; assistant messages carry either an [`AnalysisResult`] or an
//! [`AnalysisError`], never both.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::{AnalysisResult, ClientError};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Failed analysis, rendered in place of a result.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalysisError {
    pub message: String,
}

impl From<&ClientError> for AnalysisError {
    fn from(err: &ClientError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum Payload {
    Text(String),
    Result(AnalysisResult),
    Error(AnalysisError),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub payload: Payload,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, payload: Payload) -> Self {
        Self {
            id: MessageId::new(),
            role,
            payload,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, Payload::Text(text.into()))
    }

    pub fn analysis(result: AnalysisResult) -> Self {
        Self::new(Role::Assistant, Payload::Result(result))
    }

    pub fn error(error: AnalysisError) -> Self {
        Self::new(Role::Assistant, Payload::Error(error))
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.payload {
            Payload::Result(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, Payload::Error(_))
    }
}
