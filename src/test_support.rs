//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::analysis::{AnalysisResult, ClientError, SentimentAnalyzer};

/// An analyzer that replays canned outcomes in order and records its inputs.
/// Once the script runs out every call fails with a network error.
#[derive(Default)]
pub struct ScriptedAnalyzer {
    script: Mutex<VecDeque<Result<AnalysisResult, ClientError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedAnalyzer {
    pub fn new(script: Vec<Result<AnalysisResult, ClientError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SentimentAnalyzer for ScriptedAnalyzer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, ClientError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("no scripted response".to_string())))
    }
}

/// Creates a test App backed by an empty ScriptedAnalyzer.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(ScriptedAnalyzer::default()))
}
