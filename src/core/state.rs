//! # Application State
//!
//! Core business state for Senti. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── analyzer: Arc<dyn SentimentAnalyzer>  // prediction service
//! ├── store: SessionStore                   // sessions + active id
//! ├── in_flight: HashSet<SessionId>         // sessions in `Submitting`
//! ├── status_message: String                // status bar text
//! └── default_session_title: String         // title for explicit new sessions
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::collections::HashSet;
use std::sync::Arc;

use crate::analysis::SentimentAnalyzer;
use crate::core::config::{DEFAULT_SESSION_TITLE, ResolvedConfig};
use crate::core::session::{SessionId, SessionStore};

pub struct App {
    pub analyzer: Arc<dyn SentimentAnalyzer>,
    pub store: SessionStore,
    /// Sessions with a request that has not settled yet. A session is
    /// `Submitting` while present here and `Idle` otherwise.
    pub in_flight: HashSet<SessionId>,
    pub status_message: String,
    pub default_session_title: String,
}

impl App {
    pub fn new(analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        Self {
            analyzer,
            store: SessionStore::new(),
            in_flight: HashSet::new(),
            status_message: String::from("Type something to analyze"),
            default_session_title: DEFAULT_SESSION_TITLE.to_string(),
        }
    }

    pub fn from_config(analyzer: Arc<dyn SentimentAnalyzer>, config: &ResolvedConfig) -> Self {
        Self {
            default_session_title: config.default_session_title.clone(),
            ..Self::new(analyzer)
        }
    }

    pub fn is_submitting(&self, id: SessionId) -> bool {
        self.in_flight.contains(&id)
    }

    /// True when the composer must refuse to submit.
    pub fn active_is_submitting(&self) -> bool {
        self.store
            .active_id()
            .is_some_and(|id| self.is_submitting(id))
    }
}
