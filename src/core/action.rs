//! # Actions
//!
//! Everything that can happen in Senti becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The prediction service answers? That's `Action::AnalysisSettled { .. }`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing the I/O the
//! caller must perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! ## Per-session lifecycle
//!
//! ```text
//!          Submit(text)                 AnalysisSettled(Ok | Err)
//!  Idle ───────────────▶ Submitting ───────────────────────────▶ Idle
//!        + user message                 + assistant message
//!        + Effect::Analyze              (result or error)
//! ```
//!
//! A failed analysis is not a fault: it is appended as an ordinary
//! assistant message carrying an `AnalysisError`. There is no cancel
//! transition, so every submit ends with exactly one assistant message
//! unless its session was deleted in the meantime. Then the late result
//! is dropped, and the in-flight marker for the deleted id is still
//! cleared.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::analysis::{AnalysisResult, ClientError, SentimentAnalyzer, format_percent};
use crate::core::message::{AnalysisError, Message};
use crate::core::session::{SessionId, derive_title};
use crate::core::state::App;

#[derive(Debug)]
pub enum Action {
    /// Composer submitted a draft for the active session.
    Submit(String),
    NewSession,
    SelectSession(SessionId),
    DeleteSession(SessionId),
    /// A request issued for `session_id` finished.
    AnalysisSettled {
        session_id: SessionId,
        outcome: Result<AnalysisResult, ClientError>,
    },
    /// Copy the active session's latest analysis result as JSON.
    CopyLastResult,
    /// The clipboard write for a copy failed.
    CopyFailed(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Run the analyzer on `text` and feed the outcome back as `AnalysisSettled`.
    Analyze { session_id: SessionId, text: String },
    /// Put `text` on the system clipboard.
    CopyToClipboard(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, text),
        Action::NewSession => {
            let title = app.default_session_title.clone();
            app.store.create(title);
            app.status_message = String::from("New session");
            Effect::None
        }
        Action::SelectSession(id) => {
            app.store.select(id);
            Effect::None
        }
        Action::DeleteSession(id) => {
            app.store.delete(id);
            app.status_message = match app.store.active() {
                Some(session) => format!("Deleted session; now on \"{}\"", session.title),
                None => String::from("Deleted session"),
            };
            Effect::None
        }
        Action::AnalysisSettled {
            session_id,
            outcome,
        } => settle(app, session_id, outcome),
        Action::CopyLastResult => copy_last_result(app),
        Action::CopyFailed(reason) => {
            app.status_message = format!("Copy failed: {reason}");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: String) -> Effect {
    if text.trim().is_empty() {
        debug!("Submit ignored: empty draft");
        return Effect::None;
    }

    let session_id = match app.store.active_id() {
        Some(id) => id,
        None => app.store.create(derive_title(&text)).id,
    };

    if app.is_submitting(session_id) {
        debug!("Submit ignored: session {} already submitting", session_id);
        return Effect::None;
    }

    if let Err(e) = app.store.append_message(session_id, Message::user(text.clone())) {
        warn!("Failed to append user message: {}", e);
        return Effect::None;
    }

    app.in_flight.insert(session_id);
    app.status_message = String::from("Analyzing sentiment...");
    info!("Session {} submitting ({} bytes)", session_id, text.len());

    Effect::Analyze { session_id, text }
}

fn settle(
    app: &mut App,
    session_id: SessionId,
    outcome: Result<AnalysisResult, ClientError>,
) -> Effect {
    app.in_flight.remove(&session_id);

    let (message, status) = match outcome {
        Ok(result) => {
            let status = format!(
                "{} ({})",
                result.sentiment,
                format_percent(result.confidence)
            );
            (Message::analysis(result), status)
        }
        Err(e) => {
            warn!("Analysis for session {} failed: {}", session_id, e);
            (
                Message::error(AnalysisError::from(&e)),
                String::from("Analysis failed"),
            )
        }
    };

    match app.store.append_message(session_id, message) {
        Ok(()) => {
            debug!("Session {} back to idle", session_id);
            // The title bar reports on the session being viewed only
            if app.store.active_id() == Some(session_id) {
                app.status_message = status;
            }
        }
        Err(e) => {
            warn!("Discarding late analysis result: {}", e);
            app.status_message = String::from("Discarded result for deleted session");
        }
    }
    Effect::None
}

fn copy_last_result(app: &mut App) -> Effect {
    let latest = app
        .store
        .active()
        .and_then(|session| session.messages.iter().rev().find_map(|m| m.result().cloned()));

    let Some(result) = latest else {
        app.status_message = String::from("No analysis result to copy");
        return Effect::None;
    };

    match serde_json::to_string_pretty(&result) {
        Ok(json) => {
            debug!("Copying analysis result ({} bytes)", json.len());
            app.status_message = String::from("Copied analysis result to clipboard");
            Effect::CopyToClipboard(json)
        }
        Err(e) => {
            warn!("Failed to encode analysis result: {}", e);
            app.status_message = String::from("Copy failed: could not encode result");
            Effect::None
        }
    }
}

/// Runs one analysis and packages the outcome as the action that settles it.
pub async fn run_analysis(
    analyzer: Arc<dyn SentimentAnalyzer>,
    session_id: SessionId,
    text: String,
) -> Action {
    let outcome = analyzer.analyze(&text).await;
    Action::AnalysisSettled {
        session_id,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Sentiment;
    use crate::analysis::mapper::derive_scores;
    use crate::core::message::{Payload, Role};
    use crate::test_support::{ScriptedAnalyzer, test_app};

    fn result(sentiment: Sentiment, confidence: f64) -> AnalysisResult {
        AnalysisResult {
            sentiment,
            confidence,
            emotions: vec!["joy".into()],
            word_analysis: None,
            scores: derive_scores(sentiment, confidence),
        }
    }

    fn expect_analyze(effect: Effect) -> (SessionId, String) {
        match effect {
            Effect::Analyze { session_id, text } => (session_id, text),
            other => panic!("Expected Effect::Analyze, got {:?}", other),
        }
    }

    #[test]
    fn test_submit_without_session_creates_titled_session() {
        let mut app = test_app();
        let (id, text) = expect_analyze(update(&mut app, Action::Submit("I love this product!".into())));

        assert_eq!(text, "I love this product!");
        assert_eq!(app.store.active_id(), Some(id));
        let session = app.store.get(id).unwrap();
        assert_eq!(session.title, "I love this product!");
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].role, Role::User);
        assert!(app.is_submitting(id));
    }

    #[test]
    fn test_submit_blank_is_rejected() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Submit("   \n\t".into())), Effect::None);
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_submit_while_submitting_is_rejected() {
        let mut app = test_app();
        let (id, _) = expect_analyze(update(&mut app, Action::Submit("first".into())));
        assert_eq!(update(&mut app, Action::Submit("second".into())), Effect::None);
        assert_eq!(app.store.get(id).unwrap().messages.len(), 1);
    }

    #[test]
    fn test_settle_success_appends_result_and_idles() {
        let mut app = test_app();
        let (id, _) = expect_analyze(update(&mut app, Action::Submit("great".into())));

        update(
            &mut app,
            Action::AnalysisSettled {
                session_id: id,
                outcome: Ok(result(Sentiment::Positive, 0.92)),
            },
        );

        let session = app.store.get(id).unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].role, Role::Assistant);
        assert_eq!(session.messages[1].result().unwrap().scores.positive, 0.92);
        assert!(!app.is_submitting(id));
        assert_eq!(app.status_message, "Positive (92.0%)");
    }

    #[test]
    fn test_settle_error_appends_error_message() {
        let mut app = test_app();
        let (id, _) = expect_analyze(update(&mut app, Action::Submit("hmm".into())));

        update(
            &mut app,
            Action::AnalysisSettled {
                session_id: id,
                outcome: Err(ClientError::Api {
                    status: Some(500),
                    message: "API error: 500".into(),
                }),
            },
        );

        let session = app.store.get(id).unwrap();
        let last = session.messages.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert!(last.result().is_none());
        match &last.payload {
            Payload::Error(err) => {
                assert_eq!(err.message, "Failed to analyze sentiment: API error: 500")
            }
            other => panic!("Expected error payload, got {:?}", other),
        }
        assert!(!app.active_is_submitting());
    }

    #[test]
    fn test_late_result_lands_in_origin_session() {
        let mut app = test_app();
        let (a, _) = expect_analyze(update(&mut app, Action::Submit("from A".into())));
        update(&mut app, Action::NewSession);
        let b = app.store.active_id().unwrap();
        assert_ne!(a, b);

        update(
            &mut app,
            Action::AnalysisSettled {
                session_id: a,
                outcome: Ok(result(Sentiment::Neutral, 0.6)),
            },
        );

        assert_eq!(app.store.get(a).unwrap().messages.len(), 2);
        assert!(app.store.get(b).unwrap().messages.is_empty());
        assert_eq!(app.store.active_id(), Some(b));
        // B is on screen, so A's result does not take over the title bar
        assert_eq!(app.status_message, "New session");
    }

    #[test]
    fn test_late_result_for_deleted_session_is_discarded() {
        let mut app = test_app();
        let (a, _) = expect_analyze(update(&mut app, Action::Submit("doomed".into())));
        update(&mut app, Action::DeleteSession(a));

        let effect = update(
            &mut app,
            Action::AnalysisSettled {
                session_id: a,
                outcome: Ok(result(Sentiment::Negative, 0.8)),
            },
        );

        assert_eq!(effect, Effect::None);
        assert!(app.store.is_empty());
        assert!(app.in_flight.is_empty());
        assert_eq!(app.status_message, "Discarded result for deleted session");
    }

    #[test]
    fn test_new_session_then_delete_restores_previous() {
        let mut app = test_app();
        let (a, _) = expect_analyze(update(&mut app, Action::Submit("keep me".into())));
        update(
            &mut app,
            Action::AnalysisSettled {
                session_id: a,
                outcome: Ok(result(Sentiment::Positive, 0.7)),
            },
        );
        let history = app.store.get(a).unwrap().messages.clone();

        update(&mut app, Action::NewSession);
        let b = app.store.active_id().unwrap();
        assert_eq!(app.store.get(b).unwrap().title, "New Analysis");

        update(&mut app, Action::DeleteSession(b));
        assert_eq!(app.store.active_id(), Some(a));
        assert_eq!(app.store.get(a).unwrap().messages, history);
    }

    #[test]
    fn test_other_session_can_submit_while_one_is_pending() {
        let mut app = test_app();
        let (a, _) = expect_analyze(update(&mut app, Action::Submit("one".into())));
        update(&mut app, Action::NewSession);
        let (b, _) = expect_analyze(update(&mut app, Action::Submit("two".into())));
        assert_ne!(a, b);
        assert!(app.is_submitting(a) && app.is_submitting(b));
    }

    #[test]
    fn test_copy_last_result_yields_pretty_json() {
        let mut app = test_app();
        let (a, _) = expect_analyze(update(&mut app, Action::Submit("first".into())));
        update(
            &mut app,
            Action::AnalysisSettled {
                session_id: a,
                outcome: Ok(result(Sentiment::Positive, 0.92)),
            },
        );
        update(&mut app, Action::Submit("second".into()));
        update(
            &mut app,
            Action::AnalysisSettled {
                session_id: a,
                outcome: Err(ClientError::Network("refused".into())),
            },
        );

        // The trailing error card is skipped; the last real result is copied
        let json = match update(&mut app, Action::CopyLastResult) {
            Effect::CopyToClipboard(json) => json,
            other => panic!("Expected Effect::CopyToClipboard, got {:?}", other),
        };
        assert!(json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sentiment"], "Positive");
        assert_eq!(value["confidence"], 0.92);
        assert_eq!(value["emotions"][0], "joy");
        assert_eq!(value["scores"]["positive"], 0.92);
        assert_eq!(app.status_message, "Copied analysis result to clipboard");
    }

    #[test]
    fn test_copy_without_result_reports_nothing_to_copy() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::CopyLastResult), Effect::None);
        assert_eq!(app.status_message, "No analysis result to copy");

        // A pending submission has no result yet
        update(&mut app, Action::Submit("waiting".into()));
        assert_eq!(update(&mut app, Action::CopyLastResult), Effect::None);
    }

    #[test]
    fn test_copy_failure_is_reported() {
        let mut app = test_app();
        update(&mut app, Action::CopyFailed("no display".into()));
        assert_eq!(app.status_message, "Copy failed: no display");
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }

    #[tokio::test]
    async fn test_run_analysis_wraps_outcome() {
        let analyzer = Arc::new(ScriptedAnalyzer::new(vec![Err(ClientError::Network(
            "refused".into(),
        ))]));
        let id = SessionId::new();
        match run_analysis(analyzer.clone(), id, "text".into()).await {
            Action::AnalysisSettled {
                session_id,
                outcome,
            } => {
                assert_eq!(session_id, id);
                assert!(matches!(outcome, Err(ClientError::Network(_))));
            }
            other => panic!("Expected AnalysisSettled, got {:?}", other),
        }
        assert_eq!(analyzer.calls(), vec!["text".to_string()]);
    }
}
