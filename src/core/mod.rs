//! # Core Application Logic
//!
//! This module contains Senti's business logic: the session store and the
//! controller that drives analyses. It knows nothing about any specific UI
//! technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • SessionStore         │
//!                    │  • Action (commands)    │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI.         │
//!                    └───────────┬─────────────┘
//!                                │ Effect::Analyze
//!                                ▼
//!                    ┌─────────────────────────┐
//!                    │  TUI adapter (ratatui)  │
//!                    │  spawns run_analysis()  │
//!                    └─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct holding all application state
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`session`]: `SessionStore` and the `Session` value
//! - [`message`]: `Message` and its payloads
//! - [`config`]: Layered configuration

pub mod action;
pub mod config;
pub mod message;
pub mod session;
pub mod state;
