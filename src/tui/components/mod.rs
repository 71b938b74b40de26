//! # TUI Components
//!
//! ## Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: endpoint, session count, status message
//! - `MessageCard` / `PendingCard`: one conversation entry
//! - `LandingPage`: welcome screen for empty sessions
//!
//! ## Stateful Components (Event-Driven)
//!
//! - `Composer`: multi-line draft entry, disabled while submitting
//! - `MessageList`: scrollable conversation with height caching
//! - `SessionList`: sidebar for switching, creating, and deleting sessions
//!
//! Stateful components keep their persistent part (`*State`) in `TuiState`
//! and are wrapped by a transient struct built each frame with borrowed
//! props. Each file holds the component's state, events, rendering, and
//! tests together.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── landing.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── session_list.rs
//! └── composer/
//!     ├── mod.rs
//!     └── layout.rs
//! ```

pub mod composer;
pub mod landing;
pub mod message;
pub mod message_list;
pub mod session_list;
pub mod title_bar;

pub use composer::{Composer, ComposerEvent};
pub use landing::LandingPage;
pub use message_list::{MessageList, MessageListState};
pub use session_list::{SessionList, SessionListEvent, SessionListState};
pub use title_bar::TitleBar;
