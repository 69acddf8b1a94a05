//! # Inkpad UI
//!
//! Desktop front end for the rich-text editor, built on iced.
//!
//! ## Architecture
//!
//! The UI follows the Elm architecture (TEA):
//! - **Model**: `App`, which owns the editing `Session`
//! - **Message**: Events that can occur
//! - **Update**: (state, message) -> new state, plus async tasks
//! - **View**: state -> UI elements
//!
//! Every document edit goes through the session, so the node ceiling is
//! enforced no matter which widget produced it.

pub mod app;
pub mod style;
pub mod theme;

pub use app::{run, App, Flags};
pub use theme::Theme;
