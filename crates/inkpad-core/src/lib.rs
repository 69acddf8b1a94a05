//! # Inkpad Core
//!
//! Session state, the mutation gate, persistence and commands.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                        Session                          │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────────┐  │
//! │  │  Value   │ │ History  │ │ EventBus │ │  Ceiling  │  │
//! │  └──────────┘ └──────────┘ └──────────┘ └───────────┘  │
//! │        │                                     │          │
//! │        │            ┌──────────────┐         │          │
//! │        └──────────▶ │ Mutation Gate│ ◀───────┘          │
//! │                     └──────────────┘                    │
//! │  ┌───────────────────────────────────────────┐          │
//! │  │          Persistence Controller           │          │
//! │  │      MemoryStore  |  FileStore            │          │
//! │  └───────────────────────────────────────────┘          │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Learning: Module Organization
//!
//! Rust modules map to files:
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items for cleaner public APIs

pub mod command;
pub mod config;
pub mod event;
pub mod gate;
pub mod image;
pub mod keymap;
pub mod persistence;
pub mod session;
pub mod store;
pub mod toolbar;

pub use command::Command;
pub use config::{Config, ConfigError};
pub use event::{EventBus, EventHandler, SessionEvent};
pub use gate::GateVerdict;
pub use image::{ImageError, Intake, Transfer};
pub use keymap::{Key, KeyBinding, KeyPress, Keymap, Modifiers};
pub use persistence::PersistenceController;
pub use session::{ChangeOutcome, Session};
pub use store::{FileStore, MemoryStore, Store, StoreError};
pub use toolbar::ToolbarButton;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Document error: {0}")]
    Doc(#[from] inkpad_doc::DocError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),
}
