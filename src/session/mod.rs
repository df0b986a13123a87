//! Session state: data model, snapshot persistence, title derivation.
//!
//! The top-level flow lives in `crate::app`.

pub mod store;
pub mod title;
pub mod types;

pub use store::{PersistOutcome, SnapshotStore};
pub use types::{
    Attachment, ChatMessage, ChatSession, GenerationConfig, ModelKind, Role, Snapshot, Theme,
    UiMode,
};
