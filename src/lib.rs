//! Eli*AI service core: session-based chat against the Gemini API.
//!
//! This crate is the service layer of a chat frontend. `ChatApp` owns the
//! session state and the send flow; `services::ai` dispatches requests
//! with API-key rotation and bounded retry; `session` persists the whole
//! application snapshot, degrading gracefully when storage runs out.

pub mod app;
pub mod services;
pub mod session;

pub use app::ChatApp;
pub use services::ai::{BackendError, DispatchError, GeminiClient, ModelBackend, dispatch};
pub use services::config::{AiConfig, AiPublicConfig, load_ai_config};
pub use services::keys::{KeyRing, KeyRingStatus};
pub use session::store::{PersistOutcome, SnapshotStore};
pub use session::title::derive_title;
pub use session::types::{
    Attachment, ChatMessage, ChatSession, GenerationConfig, ModelKind, Role, Snapshot, Theme,
    UiMode,
};
