//! AI service module for the Gemini `generateContent` API.
//!
//! Notes:
//! - The REST endpoint is called directly with `reqwest`; request bodies
//!   replay session history as alternating user/model turns.
//! - A failed attempt rotates the `KeyRing` to the next configured API key
//!   before surfacing a terminal error, so each key is tried at most once
//!   per dispatch.

mod client;
mod dispatcher;
mod error;
mod request;
mod types;

pub use client::{GeminiClient, ModelBackend};
pub use dispatcher::dispatch;
pub use error::{BackendError, DispatchError};
pub use request::build_request;
pub use types::{
    Content, GenerateContentRequest, InlineData, Part, ThinkingConfig, WireGenerationConfig,
};
