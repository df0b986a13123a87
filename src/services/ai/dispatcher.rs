//! Request dispatch with key rotation.
//!
//! One dispatch call covers a whole user turn. Each configured API key is
//! tried at most once: a failed attempt rotates the ring and retries, so a
//! call performs exactly `key_count` attempts before failing terminally.
//! Rotation is sticky: the ring stays on whichever key last worked.

use crate::services::keys::KeyRing;
use crate::session::types::{Attachment, ChatMessage, GenerationConfig};

use super::client::ModelBackend;
use super::error::DispatchError;
use super::request::build_request;

pub async fn dispatch<B>(
    backend: &B,
    keys: &mut KeyRing,
    query: &str,
    attachments: &[Attachment],
    history: &[ChatMessage],
    config: &GenerationConfig,
) -> Result<String, DispatchError>
where
    B: ModelBackend + ?Sized,
{
    if keys.is_empty() {
        return Err(DispatchError::missing_key());
    }

    let request = build_request(query, attachments, history, config);
    let model = config.model.as_str();
    let total = keys.len();

    let mut attempts = 0;
    loop {
        let Some(key) = keys.current().map(String::from) else {
            return Err(DispatchError::missing_key());
        };

        match backend.generate(&key, model, &request).await {
            Ok(text) => return Ok(text),
            Err(err) => {
                attempts += 1;
                if attempts < total {
                    log::warn!("Attempt {attempts}/{total} failed ({err}), rotating API key");
                    keys.rotate();
                    continue;
                }
                return Err(DispatchError::exhausted(attempts, err));
            }
        }
    }
}
