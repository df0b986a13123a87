use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Role tag used in Gemini `contents` entries.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// Supported Gemini model identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "gemini-flash-latest")]
    Flash,
    #[serde(rename = "gemini-3-pro-preview")]
    Pro,
    #[default]
    #[serde(rename = "gemini-3-flash-preview")]
    Flash3,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Flash => "gemini-flash-latest",
            ModelKind::Pro => "gemini-3-pro-preview",
            ModelKind::Flash3 => "gemini-3-flash-preview",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Nuit,
    Jour,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiMode {
    #[default]
    Normal,
    Terminal,
}

/// Generation parameters passed through to the provider.
///
/// Held once as the global "current" config and snapshotted into every
/// session at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub model: ModelKind,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<u32>,
    pub system_instruction: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::Flash3,
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: Some(2048),
            thinking_budget: Some(0),
            system_instruction: "Tu es Eli*AI, un assistant professionnel. Style: Minimaliste, \
                                 technique, sans emojis. Réponds toujours en Markdown structuré."
                .to_string(),
        }
    }
}

/// A file attached to a message, carried as a base64 data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    /// `data:<mime>;base64,<body>`; the raw body is what goes on the wire.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

impl Attachment {
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        let name: String = name.into();
        let mime_type: String = mime_type.into();
        let body = general_purpose::STANDARD.encode(bytes);
        let data = format!("data:{mime_type};base64,{body}");
        let preview_url = mime_type.starts_with("image/").then(|| data.clone());
        Self {
            id: new_id("att"),
            name,
            mime_type,
            data,
            preview_url,
        }
    }

    /// Base64 body with the data-URL prefix stripped, if one is present.
    pub fn raw_base64(&self) -> &str {
        self.data
            .split_once(',')
            .map(|(_, body)| body)
            .unwrap_or(&self.data)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub timestamp: u64,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            id: new_id("msg"),
            role: Role::User,
            content: content.into(),
            attachments,
            timestamp: now_ms(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            id: new_id("msg"),
            role: Role::Model,
            content: content.into(),
            attachments: Vec::new(),
            timestamp: now_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub last_modified: u64,
    pub config: GenerationConfig,
}

impl ChatSession {
    pub fn new(title: impl Into<String>, config: GenerationConfig) -> Self {
        Self {
            id: new_id("sess"),
            title: title.into(),
            messages: Vec::new(),
            last_modified: now_ms(),
            config,
        }
    }

    /// Appends a message and bumps the modification timestamp.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.last_modified = now_ms();
    }
}

/// The complete persisted application state, replaced wholesale on every
/// write. Every field defaults independently so partial records load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub sessions: Vec<ChatSession>,
    #[serde(default)]
    pub config: GenerationConfig,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub ui_mode: UiMode,
    #[serde(default)]
    pub current_session_id: Option<String>,
}

impl Snapshot {
    /// Degraded form: attachments dropped from every message, everything
    /// else intact.
    pub fn strip_attachments(&self) -> Snapshot {
        let mut light = self.clone();
        for session in &mut light.sessions {
            for message in &mut session.messages {
                message.attachments = Vec::new();
            }
        }
        light
    }
}
