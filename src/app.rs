//! Top-level application state: sessions, configuration, and the send flow.
//!
//! `ChatApp` is the boundary a frontend talks to. Every mutation persists
//! the full snapshot; the most recent dispatch outcome is cached here for
//! the diagnostics panel instead of living in process-wide globals.

use crate::services::ai::{DispatchError, GeminiClient, ModelBackend, dispatch};
use crate::services::config::{AiConfig, load_ai_config};
use crate::services::keys::{KeyRing, KeyRingStatus};
use crate::services::paths;
use crate::session::store::SnapshotStore;
use crate::session::title::{DEFAULT_SESSION_TITLE, derive_title};
use crate::session::types::{
    Attachment, ChatMessage, ChatSession, GenerationConfig, Snapshot, Theme, UiMode,
};

pub struct ChatApp {
    backend: Box<dyn ModelBackend>,
    keys: KeyRing,
    store: SnapshotStore,
    sessions: Vec<ChatSession>,
    config: GenerationConfig,
    theme: Theme,
    ui_mode: UiMode,
    current_session_id: Option<String>,
    last_answer: String,
    last_error: String,
}

impl ChatApp {
    /// Wires the app from environment configuration and the default data
    /// directory, loading the persisted snapshot once.
    pub fn from_env() -> Result<Self, String> {
        let dir = paths::init_data_dir()?;
        let AiConfig { api_keys, base_url } = load_ai_config();
        let keys = KeyRing::load(api_keys, &dir);
        let backend = Box::new(GeminiClient::new(base_url));
        Ok(Self::new(backend, keys, SnapshotStore::new(&dir)))
    }

    /// Assembles the app from explicit parts; tests inject a scripted
    /// backend and a temporary store.
    pub fn new(backend: Box<dyn ModelBackend>, keys: KeyRing, store: SnapshotStore) -> Self {
        let snapshot = store.load();
        Self {
            backend,
            keys,
            store,
            sessions: snapshot.sessions,
            config: snapshot.config,
            theme: snapshot.theme,
            ui_mode: snapshot.ui_mode,
            current_session_id: snapshot.current_session_id,
            last_answer: String::new(),
            last_error: String::new(),
        }
    }

    /// Runs one full user turn: appends the user message, dispatches it
    /// with the prior history, appends the model reply. On failure the
    /// user message stays recorded and no model message is appended.
    pub async fn send(
        &mut self,
        input: &str,
        attachments: Vec<Attachment>,
    ) -> Result<String, DispatchError> {
        let content = input.trim().to_string();
        if content.is_empty() && attachments.is_empty() {
            return Err(DispatchError::invalid_input(
                "Nothing to send: empty query and no attachments",
            ));
        }

        self.last_error.clear();

        if self.current_session().is_none() {
            let title = derive_title(&content);
            self.new_session(Some(&title));
        }

        let history: Vec<ChatMessage> = self
            .current_session()
            .map(|s| s.messages.clone())
            .unwrap_or_default();

        let user_message = ChatMessage::user(content.clone(), attachments);
        let wire_attachments = user_message.attachments.clone();
        self.append_to_current(user_message);

        let result = dispatch(
            &*self.backend,
            &mut self.keys,
            &content,
            &wire_attachments,
            &history,
            &self.config,
        )
        .await;

        match result {
            Ok(text) => {
                self.last_answer = text.clone();
                self.append_to_current(ChatMessage::model(text.clone()));
                Ok(text)
            }
            Err(err) => {
                self.last_error = err.user_message();
                Err(err)
            }
        }
    }

    /// Creates a session snapshotting the current config and selects it.
    /// Returns the new session id.
    pub fn new_session(&mut self, title: Option<&str>) -> String {
        let session = ChatSession::new(
            title.unwrap_or(DEFAULT_SESSION_TITLE),
            self.config.clone(),
        );
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.current_session_id = Some(id.clone());
        self.persist();
        id
    }

    pub fn select_session(&mut self, id: &str) -> bool {
        if !self.sessions.iter().any(|s| s.id == id) {
            return false;
        }
        self.current_session_id = Some(id.to_string());
        self.persist();
        true
    }

    pub fn delete_session(&mut self, id: &str) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            return false;
        }
        if self.current_session_id.as_deref() == Some(id) {
            self.current_session_id = None;
        }
        self.persist();
        true
    }

    pub fn set_config(&mut self, config: GenerationConfig) {
        self.config = config;
        self.persist();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.persist();
    }

    pub fn set_ui_mode(&mut self, ui_mode: UiMode) {
        self.ui_mode = ui_mode;
        self.persist();
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn current_session(&self) -> Option<&ChatSession> {
        let id = self.current_session_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn current_session_id(&self) -> Option<&str> {
        self.current_session_id.as_deref()
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn ui_mode(&self) -> UiMode {
        self.ui_mode
    }

    pub fn key_status(&self) -> KeyRingStatus {
        self.keys.status()
    }

    pub fn last_answer(&self) -> &str {
        &self.last_answer
    }

    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// The complete state as it would be persisted.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            sessions: self.sessions.clone(),
            config: self.config.clone(),
            theme: self.theme,
            ui_mode: self.ui_mode,
            current_session_id: self.current_session_id.clone(),
        }
    }

    fn append_to_current(&mut self, message: ChatMessage) {
        let Some(id) = self.current_session_id.clone() else {
            return;
        };
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) {
            session.push(message);
        }
        self.persist();
    }

    fn persist(&self) {
        self.store.save(&self.snapshot());
    }
}
