//! Chat message model — one tagged variant per bubble kind.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether the account form creates a new account or logs into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountMode {
    Create,
    Login,
}

impl std::fmt::Display for AccountMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Login => write!(f, "login"),
        }
    }
}

/// One display-ready search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Path (store-backed) or pictogram (sample library) identifying the image.
    pub image_ref: String,
    /// Caption embedding the query text and the source filename.
    pub caption: String,
    /// True when the hit came from the remote photo store.
    pub from_store: bool,
}

/// Message payload, tagged by bubble kind.
///
/// Modeling each kind as its own variant keeps invalid combinations (say, a
/// results message carrying an account mode) unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MessageBody {
    User { text: String },
    Assistant { text: String },
    Typing,
    AccountChoice,
    AccountForm { mode: AccountMode },
    Thumbnails,
    Progress { upload_total: u32 },
    Results { results: Vec<SearchResult> },
    ActionButton { text: String },
}

/// Fieldless mirror of [`MessageBody`] used for filtering the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Assistant,
    Typing,
    AccountChoice,
    AccountForm,
    Thumbnails,
    Progress,
    Results,
    ActionButton,
}

impl MessageBody {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::User { .. } => MessageKind::User,
            Self::Assistant { .. } => MessageKind::Assistant,
            Self::Typing => MessageKind::Typing,
            Self::AccountChoice => MessageKind::AccountChoice,
            Self::AccountForm { .. } => MessageKind::AccountForm,
            Self::Thumbnails => MessageKind::Thumbnails,
            Self::Progress { .. } => MessageKind::Progress,
            Self::Results { .. } => MessageKind::Results,
            Self::ActionButton { .. } => MessageKind::ActionButton,
        }
    }
}

/// The atomic unit of the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Stable unique id within a session.
    pub id: String,
    #[serde(flatten)]
    pub body: MessageBody,
}

impl Message {
    /// New message with a random id.
    pub fn new(body: MessageBody) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            body,
        }
    }

    /// New message with a fixed id (scripted bubbles).
    pub fn with_id(id: impl Into<String>, body: MessageBody) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageBody::User { text: text.into() })
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageBody::Assistant { text: text.into() })
    }

    /// Typing indicators carry a fresh id each time; removal goes by kind,
    /// and id-keyed renderers must see every occurrence.
    pub fn typing() -> Self {
        Self::new(MessageBody::Typing)
    }

    pub fn kind(&self) -> MessageKind {
        self.body.kind()
    }

    /// Display payload for the simple kinds, if any.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            MessageBody::User { text }
            | MessageBody::Assistant { text }
            | MessageBody::ActionButton { text } => Some(text),
            _ => None,
        }
    }
}
