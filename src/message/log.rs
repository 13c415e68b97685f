//! MessageLog — ordered conversation log with pure, filter-based mutation.

use tokio::sync::watch;
use tracing::debug;

use super::model::{Message, MessageKind};

/// Ordered collection of chat messages.
///
/// All operations consume the log and return a new value; callers that share
/// a log across readers do so through [`LogHandle`] snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageLog {
    messages: Vec<Message>,
}

/// A pure transform over a [`MessageLog`].
///
/// Removal is always predicate-based (never positional) so an effect that
/// fires late still operates correctly against the then-current log.
#[derive(Debug, Clone)]
pub enum LogOp {
    /// Append messages at the end.
    Append(Vec<Message>),
    /// Remove every message of the given kind.
    RemoveKind(MessageKind),
    /// Atomically remove every message of the given kind, then append.
    ReplaceKind(MessageKind, Vec<Message>),
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Count messages of a kind.
    pub fn count_kind(&self, kind: MessageKind) -> usize {
        self.messages.iter().filter(|m| m.kind() == kind).count()
    }

    /// Whether any message of the kind is present.
    pub fn contains_kind(&self, kind: MessageKind) -> bool {
        self.count_kind(kind) > 0
    }

    /// Append messages, preserving log order.
    pub fn append(mut self, messages: Vec<Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Remove every message matching the predicate.
    pub fn remove_where(mut self, pred: impl Fn(&Message) -> bool) -> Self {
        self.messages.retain(|m| !pred(m));
        self
    }

    /// Atomic remove-then-append.
    pub fn replace(self, pred: impl Fn(&Message) -> bool, messages: Vec<Message>) -> Self {
        self.remove_where(pred).append(messages)
    }

    /// Apply a [`LogOp`].
    pub fn apply(self, op: LogOp) -> Self {
        match op {
            LogOp::Append(msgs) => self.append(msgs),
            LogOp::RemoveKind(kind) => self.remove_where(|m| m.kind() == kind),
            LogOp::ReplaceKind(kind, msgs) => self.replace(|m| m.kind() == kind, msgs),
        }
    }
}

/// Shared handle over the log.
///
/// The watch channel is the single writer path, so operations are observed in
/// the order they are issued; each publish doubles as the "scroll to newest"
/// signal the presentation layer subscribes to.
#[derive(Debug, Clone)]
pub struct LogHandle {
    tx: watch::Sender<MessageLog>,
}

impl LogHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(MessageLog::new());
        Self { tx }
    }

    /// Apply an op and publish the new log value.
    pub fn apply(&self, op: LogOp) {
        self.tx.send_modify(|log| {
            let next = std::mem::take(log).apply(op);
            *log = next;
        });
        debug!(len = self.tx.borrow().len(), "log updated");
    }

    /// Current log snapshot.
    pub fn snapshot(&self) -> MessageLog {
        self.tx.borrow().clone()
    }

    /// Subscribe to log changes.
    pub fn subscribe(&self) -> watch::Receiver<MessageLog> {
        self.tx.subscribe()
    }
}

impl Default for LogHandle {
    fn default() -> Self {
        Self::new()
    }
}
