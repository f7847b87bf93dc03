use crate::api::ChatBackend;
use crate::markup;
use crate::types::{ChatMessage, MessageId, PendingId, Sender};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tokio::task::{AbortHandle, JoinHandle};

/// Shown when the endpoint answers without a `response` field.
pub const FALLBACK_UNPROCESSED: &str = "Sorry, I could not process your request.";
/// Shown when the request itself fails.
pub const FALLBACK_FAILURE: &str = "Sorry, I'm having trouble right now. Please try again later.";

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

pub fn format_message_time(message: &ChatMessage) -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    message
        .sent_at
        .to_offset(offset)
        .format(MESSAGE_TIME_FORMAT)
        .unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChatEntry {
    Message(ChatMessage),
    /// "Thinking..." placeholder for one in-flight request.
    Pending(PendingId),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatSession {
    pub is_open: bool,
    pub entries: Vec<ChatEntry>,
    pub input: String,
}

impl ChatSession {
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|entry| match entry {
            ChatEntry::Message(message) => Some(message),
            ChatEntry::Pending(_) => None,
        })
    }

    pub fn pending(&self) -> Vec<PendingId> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                ChatEntry::Pending(id) => Some(*id),
                ChatEntry::Message(_) => None,
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatKey {
    Enter,
    Escape,
    Other,
}

#[derive(Default)]
struct State {
    session: ChatSession,
    next_id: u64,
    revision: u64,
    in_flight: HashMap<PendingId, AbortHandle>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn push_message(&mut self, sender: Sender, text: String) {
        let id = MessageId(self.next_id());
        self.session.entries.push(ChatEntry::Message(ChatMessage {
            id,
            text,
            sender,
            sent_at: OffsetDateTime::now_utc(),
        }));
    }

    /// Swaps the indicator for the bot reply, keeping its place in the log.
    fn resolve(&mut self, pending: PendingId, text: String) -> bool {
        self.in_flight.remove(&pending);
        let Some(slot) = self
            .session
            .entries
            .iter()
            .position(|entry| *entry == ChatEntry::Pending(pending))
        else {
            return false;
        };
        let id = MessageId(self.next_id());
        self.session.entries[slot] = ChatEntry::Message(ChatMessage {
            id,
            text,
            sender: Sender::Bot,
            sent_at: OffsetDateTime::now_utc(),
        });
        self.revision += 1;
        true
    }
}

/// Handle on one spawned chat request.
pub struct SendHandle {
    pub pending: PendingId,
    task: JoinHandle<()>,
}

impl SendHandle {
    /// Waits until the reply (or fallback) has been recorded, or the request
    /// was aborted.
    pub async fn finished(self) {
        let _ = self.task.await;
    }
}

/// The chatbot popup: open/closed state, the message log and the input box.
#[derive(Clone)]
pub struct ChatWidget {
    state: Arc<Mutex<State>>,
    backend: Arc<dyn ChatBackend>,
}

impl ChatWidget {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            backend,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_open(&self) -> bool {
        self.lock().session.is_open
    }

    pub fn open(&self) {
        let mut state = self.lock();
        if !state.session.is_open {
            state.session.is_open = true;
            state.revision += 1;
        }
    }

    /// Closes the popup and abandons every request still in flight.
    pub fn close(&self) {
        let mut state = self.lock();
        if !state.session.is_open {
            return;
        }
        state.session.is_open = false;
        let aborted: Vec<PendingId> = state.in_flight.keys().copied().collect();
        for (_, handle) in state.in_flight.drain() {
            handle.abort();
        }
        state
            .session
            .entries
            .retain(|entry| !matches!(entry, ChatEntry::Pending(id) if aborted.contains(id)));
        state.revision += 1;
        if !aborted.is_empty() {
            tracing::debug!(count = aborted.len(), "aborted chat requests on close");
        }
    }

    pub fn toggle(&self) -> bool {
        if self.is_open() {
            self.close();
            false
        } else {
            self.open();
            true
        }
    }

    pub fn set_input(&self, text: impl Into<String>) {
        let mut state = self.lock();
        state.session.input = text.into();
    }

    pub fn input(&self) -> String {
        self.lock().session.input.clone()
    }

    pub fn handle_key(&self, key: ChatKey) -> Option<SendHandle> {
        match key {
            ChatKey::Enter => self.send_message(),
            ChatKey::Escape => {
                self.close();
                None
            }
            ChatKey::Other => None,
        }
    }

    /// Sends the current input. Whitespace-only input is ignored and leaves
    /// everything untouched; otherwise the user message and a fresh pending
    /// indicator are in the log before the request is spawned.
    pub fn send_message(&self) -> Option<SendHandle> {
        let mut state = self.lock();
        let text = state.session.input.trim().to_string();
        if text.is_empty() {
            return None;
        }

        state.push_message(Sender::User, text.clone());
        state.session.input.clear();
        let pending = PendingId(state.next_id());
        state.session.entries.push(ChatEntry::Pending(pending));
        state.revision += 1;

        // spawned under the lock so the task cannot resolve before it is tracked
        let backend = Arc::clone(&self.backend);
        let shared = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let reply = match backend.ask(&text).await {
                Ok(reply) => reply
                    .response
                    .unwrap_or_else(|| FALLBACK_UNPROCESSED.to_string()),
                Err(err) => {
                    tracing::warn!(error = %err, "chat request failed");
                    FALLBACK_FAILURE.to_string()
                }
            };
            let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if !state.resolve(pending, reply) {
                tracing::debug!(pending = pending.0, "dropping reply for a removed indicator");
            }
        });
        state.in_flight.insert(pending, task.abort_handle());
        Some(SendHandle { pending, task })
    }

    pub fn snapshot(&self) -> ChatSession {
        self.lock().session.clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().session.messages().cloned().collect()
    }

    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    pub fn render_html(&self) -> String {
        markup::chat_log(&self.lock().session.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResult, ChatReply};
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl ChatBackend for Echo {
        async fn ask(&self, message: &str) -> ApiResult<ChatReply> {
            Ok(ChatReply {
                response: Some(format!("echo: {message}")),
            })
        }
    }

    fn widget() -> ChatWidget {
        ChatWidget::new(Arc::new(Echo))
    }

    #[test]
    fn starts_closed_and_toggles() {
        let chat = widget();
        assert!(!chat.is_open());
        assert!(chat.toggle());
        assert!(chat.is_open());
        assert!(!chat.toggle());
        assert!(!chat.is_open());
    }

    #[test]
    fn escape_closes_and_other_keys_do_nothing() {
        let chat = widget();
        chat.open();
        assert!(chat.handle_key(ChatKey::Other).is_none());
        assert!(chat.is_open());
        assert!(chat.handle_key(ChatKey::Escape).is_none());
        assert!(!chat.is_open());
    }

    #[test]
    fn blank_input_is_ignored() {
        let chat = widget();
        for input in ["", "   ", "\n\t "] {
            chat.set_input(input);
            let revision = chat.revision();
            assert!(chat.send_message().is_none());
            assert_eq!(chat.input(), input);
            assert!(chat.snapshot().entries.is_empty());
            assert_eq!(chat.revision(), revision);
        }
    }

    #[tokio::test]
    async fn user_message_is_logged_before_the_reply() {
        let chat = widget();
        chat.open();
        chat.set_input("  When is the quiz?  ");
        let handle = chat.handle_key(ChatKey::Enter).expect("message sent");

        let session = chat.snapshot();
        assert_eq!(session.input, "");
        assert_eq!(session.pending(), vec![handle.pending]);
        let first: Vec<_> = session.messages().collect();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].text, "When is the quiz?");
        assert_eq!(first[0].sender, Sender::User);

        handle.finished().await;
        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, "echo: When is the quiz?");
        assert!(chat.snapshot().pending().is_empty());
    }

    #[tokio::test]
    async fn rendered_log_escapes_user_text() {
        let chat = widget();
        chat.set_input("<img src=x onerror=alert(1)>");
        chat.send_message().expect("sent").finished().await;
        let html = chat.render_html();
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn message_time_is_twelve_hour() {
        let message = ChatMessage {
            id: MessageId(1),
            text: String::new(),
            sender: Sender::User,
            sent_at: OffsetDateTime::UNIX_EPOCH,
        };
        let formatted = format_message_time(&message);
        assert!(formatted.ends_with("AM") || formatted.ends_with("PM"), "{formatted}");
        assert_eq!(formatted.len(), 8);
    }
}
