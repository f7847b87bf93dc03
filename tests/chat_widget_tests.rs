//! End-to-end behaviour of the chatbot popup against scripted backends

use async_trait::async_trait;
use cms_widgets::api::{ApiError, ApiResult, ChatBackend, ChatReply};
use cms_widgets::chat::{ChatEntry, ChatWidget, FALLBACK_FAILURE, FALLBACK_UNPROCESSED};
use cms_widgets::types::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Replies after a per-message delay, counting calls.
struct Scripted {
    calls: AtomicUsize,
    reply: fn(&str) -> ApiResult<ChatReply>,
    delay: fn(&str) -> Duration,
}

#[async_trait]
impl ChatBackend for Scripted {
    async fn ask(&self, message: &str) -> ApiResult<ChatReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep((self.delay)(message)).await;
        (self.reply)(message)
    }
}

fn scripted(
    reply: fn(&str) -> ApiResult<ChatReply>,
    delay: fn(&str) -> Duration,
) -> Arc<Scripted> {
    Arc::new(Scripted {
        calls: AtomicUsize::new(0),
        reply,
        delay,
    })
}

fn log(chat: &ChatWidget) -> Vec<(Sender, String)> {
    chat.messages()
        .into_iter()
        .map(|message| (message.sender, message.text))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn hello_gets_the_backend_reply() {
    let backend = scripted(
        |_| {
            Ok(ChatReply {
                response: Some("Hi there!".to_string()),
            })
        },
        |_| Duration::from_millis(50),
    );
    let chat = ChatWidget::new(backend.clone());
    chat.open();
    chat.set_input("Hello");
    let handle = chat.send_message().expect("sent");

    // the request has not even started yet, but the user message is there
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    assert_eq!(log(&chat), vec![(Sender::User, "Hello".to_string())]);

    handle.finished().await;
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        log(&chat),
        vec![
            (Sender::User, "Hello".to_string()),
            (Sender::Bot, "Hi there!".to_string()),
        ]
    );
    assert!(chat.snapshot().pending().is_empty());
}

#[tokio::test(start_paused = true)]
async fn transport_failure_becomes_the_fallback_message() {
    let backend = scripted(
        |_| Err(ApiError::Status { status: 502 }),
        |_| Duration::from_millis(20),
    );
    let chat = ChatWidget::new(backend);
    chat.open();
    chat.set_input("Hello");
    chat.send_message().expect("sent").finished().await;

    assert_eq!(
        log(&chat),
        vec![
            (Sender::User, "Hello".to_string()),
            (Sender::Bot, FALLBACK_FAILURE.to_string()),
        ]
    );
    assert!(chat.snapshot().pending().is_empty());
}

#[tokio::test(start_paused = true)]
async fn missing_response_field_uses_the_generic_reply() {
    let backend = scripted(|_| Ok(ChatReply::default()), |_| Duration::ZERO);
    let chat = ChatWidget::new(backend);
    chat.set_input("grades?");
    chat.send_message().expect("sent").finished().await;
    assert_eq!(log(&chat)[1], (Sender::Bot, FALLBACK_UNPROCESSED.to_string()));
}

#[tokio::test(start_paused = true)]
async fn overlapping_sends_keep_their_own_indicators_and_send_order() {
    let backend = scripted(
        |message| {
            Ok(ChatReply {
                response: Some(format!("re: {message}")),
            })
        },
        |message| {
            if message == "slow" {
                Duration::from_millis(200)
            } else {
                Duration::from_millis(10)
            }
        },
    );
    let chat = ChatWidget::new(backend);
    chat.open();

    chat.set_input("slow");
    let slow = chat.send_message().expect("sent");
    chat.set_input("fast");
    let fast = chat.send_message().expect("sent");
    assert_ne!(slow.pending, fast.pending);
    assert_eq!(chat.snapshot().pending(), vec![slow.pending, fast.pending]);

    let slow_pending = slow.pending;
    fast.finished().await;
    // the fast reply must not remove the slow request's indicator
    assert_eq!(chat.snapshot().pending(), vec![slow_pending]);

    slow.finished().await;
    assert_eq!(
        log(&chat),
        vec![
            (Sender::User, "slow".to_string()),
            (Sender::Bot, "re: slow".to_string()),
            (Sender::User, "fast".to_string()),
            (Sender::Bot, "re: fast".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn closing_abandons_requests_in_flight() {
    let backend = scripted(
        |_| {
            Ok(ChatReply {
                response: Some("late".to_string()),
            })
        },
        |_| Duration::from_secs(5),
    );
    let chat = ChatWidget::new(backend);
    chat.open();
    chat.set_input("are you there?");
    let handle = chat.send_message().expect("sent");

    chat.close();
    handle.finished().await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    let session = chat.snapshot();
    assert!(!session.is_open);
    assert!(session.pending().is_empty());
    assert!(
        session
            .entries
            .iter()
            .all(|entry| !matches!(entry, ChatEntry::Message(m) if m.sender == Sender::Bot))
    );
    assert_eq!(log(&chat).len(), 1);
}
