use crate::app::AppContext;
use crate::chat::{ChatEntry, ChatKey, ChatSession, format_message_time};
use crate::markup::PENDING_TEXT;
use crate::types::Sender;
use dioxus::events::Key;
use dioxus::prelude::*;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(80);

fn sender_class(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "user",
        Sender::Bot => "bot",
    }
}

/// Floating chatbot: launcher button plus the popup when open.
#[component]
pub fn ChatbotPopup() -> Element {
    let context = use_context::<AppContext>();
    let mut session = use_signal(ChatSession::default);

    let poll_chat = context.chat.clone();
    use_future(move || {
        let chat = poll_chat.clone();
        let mut session = session;
        async move {
            let mut seen = u64::MAX;
            loop {
                let revision = chat.revision();
                if revision != seen {
                    seen = revision;
                    session.set(chat.snapshot());
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
    });

    let toggle_chat = context.chat.clone();
    let key_chat = context.chat.clone();
    let input_chat = context.chat.clone();
    let send_chat = context.chat.clone();
    let close_chat = context.chat.clone();
    let snapshot = session();

    rsx! {
        button {
            class: "chatbot-launcher",
            r#type: "button",
            title: "Ask the assistant",
            onclick: move |_| {
                toggle_chat.toggle();
                session.set(toggle_chat.snapshot());
            },
            i { class: "fas fa-robot" }
        }
        if snapshot.is_open {
            div { class: "chatbot-popup", role: "dialog",
                div { class: "chatbot-header",
                    strong { "AI Assistant" }
                    button {
                        class: "btn-ghost", r#type: "button",
                        onclick: move |_| {
                            close_chat.close();
                            session.set(close_chat.snapshot());
                        },
                        "×"
                    }
                }
                div { id: "chatMessages", class: "chat-messages",
                    for entry in snapshot.entries.iter() {
                        {match entry {
                            ChatEntry::Message(message) => rsx! {
                                div {
                                    key: "m{message.id.0}",
                                    class: format_args!("mb-2 message {}", sender_class(message.sender)),
                                    strong { "{message.sender.label()}: " }
                                    "{message.text}"
                                    span { class: "message-timestamp", "{format_message_time(message)}" }
                                    if message.sender == Sender::Bot {
                                        CopyButton { text: message.text.clone() }
                                    }
                                }
                            },
                            ChatEntry::Pending(id) => rsx! {
                                div {
                                    key: "p{id.0}",
                                    id: "chat-pending-{id.0}",
                                    class: "mb-2 text-muted",
                                    strong { "{Sender::Bot.label()}: " }
                                    i { class: "fas fa-spinner fa-spin" }
                                    " {PENDING_TEXT}"
                                }
                            },
                        }}
                    }
                }
                div { class: "chatbot-composer",
                    input {
                        id: "chatInput",
                        r#type: "text",
                        placeholder: "Ask about courses, assignments or grades",
                        value: "{snapshot.input}",
                        autofocus: true,
                        oninput: move |ev| input_chat.set_input(ev.value()),
                        onkeydown: move |ev| {
                            let key = match ev.key() {
                                Key::Enter => ChatKey::Enter,
                                Key::Escape => ChatKey::Escape,
                                _ => ChatKey::Other,
                            };
                            if key != ChatKey::Other {
                                ev.prevent_default();
                                key_chat.handle_key(key);
                                session.set(key_chat.snapshot());
                            }
                        },
                    }
                    button {
                        class: "btn btn-primary", r#type: "button",
                        onclick: move |_| {
                            send_chat.send_message();
                            session.set(send_chat.snapshot());
                        },
                        "Send"
                    }
                }
            }
        }
    }
}

#[component]
fn CopyButton(text: String) -> Element {
    let on_copy = move |_| {
        let raw = text.clone();
        spawn(async move {
            #[cfg(any(feature = "desktop", feature = "mobile"))]
            {
                if let Ok(mut cb) = arboard::Clipboard::new() {
                    let _ = cb.set_text(raw);
                }
            }
            #[cfg(not(any(feature = "desktop", feature = "mobile")))]
            let _ = raw;
        });
    };
    rsx! {
        button { class: "action-btn", title: "Copy reply", onclick: on_copy, "Copy" }
    }
}
