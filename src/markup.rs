//! Escaped HTML fragments for embedders that render into server templates
//! or raw `innerHTML`. Text from users or the server always goes through
//! `html_escape`; only the fixed markup around it is literal.

use crate::chat::ChatEntry;
use crate::notify::Notification;
use crate::page::LanguageSelector;
use crate::types::{SearchHit, Sender};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

pub const PENDING_TEXT: &str = "Thinking...";

pub fn chat_entry(entry: &ChatEntry) -> String {
    match entry {
        ChatEntry::Message(message) => {
            let class = match message.sender {
                Sender::User => "mb-2",
                Sender::Bot => "mb-2 bot",
            };
            format!(
                r#"<div class="{class}" data-message-id="{}"><strong>{}:</strong> {}</div>"#,
                message.id.0,
                message.sender.label(),
                encode_text(&message.text)
            )
        }
        ChatEntry::Pending(id) => format!(
            r#"<div class="mb-2 text-muted" id="chat-pending-{}"><strong>{}:</strong> <i class="fas fa-spinner fa-spin"></i> {PENDING_TEXT}</div>"#,
            id.0,
            Sender::Bot.label()
        ),
    }
}

pub fn chat_log(entries: &[ChatEntry]) -> String {
    entries.iter().map(chat_entry).collect()
}

pub fn notification(item: &Notification) -> String {
    format!(
        r#"<div class="{}" role="alert" data-notification-id="{}"><i class="fas fa-{}"></i> {}</div>"#,
        encode_double_quoted_attribute(&item.class()),
        item.id.0,
        item.kind.icon(),
        encode_text(&item.message)
    )
}

pub fn search_suggestions(hits: &[SearchHit]) -> String {
    let mut html = String::from(r#"<div class="search-suggestions">"#);
    for hit in hits {
        let _ = write!(
            html,
            r#"<a class="suggestion" href="{}"><strong>{}</strong><small>{}</small></a>"#,
            encode_double_quoted_attribute(&hit.url),
            encode_text(&hit.title),
            encode_text(&hit.description)
        );
    }
    html.push_str("</div>");
    html
}

pub fn language_selector(selector: &LanguageSelector) -> String {
    let mut html = String::from(
        r#"<div class="p-3 border-top"><small class="text-muted d-block mb-2">Language</small><select class="form-select form-select-sm" id="langSelector">"#,
    );
    for lang in &selector.options {
        let selected = if *lang == selector.selected {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            html,
            r#"<option value="{}"{selected}>{}</option>"#,
            lang.code(),
            encode_text(lang.label())
        );
    }
    html.push_str("</select></div>");
    html
}

pub fn file_preview(file_name: &str) -> String {
    format!(
        "<p><strong>Selected:</strong> {}</p>",
        encode_text(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationId, Phase};
    use crate::types::{
        ChatMessage, Language, MessageId, NotificationKind, NotificationStyle, PendingId,
    };
    use time::OffsetDateTime;

    #[test]
    fn chat_text_is_escaped() {
        let entry = ChatEntry::Message(ChatMessage {
            id: MessageId(1),
            text: "<script>alert(1)</script> & more".to_string(),
            sender: Sender::User,
            sent_at: OffsetDateTime::UNIX_EPOCH,
        });
        let html = chat_entry(&entry);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<strong>You:</strong>"));
    }

    #[test]
    fn pending_indicators_carry_their_own_id() {
        let html = chat_log(&[ChatEntry::Pending(PendingId(4)), ChatEntry::Pending(PendingId(5))]);
        assert!(html.contains(r#"id="chat-pending-4""#));
        assert!(html.contains(r#"id="chat-pending-5""#));
    }

    #[test]
    fn suggestion_urls_cannot_break_out_of_the_attribute() {
        let html = search_suggestions(&[SearchHit {
            title: "<b>Algebra</b>".to_string(),
            description: "Week 1".to_string(),
            url: r#"/course/1" onmouseover="x"#.to_string(),
        }]);
        assert!(html.contains("&quot; onmouseover=&quot;x"));
        assert!(html.contains("&lt;b&gt;Algebra&lt;/b&gt;"));
    }

    #[test]
    fn notification_markup_uses_style_and_icon() {
        let item = Notification {
            id: NotificationId(9),
            message: "Upload failed: <413>".to_string(),
            kind: NotificationKind::Error,
            style: NotificationStyle::Alert,
            created_at: OffsetDateTime::UNIX_EPOCH,
            duration: None,
            phase: Phase::Visible,
        };
        let html = notification(&item);
        assert!(html.starts_with(r#"<div class="alert alert-danger""#));
        assert!(html.contains("fa-times-circle"));
        assert!(html.contains("Upload failed: &lt;413&gt;"));
    }

    #[test]
    fn selector_marks_the_current_language() {
        let html = language_selector(&LanguageSelector {
            options: Language::ALL.to_vec(),
            selected: Language::Ta,
        });
        assert!(html.contains(r#"<option value="ta" selected>தமிழ்</option>"#));
        assert!(html.contains(r#"<option value="en">English</option>"#));
    }

    #[test]
    fn file_names_are_escaped() {
        assert_eq!(
            file_preview("a<b>.pdf"),
            "<p><strong>Selected:</strong> a&lt;b&gt;.pdf</p>"
        );
    }
}
