use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "AI",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PendingId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub sent_at: OffsetDateTime,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Icon offered by the toggle button: the mode you would switch to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            ThemeMode::Light => "moon",
            ThemeMode::Dark => "sun",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ta,
    Hi,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Ta, Language::Hi];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ta => "ta",
            Language::Hi => "hi",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code.trim())
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ta => "தமிழ்",
            Language::Hi => "हिंदी",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemePreference {
    pub theme: ThemeMode,
    pub language: Language,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Info => "info-circle",
            NotificationKind::Success => "check-circle",
            NotificationKind::Warning => "exclamation-triangle",
            NotificationKind::Error => "times-circle",
        }
    }
}

/// Visual treatment of a notification. Both styles share one lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotificationStyle {
    #[default]
    Snackbar,
    Alert,
}

impl NotificationStyle {
    pub fn class_for(self, kind: NotificationKind) -> String {
        match self {
            NotificationStyle::Snackbar => format!("snackbar snackbar-{}", kind.as_str()),
            NotificationStyle::Alert => {
                let variant = match kind {
                    NotificationKind::Error => "danger",
                    other => other.as_str(),
                };
                format!("alert alert-{variant}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_toggles_between_two_values() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::parse("dark"), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::parse("sepia"), None);
    }

    #[test]
    fn language_codes_are_a_closed_set() {
        assert_eq!(Language::from_code("ta"), Some(Language::Ta));
        assert_eq!(Language::from_code(" hi "), Some(Language::Hi));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn alert_style_maps_error_to_danger() {
        assert_eq!(
            NotificationStyle::Alert.class_for(NotificationKind::Error),
            "alert alert-danger"
        );
        assert_eq!(
            NotificationStyle::Snackbar.class_for(NotificationKind::Success),
            "snackbar snackbar-success"
        );
    }
}
