//! Theme and locale state.
//!
//! [`ThemeManager`] owns the current [`ThemePreference`], persists every
//! explicit change through a [`PreferenceStore`] and re-applies it to a
//! [`Page`]. The application root constructs one and hands it to whatever
//! needs it.

use crate::i18n::Dictionary;
use crate::page::{NodeKind, Page};
use crate::storage::{PreferenceStore, StorageError};
use crate::types::{Language, ThemeMode, ThemePreference};

pub const THEME_KEY: &str = "theme";
pub const LANGUAGE_KEY: &str = "language";

pub struct ThemeDefinition {
    pub css: &'static str,
    pub icon: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Dark => ThemeDefinition {
            css: DARK_THEME,
            icon: mode.toggle_icon(),
        },
        ThemeMode::Light => ThemeDefinition {
            css: LIGHT_THEME,
            icon: mode.toggle_icon(),
        },
    }
}

pub struct ThemeManager<S> {
    store: S,
    preference: ThemePreference,
    dictionary: Dictionary,
}

impl<S: PreferenceStore> ThemeManager<S> {
    /// Reads the persisted preference; absent or unknown values fall back to
    /// light/English without complaint.
    pub fn new(store: S) -> Self {
        Self::with_dictionary(store, Dictionary::builtin().clone())
    }

    pub fn with_dictionary(store: S, dictionary: Dictionary) -> Self {
        let theme = store
            .get(THEME_KEY)
            .and_then(|value| ThemeMode::parse(&value))
            .unwrap_or_default();
        let language = store
            .get(LANGUAGE_KEY)
            .and_then(|value| Language::from_code(&value))
            .unwrap_or_default();
        Self {
            store,
            preference: ThemePreference { theme, language },
            dictionary,
        }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn theme(&self) -> ThemeMode {
        self.preference.theme
    }

    pub fn language(&self) -> Language {
        self.preference.language
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.dictionary.label(self.preference.language, key)
    }

    pub fn init(&self, page: &mut Page) {
        self.apply_theme(page);
        self.apply_language(page);
        if page.ensure_language_selector(self.preference.language) {
            tracing::debug!("language selector attached to sidebar");
        }
    }

    pub fn toggle_theme(&mut self, page: &mut Page) -> Result<ThemeMode, StorageError> {
        self.preference.theme = self.preference.theme.toggled();
        self.apply_theme(page);
        self.store.set(THEME_KEY, self.preference.theme.as_str())?;
        Ok(self.preference.theme)
    }

    pub fn set_language(&mut self, lang: Language, page: &mut Page) -> Result<(), StorageError> {
        self.preference.language = lang;
        self.apply_language(page);
        page.ensure_language_selector(lang);
        self.store.set(LANGUAGE_KEY, lang.code())
    }

    /// Entry point for the selector control. Codes outside the closed set are
    /// ignored.
    pub fn set_language_code(&mut self, code: &str, page: &mut Page) -> Result<bool, StorageError> {
        match Language::from_code(code) {
            Some(lang) => self.set_language(lang, page).map(|()| true),
            None => {
                tracing::warn!(code, "ignoring unknown language code");
                Ok(false)
            }
        }
    }

    pub fn translate_page(&self, page: &mut Page) {
        let lang = self.preference.language;
        for node in page.nodes_mut() {
            let Some(key) = node.translate_key.as_deref() else {
                continue;
            };
            let Some(text) = self.dictionary.lookup(lang, key) else {
                continue;
            };
            let text = text.to_string();
            match node.kind {
                NodeKind::TextInput => node.placeholder = text,
                NodeKind::Text => node.text = text,
            }
        }
    }

    fn apply_theme(&self, page: &mut Page) {
        page.set_attribute("data-theme", self.preference.theme.as_str());
        if page.theme_icon.is_some() {
            page.theme_icon = Some(self.preference.theme.toggle_icon().to_string());
        }
    }

    fn apply_language(&self, page: &mut Page) {
        page.set_attribute("lang", self.preference.language.code());
        self.translate_page(page);
    }
}

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #ffffff;
    --color-bg-secondary: #f5f5f5;
    --color-bg-overlay: rgba(255, 255, 255, 0.92);
    --color-text-primary: #000000;
    --color-text-muted: #4a4a4a;
    --color-border: #000000;
    --color-surface-muted: #e6e6e6;
    --color-input-border: #c2c2c2;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: #111111;
    --color-chat-user-text: #ffffff;
    --color-chat-bot-bg: #ffffff;
    --color-chat-bot-text: #000000;
    --color-snackbar-bg: #111111;
    --color-snackbar-text: #ffffff;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.sidebar { background: var(--color-bg-secondary); }
.chatbot-popup { background: var(--color-bg-overlay); border-color: var(--color-border); }
.chatbot-popup input { background: var(--color-input-bg); border-color: var(--color-input-border); }
.snackbar { background: var(--color-snackbar-bg); color: var(--color-snackbar-text); }
"#;

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #000000;
    --color-bg-secondary: #050505;
    --color-bg-overlay: rgba(0, 0, 0, 0.9);
    --color-text-primary: #ffffff;
    --color-text-muted: #cfcfcf;
    --color-border: #ffffff;
    --color-surface-muted: #111111;
    --color-input-border: #2a2a2a;
    --color-input-bg: #000000;
    --color-chat-user-bg: #ffffff;
    --color-chat-user-text: #000000;
    --color-chat-bot-bg: #000000;
    --color-chat-bot-text: #ffffff;
    --color-snackbar-bg: #f5f5f5;
    --color-snackbar-text: #000000;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.sidebar { background: var(--color-bg-secondary); }
.chatbot-popup { background: var(--color-bg-overlay); border-color: var(--color-border); }
.chatbot-popup input { background: var(--color-input-bg); border-color: var(--color-input-border); }
.snackbar { background: var(--color-snackbar-bg); color: var(--color-snackbar-text); }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Node, Sidebar};
    use crate::storage::MemoryStore;

    fn sample_page() -> Page {
        Page {
            nodes: vec![
                Node::text("Dashboard").translated("dashboard"),
                Node::input("Join Course").translated("join_course"),
                Node::text("Whiteboard").translated("whiteboard"),
                Node::text("plain"),
            ],
            sidebar: Some(Sidebar {
                items: vec![Node::text("Courses").translated("courses")],
                controls: Vec::new(),
            }),
            theme_icon: Some("moon".to_string()),
            ..Page::default()
        }
    }

    #[test]
    fn defaults_when_nothing_is_stored() {
        let manager = ThemeManager::new(MemoryStore::new());
        assert_eq!(manager.preference(), ThemePreference::default());
    }

    #[test]
    fn invalid_stored_values_fall_back_silently() {
        let store = MemoryStore::with_values([("theme", "sepia"), ("language", "fr")]);
        let manager = ThemeManager::new(store);
        assert_eq!(manager.theme(), ThemeMode::Light);
        assert_eq!(manager.language(), Language::En);
    }

    #[test]
    fn init_applies_stored_preference_without_writing() {
        let store = MemoryStore::with_values([("theme", "dark"), ("language", "hi")]);
        let manager = ThemeManager::new(store.clone());
        let mut page = sample_page();
        manager.init(&mut page);

        assert_eq!(page.attribute("data-theme"), Some("dark"));
        assert_eq!(page.attribute("lang"), Some("hi"));
        assert_eq!(page.theme_icon.as_deref(), Some("sun"));
        assert_eq!(page.nodes[0].text, "डैशबोर्ड");
        let sidebar = page.sidebar.as_ref().unwrap();
        assert_eq!(sidebar.items[0].text, "पाठ्यक्रम");
        assert_eq!(sidebar.language_selector().unwrap().selected, Language::Hi);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn toggling_twice_restores_theme_with_two_writes() {
        let store = MemoryStore::new();
        let mut manager = ThemeManager::new(store.clone());
        let mut page = sample_page();
        manager.init(&mut page);

        assert_eq!(manager.toggle_theme(&mut page).unwrap(), ThemeMode::Dark);
        assert_eq!(page.attribute("data-theme"), Some("dark"));
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));

        assert_eq!(manager.toggle_theme(&mut page).unwrap(), ThemeMode::Light);
        assert_eq!(page.theme_icon.as_deref(), Some("moon"));
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn tamil_translation_leaves_missing_keys_alone() {
        let store = MemoryStore::new();
        let mut manager = ThemeManager::new(store.clone());
        let mut page = sample_page();
        manager.init(&mut page);

        manager.set_language(Language::Ta, &mut page).unwrap();
        assert_eq!(page.attribute("lang"), Some("ta"));
        assert_eq!(page.nodes[0].text, "டாஷ்போர்டு");
        assert_eq!(page.nodes[1].placeholder, "பாடத்தில் சேர்");
        assert_eq!(page.nodes[1].text, "");
        assert_eq!(page.nodes[2].text, "Whiteboard");
        assert_eq!(page.nodes[3].text, "plain");
        assert_eq!(store.get(LANGUAGE_KEY).as_deref(), Some("ta"));
    }

    #[test]
    fn partial_dictionary_keeps_previous_rendering() {
        let mut dictionary = Dictionary::default();
        dictionary.extend(Language::En, [("welcome", "Welcome")]);
        dictionary.extend(Language::Ta, [("other", "x")]);
        let mut manager = ThemeManager::with_dictionary(MemoryStore::new(), dictionary);
        let mut page = Page {
            nodes: vec![Node::text("Hello").translated("welcome")],
            ..Page::default()
        };

        manager.init(&mut page);
        assert_eq!(page.nodes[0].text, "Welcome");
        manager.set_language(Language::Ta, &mut page).unwrap();
        assert_eq!(page.nodes[0].text, "Welcome");
    }

    #[test]
    fn unknown_language_codes_are_ignored() {
        let store = MemoryStore::new();
        let mut manager = ThemeManager::new(store.clone());
        let mut page = Page::default();
        assert!(!manager.set_language_code("de", &mut page).unwrap());
        assert_eq!(manager.language(), Language::En);
        assert_eq!(store.writes(), 0);
        assert!(manager.set_language_code("hi", &mut page).unwrap());
        assert_eq!(manager.language(), Language::Hi);
    }

    #[test]
    fn both_modes_have_css() {
        assert!(theme_definition(ThemeMode::Dark).css.contains("#000000"));
        assert_eq!(theme_definition(ThemeMode::Light).icon, "moon");
    }
}
