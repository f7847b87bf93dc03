//! Root composition: every widget and its collaborators, built once and
//! handed down to the views.

use crate::api::{ApiResult, CmsClient};
use crate::autosave::AutoSaver;
use crate::chat::ChatWidget;
use crate::config::AppConfig;
use crate::notify::NotificationCenter;
use crate::page::{Node, Page, Sidebar};
use crate::search::SearchBox;
use crate::storage::PreferenceStore;
use crate::theme::ThemeManager;
use crate::types::{ThemeMode, ThemePreference};
use crate::upload::UploadIndicator;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const NAV_KEYS: &[(&str, &str)] = &[
    ("dashboard", "Dashboard"),
    ("courses", "Courses"),
    ("assignments", "Assignments"),
    ("messages", "Messages"),
    ("calendar", "Calendar"),
    ("practice_quiz", "Practice Quiz"),
    ("notifications", "Notifications"),
    ("profile", "Profile"),
    ("logout", "Logout"),
];

/// The page every shell starts from: a welcome heading, the search input
/// and the navigation sidebar.
pub fn default_page() -> Page {
    Page {
        nodes: vec![
            Node::text("Welcome").translated("welcome"),
            Node::input("Join Course").translated("join_course"),
            Node::input("Search courses..."),
        ],
        sidebar: Some(Sidebar {
            items: NAV_KEYS
                .iter()
                .map(|(key, text)| Node::text(*text).translated(*key))
                .collect(),
            controls: Vec::new(),
        }),
        theme_icon: Some(ThemeMode::Light.toggle_icon().to_string()),
        ..Page::default()
    }
}

pub struct Appearance {
    pub manager: ThemeManager<Arc<dyn PreferenceStore>>,
    pub page: Page,
}

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub client: CmsClient,
    pub notifications: NotificationCenter,
    pub chat: ChatWidget,
    pub search: Arc<SearchBox>,
    pub upload: Arc<UploadIndicator>,
    pub autosave: Arc<AutoSaver>,
    appearance: Arc<Mutex<Appearance>>,
}

impl AppContext {
    pub fn new(config: AppConfig, store: Arc<dyn PreferenceStore>) -> ApiResult<Self> {
        let client = CmsClient::new(&config.base_url)?.with_autosave_path(&config.autosave_path);
        let shared = Arc::new(client.clone());
        let notifications = NotificationCenter::new(config.toast_duration);

        let manager = ThemeManager::new(store);
        let mut page = default_page();
        manager.init(&mut page);

        Ok(Self {
            chat: ChatWidget::new(shared.clone()),
            search: Arc::new(SearchBox::new(shared.clone(), config.search_debounce)),
            upload: Arc::new(UploadIndicator::new(shared.clone(), notifications.clone())),
            autosave: Arc::new(AutoSaver::new(
                shared,
                notifications.clone(),
                config.autosave_debounce,
            )),
            appearance: Arc::new(Mutex::new(Appearance { manager, page })),
            notifications,
            client,
            config,
        })
    }

    fn appearance(&self) -> MutexGuard<'_, Appearance> {
        self.appearance.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn preference(&self) -> ThemePreference {
        self.appearance().manager.preference()
    }

    pub fn page(&self) -> Page {
        self.appearance().page.clone()
    }

    /// Flips the theme. A failed write is logged; the new theme still applies.
    pub fn toggle_theme(&self) -> ThemeMode {
        let mut appearance = self.appearance();
        let Appearance { manager, page } = &mut *appearance;
        match manager.toggle_theme(page) {
            Ok(theme) => theme,
            Err(err) => {
                tracing::warn!(error = %err, "could not persist theme");
                manager.theme()
            }
        }
    }

    pub fn set_language_code(&self, code: &str) {
        let mut appearance = self.appearance();
        let Appearance { manager, page } = &mut *appearance;
        if let Err(err) = manager.set_language_code(code, page) {
            tracing::warn!(error = %err, "could not persist language");
        }
    }

    pub fn label(&self, key: &str) -> String {
        self.appearance().manager.label(key).to_string()
    }
}
