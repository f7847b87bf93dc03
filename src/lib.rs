//! Client-side widgets for the CMS front end: notifications, the chatbot
//! popup, theme and locale switching, live search, uploads, auto-save and
//! form helpers.
//!
//! Everything outside `ui`/`views` is headless state driven by tokio; the
//! Dioxus shell behind the `desktop`/`web`/`mobile` features renders it.

pub mod api;
pub mod app;
pub mod autosave;
pub mod chat;
pub mod config;
pub mod debounce;
pub mod forms;
pub mod i18n;
pub mod logging;
pub mod markup;
pub mod notify;
pub mod page;
pub mod search;
pub mod storage;
pub mod theme;
pub mod types;
pub mod upload;

#[cfg(feature = "dioxus")]
pub mod ui;
#[cfg(feature = "dioxus")]
pub mod views;
