use crate::app::AppContext;
use crate::page::NodeKind;
use crate::theme::theme_definition;
use crate::types::ThemeMode;
use crate::views::{ChatbotPopup, NavSidebar, SearchBar, ToastStack};
use dioxus::prelude::*;

const WELCOME_FLASH: &str = "Welcome back! Your courses are up to date.";

/// Root component. Expects an [`AppContext`] in the launch context.
#[component]
pub fn App() -> Element {
    let context = use_context::<AppContext>();
    let page = use_signal(|| context.page());

    let flash_center = context.notifications.clone();
    use_hook(move || {
        flash_center.flash(WELCOME_FLASH);
    });

    let snapshot = page();
    let theme = snapshot
        .attribute("data-theme")
        .and_then(ThemeMode::parse)
        .unwrap_or_default();
    let lang = snapshot.attribute("lang").unwrap_or("en").to_string();
    let heading = snapshot
        .nodes
        .iter()
        .find(|node| node.kind == NodeKind::Text)
        .map(|node| node.text.clone())
        .unwrap_or_default();
    let search_placeholder = snapshot
        .nodes
        .iter()
        .rev()
        .find(|node| node.kind == NodeKind::TextInput)
        .map(|node| node.placeholder.clone())
        .unwrap_or_default();

    rsx! {
        ThemeStyles { theme }
        div { class: "layout", "data-theme": theme.as_str(), lang,
            NavSidebar { page }
            main { class: "content",
                header { class: "header",
                    h1 { class: "header-title", "{heading}" }
                    SearchBar { placeholder: search_placeholder }
                }
            }
            ToastStack {}
            ChatbotPopup {}
        }
    }
}

#[component]
fn ThemeStyles(theme: ThemeMode) -> Element {
    let definition = theme_definition(theme);
    rsx! {
        style { dangerous_inner_html: "{definition.css}" }
    }
}
