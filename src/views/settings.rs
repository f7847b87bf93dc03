use crate::app::AppContext;
use crate::page::Page;
use crate::types::Language;
use dioxus::prelude::*;

/// Navigation sidebar rendered from the page model, with the language
/// selector the theme manager injected and the theme toggle.
#[component]
pub fn NavSidebar(page: Signal<Page>) -> Element {
    let mut page = page;
    let context = use_context::<AppContext>();
    let snapshot = page();
    let Some(sidebar) = snapshot.sidebar.clone() else {
        return rsx! {};
    };
    let icon = snapshot.theme_icon.clone().unwrap_or_default();
    let language_context = context.clone();
    let theme_context = context.clone();

    rsx! {
        nav { class: "sidebar",
            ul { class: "nav flex-column",
                for (index, item) in sidebar.items.iter().enumerate() {
                    li { key: "{index}", class: "nav-item",
                        span { class: "nav-link", "{item.rendered()}" }
                    }
                }
            }
            button {
                class: "theme-toggle-btn", r#type: "button", title: "Toggle theme",
                onclick: move |_| {
                    theme_context.toggle_theme();
                    page.set(theme_context.page());
                },
                i { class: "fas fa-{icon}" }
            }
            if let Some(selector) = sidebar.language_selector() {
                div { class: "p-3 border-top",
                    small { class: "text-muted d-block mb-2", "Language" }
                    select {
                        class: "form-select form-select-sm",
                        id: "langSelector",
                        onchange: move |ev| {
                            language_context.set_language_code(&ev.value());
                            page.set(language_context.page());
                        },
                        for lang in selector.options.iter().copied() {
                            LanguageOption { lang, selected: lang == selector.selected }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn LanguageOption(lang: Language, selected: bool) -> Element {
    rsx! {
        option { value: lang.code(), selected, "{lang.label()}" }
    }
}
