use crate::app::AppContext;
use crate::search::Suggestions;
use dioxus::prelude::*;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[component]
pub fn SearchBar(placeholder: String) -> Element {
    let context = use_context::<AppContext>();
    let suggestions = use_signal(Suggestions::default);

    let poll_search = context.search.clone();
    use_future(move || {
        let search = poll_search.clone();
        let mut suggestions = suggestions;
        async move {
            loop {
                let next = search.suggestions();
                if *suggestions.peek() != next {
                    suggestions.set(next);
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
    });

    let input_search = context.search.clone();
    let current = suggestions();

    rsx! {
        div { class: "search-box",
            input {
                class: "form-control",
                r#type: "search",
                placeholder: "{placeholder}",
                oninput: move |ev| input_search.on_input(&ev.value()),
            }
            if current.loading {
                div { class: "search-status text-muted", "Searching..." }
            } else if current.failed {
                div { class: "search-status text-danger", "Search is unavailable right now." }
            } else if !current.hits.is_empty() {
                div { class: "search-suggestions",
                    for hit in current.hits.iter() {
                        a { key: "{hit.url}", class: "suggestion", href: "{hit.url}",
                            strong { "{hit.title}" }
                            small { "{hit.description}" }
                        }
                    }
                }
            }
        }
    }
}
