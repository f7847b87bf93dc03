use crate::app::AppContext;
use crate::notify::Notification;
use dioxus::prelude::*;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[component]
pub fn ToastStack() -> Element {
    let context = use_context::<AppContext>();
    let visible = use_signal(Vec::<Notification>::new);

    let center = context.notifications.clone();
    use_future(move || {
        let center = center.clone();
        let mut visible = visible;
        async move {
            let mut seen = u64::MAX;
            loop {
                let revision = center.revision();
                if revision != seen {
                    seen = revision;
                    visible.set(center.visible());
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
    });

    rsx! {
        div { class: "toast-stack", aria_live: "polite",
            for item in visible().into_iter() {
                Toast { key: "{item.id.0}", item }
            }
        }
    }
}

#[component]
fn Toast(item: Notification) -> Element {
    let context = use_context::<AppContext>();
    let id = item.id;
    let pinned = item.duration.is_none();
    rsx! {
        div { class: "{item.class()}", role: "alert",
            i { class: "fas fa-{item.kind.icon()}" }
            span { " {item.message}" }
            if pinned {
                button {
                    class: "btn-close", r#type: "button", title: "Dismiss",
                    onclick: move |_| {
                        context.notifications.dismiss(id);
                    },
                }
            }
        }
    }
}
