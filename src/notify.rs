//! Toasts, snackbars and flash alerts.
//!
//! Every notification owns a timer task: after its duration it switches to
//! [`Phase::Leaving`] (the fade-out) and is removed [`FADE_OUT`] later.
//! Pinned notifications skip the timer and wait for [`NotificationCenter::dismiss`].

use crate::types::{NotificationKind, NotificationStyle};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use time::OffsetDateTime;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);
pub const FLASH_DURATION: Duration = Duration::from_millis(5000);
pub const FADE_OUT: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Leaving,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub style: NotificationStyle,
    pub created_at: OffsetDateTime,
    pub duration: Option<Duration>,
    pub phase: Phase,
}

impl Notification {
    pub fn class(&self) -> String {
        let mut class = self.style.class_for(self.kind);
        if self.phase == Phase::Leaving {
            class.push_str(" fade-out");
        }
        class
    }
}

/// Everything needed to show one notification.
#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub kind: NotificationKind,
    pub style: NotificationStyle,
    /// `None` pins the notification until dismissed.
    pub duration: Option<Duration>,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
            style: NotificationStyle::default(),
            duration: Some(DEFAULT_DURATION),
        }
    }

    pub fn style(mut self, style: NotificationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn pinned(mut self) -> Self {
        self.duration = None;
        self
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    revision: u64,
    items: Vec<Notification>,
}

impl Registry {
    fn set_leaving(&mut self, id: NotificationId) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) if item.phase == Phase::Visible => {
                item.phase = Phase::Leaving;
                self.revision += 1;
                true
            }
            _ => false,
        }
    }

    fn remove(&mut self, id: NotificationId) {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() != before {
            self.revision += 1;
        }
    }
}

/// Shared handle to the visible notification set. Cheap to clone.
#[derive(Clone)]
pub struct NotificationCenter {
    registry: Arc<Mutex<Registry>>,
    default_duration: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

impl NotificationCenter {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            default_duration,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        self.show(Toast::new(message, kind).duration(self.default_duration))
    }

    /// Alert-style message that hides itself after five seconds.
    pub fn flash(&self, message: impl Into<String>) -> NotificationId {
        self.show(
            Toast::new(message, NotificationKind::Info)
                .style(NotificationStyle::Alert)
                .duration(FLASH_DURATION),
        )
    }

    /// Alert that stays until [`dismiss`](Self::dismiss) is called.
    pub fn pin(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        self.show(
            Toast::new(message, kind)
                .style(NotificationStyle::Alert)
                .pinned(),
        )
    }

    pub fn show(&self, toast: Toast) -> NotificationId {
        let id = {
            let mut registry = self.lock();
            registry.next_id += 1;
            let id = NotificationId(registry.next_id);
            registry.items.push(Notification {
                id,
                message: toast.message,
                kind: toast.kind,
                style: toast.style,
                created_at: OffsetDateTime::now_utc(),
                duration: toast.duration,
                phase: Phase::Visible,
            });
            registry.revision += 1;
            id
        };
        tracing::debug!(id = id.0, kind = toast.kind.as_str(), "notification shown");

        if let Some(duration) = toast.duration {
            let registry = Arc::downgrade(&self.registry);
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                let Some(shared) = registry.upgrade() else {
                    return;
                };
                let leaving = shared
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .set_leaving(id);
                drop(shared);
                // dismissed early: that call already owns the removal
                if leaving {
                    fade_and_remove(registry, id).await;
                }
            });
        }
        id
    }

    /// Starts the fade-out now. Returns false if the notification is already
    /// leaving or gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let leaving = self.lock().set_leaving(id);
        if leaving {
            tokio::spawn(fade_and_remove(Arc::downgrade(&self.registry), id));
        }
        leaving
    }

    pub fn visible(&self) -> Vec<Notification> {
        self.lock().items.clone()
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.lock().items.iter().any(|item| item.id == id)
    }

    pub fn revision(&self) -> u64 {
        self.lock().revision
    }
}

async fn fade_and_remove(registry: Weak<Mutex<Registry>>, id: NotificationId) {
    tokio::time::sleep(FADE_OUT).await;
    if let Some(registry) = registry.upgrade() {
        registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn notification_lives_for_its_duration_then_fades() {
        let center = NotificationCenter::default();
        let id = center.show(
            Toast::new("Saved", NotificationKind::Success).duration(Duration::from_millis(1000)),
        );

        advance(999).await;
        assert!(center.contains(id));
        assert_eq!(center.visible()[0].phase, Phase::Visible);

        advance(2).await;
        assert!(center.contains(id));
        assert_eq!(center.visible()[0].phase, Phase::Leaving);

        advance(FADE_OUT.as_millis() as u64).await;
        assert!(!center.contains(id));
    }

    #[tokio::test(start_paused = true)]
    async fn notifications_are_timed_independently() {
        let center = NotificationCenter::default();
        let short = center.show(
            Toast::new("one", NotificationKind::Info).duration(Duration::from_millis(100)),
        );
        let long = center.notify("two", NotificationKind::Warning);

        advance(500).await;
        assert!(!center.contains(short));
        assert!(center.contains(long));

        advance(3000).await;
        assert!(center.visible().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn pinned_alerts_wait_for_dismissal() {
        let center = NotificationCenter::default();
        let id = center.pin("New course material", NotificationKind::Info);
        advance(60_000).await;
        assert!(center.contains(id));

        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
        assert!(center.visible()[0].class().ends_with("fade-out"));
        advance(FADE_OUT.as_millis() as u64 + 1).await;
        assert!(!center.contains(id));
    }

    #[tokio::test(start_paused = true)]
    async fn early_dismissal_does_not_double_remove() {
        let center = NotificationCenter::default();
        let id = center.flash("Logged in");
        let other = center.notify("still here", NotificationKind::Info);
        assert!(center.dismiss(id));
        advance(400).await;
        assert!(!center.contains(id));
        assert!(center.contains(other));

        let revision = center.revision();
        advance(FLASH_DURATION.as_millis() as u64).await;
        // the flash timer finds nothing to do; only `other` moved on
        assert!(center.revision() > revision);
        assert!(center.visible().is_empty());
    }

    #[test]
    fn flash_uses_alert_style() {
        let toast = Toast::new("x", NotificationKind::Error)
            .style(NotificationStyle::Alert)
            .pinned();
        assert_eq!(toast.duration, None);
        assert_eq!(toast.style, NotificationStyle::Alert);
    }
}
