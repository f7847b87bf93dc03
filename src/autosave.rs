use crate::api::SaveBackend;
use crate::debounce::Debouncer;
use crate::notify::NotificationCenter;
use crate::types::NotificationKind;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

const SAVED_AT_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour padding:zero]:[minute padding:zero]:[second padding:zero]");

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SaveStatus {
    #[default]
    Idle,
    /// Changes are waiting for the debounce window to close.
    Pending,
    Saving,
    Saved {
        at: OffsetDateTime,
    },
    Failed {
        reason: String,
    },
}

impl SaveStatus {
    pub fn label(&self) -> String {
        match self {
            SaveStatus::Idle => String::new(),
            SaveStatus::Pending => "Unsaved changes".to_string(),
            SaveStatus::Saving => "Saving...".to_string(),
            SaveStatus::Saved { at } => {
                let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
                let time = at
                    .to_offset(offset)
                    .format(SAVED_AT_FORMAT)
                    .unwrap_or_default();
                format!("Saved at {time}")
            }
            SaveStatus::Failed { .. } => "Auto-save failed".to_string(),
        }
    }
}

/// Debounced draft saving for a single form.
pub struct AutoSaver {
    status: Arc<Mutex<SaveStatus>>,
    debouncer: Debouncer<Vec<(String, String)>>,
}

impl AutoSaver {
    pub fn new(
        backend: Arc<dyn SaveBackend>,
        notifications: NotificationCenter,
        wait: Duration,
    ) -> Self {
        let status = Arc::new(Mutex::new(SaveStatus::Idle));
        let shared = Arc::clone(&status);
        let debouncer = Debouncer::new(wait, move |fields: Vec<(String, String)>| {
            let backend = Arc::clone(&backend);
            let shared = Arc::clone(&shared);
            let notifications = notifications.clone();
            async move {
                set(&shared, SaveStatus::Saving);
                match backend.save_form(&fields).await {
                    Ok(()) => set(
                        &shared,
                        SaveStatus::Saved {
                            at: OffsetDateTime::now_utc(),
                        },
                    ),
                    Err(err) => {
                        tracing::warn!(error = %err, "auto-save failed");
                        notifications.notify("Auto-save failed", NotificationKind::Error);
                        set(
                            &shared,
                            SaveStatus::Failed {
                                reason: err.to_string(),
                            },
                        );
                    }
                }
            }
        });
        Self { status, debouncer }
    }

    fn lock(&self) -> MutexGuard<'_, SaveStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn on_change(&self, fields: Vec<(String, String)>) {
        *self.lock() = SaveStatus::Pending;
        self.debouncer.call(fields);
    }

    pub fn status(&self) -> SaveStatus {
        self.lock().clone()
    }
}

fn set(status: &Mutex<SaveStatus>, next: SaveStatus) {
    *status.lock().unwrap_or_else(PoisonError::into_inner) = next;
}
