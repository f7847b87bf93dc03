//! Progress indicator for a single file upload.

use crate::api::{ProgressFn, UploadBackend, UploadFile};
use crate::notify::NotificationCenter;
use crate::types::NotificationKind;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading {
        file_name: String,
        sent: u64,
        total: u64,
    },
    Succeeded {
        file_name: String,
    },
    Failed {
        file_name: String,
        reason: String,
    },
}

impl UploadState {
    /// Whole percent for the progress bar; finished uploads report 100.
    pub fn percent(&self) -> u8 {
        match self {
            UploadState::Idle | UploadState::Failed { .. } => 0,
            UploadState::Succeeded { .. } => 100,
            UploadState::Uploading { total: 0, .. } => 100,
            UploadState::Uploading { sent, total, .. } => {
                ((*sent).min(*total) * 100 / total) as u8
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, UploadState::Uploading { .. })
    }
}

pub struct UploadIndicator {
    state: Arc<Mutex<UploadState>>,
    backend: Arc<dyn UploadBackend>,
    notifications: NotificationCenter,
}

impl UploadIndicator {
    pub fn new(backend: Arc<dyn UploadBackend>, notifications: NotificationCenter) -> Self {
        Self {
            state: Arc::new(Mutex::new(UploadState::Idle)),
            backend,
            notifications,
        }
    }

    fn lock(&self) -> MutexGuard<'_, UploadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> UploadState {
        self.lock().clone()
    }

    /// Starts the upload unless one is already running.
    pub fn start(&self, file: UploadFile) -> Option<JoinHandle<()>> {
        let file_name = file.name.clone();
        {
            let mut state = self.lock();
            if state.is_busy() {
                tracing::debug!(file = %file_name, "upload already in progress");
                return None;
            }
            *state = UploadState::Uploading {
                file_name: file_name.clone(),
                sent: 0,
                total: file.len(),
            };
        }

        let progress_state = Arc::clone(&self.state);
        let progress: ProgressFn = Arc::new(move |bytes| {
            let mut state = progress_state
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let UploadState::Uploading { sent, .. } = &mut *state {
                *sent = bytes;
            }
        });

        let backend = Arc::clone(&self.backend);
        let shared = Arc::clone(&self.state);
        let notifications = self.notifications.clone();
        Some(tokio::spawn(async move {
            let outcome = backend.upload(file, progress).await;
            let next = match outcome {
                Ok(()) => {
                    notifications.notify("File uploaded successfully", NotificationKind::Success);
                    UploadState::Succeeded { file_name }
                }
                Err(err) => {
                    tracing::warn!(error = %err, file = %file_name, "upload failed");
                    notifications.notify(format!("Upload failed: {err}"), NotificationKind::Error);
                    UploadState::Failed {
                        file_name,
                        reason: err.to_string(),
                    }
                }
            };
            *shared.lock().unwrap_or_else(PoisonError::into_inner) = next;
        }))
    }

    pub fn reset(&self) {
        let mut state = self.lock();
        if !state.is_busy() {
            *state = UploadState::Idle;
        }
    }
}
