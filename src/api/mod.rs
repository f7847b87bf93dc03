//! HTTP seams for the widgets.
//!
//! Widgets never talk to reqwest directly; they hold one of the backend
//! traits below. [`CmsClient`] implements all of them against a running CMS,
//! tests implement them with canned replies.
//!
//! # Usage
//!
//! ```rust,no_run
//! use cms_widgets::api::{ChatBackend, CmsClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = CmsClient::new("http://127.0.0.1:5000")?;
//! let reply = client.ask("When is the quiz?").await?;
//! println!("{:?}", reply.response);
//! # Ok(())
//! # }
//! ```

mod client;

pub use client::{CmsClient, DEFAULT_AUTOSAVE_PATH, parse_chat_reply, parse_search_hits};

use crate::types::SearchHit;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {status}")]
    Status { status: u16 },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint url: {0}")]
    Url(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Reply of `POST /chatbot`. The `response` field is optional on the wire.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}

/// A file picked for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Receives the running total of bytes handed to the transport.
pub type ProgressFn = Arc<dyn Fn(u64) + Send + Sync>;

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn ask(&self, message: &str) -> ApiResult<ChatReply>;
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> ApiResult<Vec<SearchHit>>;
}

#[async_trait]
pub trait UploadBackend: Send + Sync {
    async fn upload(&self, file: UploadFile, progress: ProgressFn) -> ApiResult<()>;
}

#[async_trait]
pub trait SaveBackend: Send + Sync {
    async fn save_form(&self, fields: &[(String, String)]) -> ApiResult<()>;
}
