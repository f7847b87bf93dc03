use super::{
    ApiError, ApiResult, ChatBackend, ChatReply, ProgressFn, SaveBackend, SearchBackend,
    UploadBackend, UploadFile,
};
use crate::types::SearchHit;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Url};
use serde::Serialize;

const UPLOAD_CHUNK: usize = 16 * 1024;
pub const DEFAULT_AUTOSAVE_PATH: &str = "/autosave";

/// reqwest-backed client for the CMS endpoints.
#[derive(Clone, Debug)]
pub struct CmsClient {
    http: Client,
    base: Url,
    autosave_path: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

impl CmsClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let mut base =
            Url::parse(base_url).map_err(|err| ApiError::Url(format!("{base_url}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Url(base_url.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base,
            autosave_path: DEFAULT_AUTOSAVE_PATH.to_string(),
        })
    }

    pub fn with_autosave_path(mut self, path: impl Into<String>) -> Self {
        self.autosave_path = path.into();
        self
    }

    pub fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::Url(format!("{path}: {err}")))
    }
}

/// Parses the chat reply body. Missing `response` is not an error.
pub fn parse_chat_reply(body: &str) -> Result<ChatReply, serde_json::Error> {
    serde_json::from_str(body)
}

pub fn parse_search_hits(body: &str) -> Result<Vec<SearchHit>, serde_json::Error> {
    serde_json::from_str(body)
}

#[async_trait]
impl ChatBackend for CmsClient {
    async fn ask(&self, message: &str) -> ApiResult<ChatReply> {
        let url = self.endpoint("/chatbot")?;
        tracing::debug!(%url, "sending chat message");
        // status is not consulted: error pages still carry a `response`
        let response = self
            .http
            .post(url)
            .json(&ChatRequest { message })
            .send()
            .await?;
        let body = response.text().await?;
        Ok(parse_chat_reply(&body)?)
    }
}

#[async_trait]
impl SearchBackend for CmsClient {
    async fn search(&self, query: &str) -> ApiResult<Vec<SearchHit>> {
        let url = self.endpoint("/search")?;
        tracing::debug!(%url, query, "searching");
        let response = self.http.get(url).query(&[("q", query)]).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        Ok(parse_search_hits(&body)?)
    }
}

#[async_trait]
impl UploadBackend for CmsClient {
    async fn upload(&self, file: UploadFile, progress: ProgressFn) -> ApiResult<()> {
        let url = self.endpoint("/upload")?;
        let total = file.len();
        tracing::debug!(%url, name = %file.name, total, "uploading file");

        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = file
            .bytes
            .chunks(UPLOAD_CHUNK)
            .map(|chunk| Ok(chunk.to_vec()))
            .collect();
        let mut sent = 0u64;
        let stream = futures::stream::iter(chunks).inspect(move |chunk| {
            if let Ok(chunk) = chunk {
                sent += chunk.len() as u64;
                progress(sent);
            }
        });
        let part = Part::stream_with_length(Body::wrap_stream(stream), total).file_name(file.name);
        let form = Form::new().part("file", part);

        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl SaveBackend for CmsClient {
    async fn save_form(&self, fields: &[(String, String)]) -> ApiResult<()> {
        let url = self.endpoint(&self.autosave_path)?;
        tracing::debug!(%url, fields = fields.len(), "auto-saving form");
        let response = self.http.post(url).form(fields).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
            })
        }
    }
}
