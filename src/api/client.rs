use blogdesk_api_types::{Empty, Post, PostDraft};
use reqwest::{Client, Method, Response, Url, header};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ApiSettings;
use crate::infra::error::InfraError;

use super::error::ApiError;

/// Thin HTTP binding for the five posts endpoints.
///
/// Knows nothing about caching; see [`crate::application::blog::BlogApi`].
#[derive(Clone, Debug)]
pub struct PostsClient {
    client: Client,
    base: Url,
}

impl PostsClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, InfraError> {
        let mut builder = Client::builder().user_agent(settings.user_agent.as_str());
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;
        Ok(Self::with_client(client, settings.base_url.clone()))
    }

    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL, escaping each one.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::message(format!("base URL `{}` cannot hold a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.request(Method::GET, &["posts"], None::<&()>).await
    }

    pub async fn get_post(&self, id: &str) -> Result<Post, ApiError> {
        self.request(Method::GET, &["posts", id], None::<&()>).await
    }

    pub async fn add_post(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        self.request(Method::POST, &["posts"], Some(draft)).await
    }

    pub async fn update_post(&self, id: &str, body: &Post) -> Result<Post, ApiError> {
        self.request(Method::PUT, &["posts", id], Some(body)).await
    }

    pub async fn delete_post(&self, id: &str) -> Result<Empty, ApiError> {
        self.request(Method::DELETE, &["posts", id], None::<&()>)
            .await
    }

    #[instrument(level = "debug", skip(self, body), fields(base = %self.base))]
    async fn request<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(segments)?;
        let mut req = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await?;
        Self::handle(resp).await
    }

    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;
        debug!(status = status.as_u16(), len = bytes.len(), "posts api responded");

        if !status.is_success() {
            return Err(ApiError::from_status(status, decode_payload(&bytes)));
        }

        // DELETE answers `{}` but some servers send nothing at all.
        let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };
        serde_json::from_slice(bytes)
            .map_err(|e| ApiError::message(format!("failed to parse body: {e}")))
    }
}

fn decode_payload(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
