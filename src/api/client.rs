//! HTTP implementation of the notes gateway.
//!
//! Every call carries `Accept: application/json`, a JSON body when one is
//! sent, and a per-request deadline. Non-2xx responses are normalized into
//! `ApiError::RequestFailed` with the server's `detail`/`message` when the
//! body is JSON.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Response, Url};
use serde_json::Value;

use super::gateway::{ApiError, NotesApi, require_id};
use super::types::{Note, NoteId, NoteInput};

/// Deadline applied to each request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest-backed notes gateway.
pub struct HttpNotesClient {
    base_url: Url,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpNotesClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Root of the notes API, e.g. `http://localhost:3001`
    /// * `timeout` - Deadline for each request, from connect to end of body
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }
        info!("Notes API client targeting {} (timeout {:?})", base_url, timeout);
        Ok(Self {
            base_url,
            timeout,
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `<base>/notes` or `<base>/notes/<id>`, with the id encoded as
    /// a single path segment.
    fn endpoint(&self, id: Option<&NoteId>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::Config(format!("base URL '{}' cannot carry a path", self.base_url)))?;
            segments.pop_if_empty().push("notes");
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        Ok(url)
    }

    /// Sends one request and returns the parsed JSON body, if any.
    ///
    /// The body is only parsed when the response declares a JSON content
    /// type. A malformed JSON body reads as `None` rather than an error.
    async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<&NoteInput>,
    ) -> Result<Option<Value>, ApiError> {
        debug!("{} {}", method, url);

        let mut builder = self
            .client
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json")
            .timeout(self.timeout);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!("{} {} -> {}", method, url, status);

        let data = if declares_json(&response) {
            read_json(response).await?
        } else {
            None
        };

        if !status.is_success() {
            let message = server_message(data.as_ref())
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            warn!("Notes API error: {} {} - {} - {}", method, url, status, message);
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        Ok(data)
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        warn!("Notes API request timed out: {}", e);
        ApiError::Timeout
    } else {
        warn!("Notes API transport failure: {}", e);
        ApiError::Network(e.to_string())
    }
}

fn declares_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"))
}

async fn read_json(response: Response) -> Result<Option<Value>, ApiError> {
    match response.bytes().await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes).ok()),
        Err(e) if e.is_timeout() => Err(ApiError::Timeout),
        Err(e) => {
            debug!("Discarding unreadable response body: {}", e);
            Ok(None)
        }
    }
}

/// First non-empty string among the body's `detail` and `message` fields.
fn server_message(data: Option<&Value>) -> Option<String> {
    let data = data?;
    ["detail", "message"].iter().find_map(|key| {
        data.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn decode_note(data: Option<Value>) -> Result<Note, ApiError> {
    let value = data.ok_or_else(|| ApiError::Parse("expected a note in the response body".to_string()))?;
    serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

fn decode_list(data: Option<Value>) -> Result<Vec<Note>, ApiError> {
    match data {
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Note>(item) {
                Ok(note) => Some(note),
                Err(e) => {
                    warn!("Skipping list entry that is not a note: {}", e);
                    None
                }
            })
            .collect()),
        other => {
            debug!("List body was not an array ({:?}), treating as empty", other);
            Ok(Vec::new())
        }
    }
}

#[async_trait]
impl NotesApi for HttpNotesClient {
    async fn list(&self) -> Result<Vec<Note>, ApiError> {
        let url = self.endpoint(None)?;
        decode_list(self.request(Method::GET, url, None).await?)
    }

    async fn create(&self, input: &NoteInput) -> Result<Note, ApiError> {
        let url = self.endpoint(None)?;
        decode_note(self.request(Method::POST, url, Some(input)).await?)
    }

    async fn get(&self, id: &NoteId) -> Result<Note, ApiError> {
        let url = self.endpoint(Some(require_id(id)?))?;
        decode_note(self.request(Method::GET, url, None).await?)
    }

    async fn update(&self, id: &NoteId, input: &NoteInput) -> Result<Note, ApiError> {
        let url = self.endpoint(Some(require_id(id)?))?;
        decode_note(self.request(Method::PUT, url, Some(input)).await?)
    }

    async fn delete(&self, id: &NoteId) -> Result<bool, ApiError> {
        let url = self.endpoint(Some(require_id(id)?))?;
        self.request(Method::DELETE, url, None).await?;
        Ok(true)
    }
}
