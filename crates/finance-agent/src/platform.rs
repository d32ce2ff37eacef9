//! Hosted platform client
//!
//! Thin wrappers over the platform's HTTP APIs:
//! - auth: password sign-in, returns a bearer token held in memory
//! - rest: read-only queries on financial_data and the chat tables
//! - functions: ask, upload, list-documents, delete-document
//!
//! Every call after sign-in sends both the anon key (`apikey`) and the user's
//! bearer token.

use finance_core::FinancialRecord;
use reqwest::{Method, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::chat::{AskResponse, ChatMessage, ChatSession};
use crate::constants;
use crate::documents::{self, Document, DocumentList, UploadResponse};

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("No active session. Set {} or configure [auth] email and password.", constants::ENV_ACCESS_TOKEN)]
    NoSession,

    #[error("{message} (HTTP {status})")]
    Http { status: u16, message: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The call succeeded at HTTP level but the function reported failure
    #[error("{0}")]
    Rejected(String),

    #[error("{}: {reason}", .path.display())]
    InvalidUpload { path: PathBuf, reason: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Signed-in session (never written to disk)
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
    pub id: String,
}

/// Platform API client
pub struct PlatformClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

/// Mask a secret for logging, keeping a short prefix
fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{}****", prefix)
}

impl PlatformClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn has_session(&self) -> bool {
        self.access_token.is_some()
    }

    fn token(&self) -> Result<&str> {
        self.access_token.as_deref().ok_or(PlatformError::NoSession)
    }

    fn request(&self, method: Method, url: &str) -> Result<reqwest::RequestBuilder> {
        let token = self.token()?;
        tracing::debug!(%method, url, apikey = %mask_secret(&self.anon_key), "platform request");
        Ok(self
            .client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", token)))
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange email/password for an access token and keep it for later calls
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}{}", self.base_url, constants::AUTH_TOKEN_PATH);
        tracing::debug!(url, email, "signing in");

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let session: Session = decode("sign-in", response).await?;
        self.access_token = Some(session.access_token.clone());
        Ok(session)
    }

    // =========================================================================
    // Database (read-only)
    // =========================================================================

    async fn rest_get<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}/{}", self.base_url, constants::REST_PREFIX, table);
        let response = self
            .request(Method::GET, &url)?
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await?;
        decode(table, response).await
    }

    /// Latest financial rows, newest date first
    pub async fn fetch_financial_data(&self, limit: usize) -> Result<Vec<FinancialRecord>> {
        let query = [
            ("select", "*".to_string()),
            ("order", "date.desc".to_string()),
            ("limit", limit.to_string()),
        ];
        let records: Vec<FinancialRecord> =
            self.rest_get(constants::FINANCIAL_DATA_TABLE, &query).await?;
        tracing::debug!(count = records.len(), "fetched financial data");
        Ok(records)
    }

    /// Most recently updated chat session, if any
    pub async fn latest_chat_session(&self) -> Result<Option<ChatSession>> {
        let query = [
            ("select", "*".to_string()),
            ("order", "updated_at.desc".to_string()),
            ("limit", "1".to_string()),
        ];
        let sessions: Vec<ChatSession> =
            self.rest_get(constants::CHAT_SESSIONS_TABLE, &query).await?;
        Ok(sessions.into_iter().next())
    }

    /// Messages of one session, oldest first
    pub async fn chat_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        let query = [
            ("select", "*".to_string()),
            ("session_id", format!("eq.{}", session_id)),
            ("order", "created_at.asc".to_string()),
        ];
        self.rest_get(constants::CHAT_MESSAGES_TABLE, &query).await
    }

    // =========================================================================
    // Edge functions
    // =========================================================================

    fn function_url(&self, name: &str) -> String {
        format!("{}{}/{}", self.base_url, constants::FUNCTIONS_PREFIX, name)
    }

    /// Call an edge function with an optional JSON body
    pub async fn call_edge_function<T: DeserializeOwned>(
        &self,
        name: &str,
        method: Method,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        let url = self.function_url(name);
        let mut request = self.request(method, &url)?;
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        decode(name, request.send().await?).await
    }

    pub async fn ask(&self, message: &str, session_id: Option<&str>) -> Result<AskResponse> {
        let body = serde_json::json!({ "message": message, "sessionId": session_id });
        self.call_edge_function(constants::FN_ASK, Method::POST, &[], Some(&body))
            .await
    }

    pub async fn list_documents(&self, limit: usize, offset: usize) -> Result<Vec<Document>> {
        let query = [("limit", limit.to_string()), ("offset", offset.to_string())];
        let list: DocumentList = self
            .call_edge_function(constants::FN_LIST_DOCUMENTS, Method::GET, &query, None)
            .await?;
        Ok(list.documents)
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<serde_json::Value> {
        let body = serde_json::json!({ "documentId": document_id });
        self.call_edge_function(constants::FN_DELETE_DOCUMENT, Method::POST, &[], Some(&body))
            .await
    }

    /// Validate and upload one file as multipart field `file`
    pub async fn upload_document(&self, path: &Path) -> Result<Document> {
        let io_err = |source| PlatformError::Io {
            path: path.to_path_buf(),
            source,
        };

        let size = tokio::fs::metadata(path).await.map_err(io_err)?.len();
        let content_type = documents::validate_upload(path, size)?;
        let bytes = tokio::fs::read(path).await.map_err(io_err)?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = self.function_url(constants::FN_UPLOAD);
        let response = self.request(Method::POST, &url)?.multipart(form).send().await?;
        let upload: UploadResponse = decode(constants::FN_UPLOAD, response).await?;

        match upload {
            UploadResponse {
                success: true,
                document: Some(document),
                ..
            } => Ok(document),
            UploadResponse { error, .. } => Err(PlatformError::Rejected(
                error.unwrap_or_else(|| "Upload failed - no document returned".to_string()),
            )),
        }
    }
}

/// Decode a JSON body, turning non-2xx responses into `PlatformError::Http`
async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = error_message(&text)
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_else(|| format!("Failed to call {}", endpoint));
        return Err(PlatformError::Http {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&text).map_err(|source| PlatformError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Pull a message out of an error body. Descriptions win over bare error
/// codes: `error_description`, `msg`, `message`, then `error`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error_description", "msg", "message", "error"]
        .iter()
        .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
        .find(|m| !m.is_empty())
        .map(String::from)
}
