//! Remote Service Client — the single point of entry for the resume service
//! (persisted document + analysis).
//!
//! Persistence calls always carry a bearer credential; guest sessions never
//! construct them. Every call fails with a [`RemoteError`]; callers decide
//! whether that is fatal (it never is for hydration or autosave).

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::document::model::{AnalysisResults, DocumentModel};
use crate::document::partial::PartialDocument;

const DOCUMENT_PATH: &str = "/users/me/resume";
const ANALYZE_PATH: &str = "/analyze";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Message used when an error response carries no readable `detail`.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RemoteError {
    /// Human-readable message suitable for the status indicator or a notice.
    pub fn user_message(&self) -> String {
        match self {
            RemoteError::Api { message, .. } => message.clone(),
            RemoteError::Http(_) => "The resume service could not be reached.".to_string(),
            RemoteError::Parse(_) => "The resume service sent an unreadable response.".to_string(),
        }
    }
}

/// Bearer credential of an authenticated session. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for a missing or blank token (guest session).
    pub fn from_token(token: Option<&str>) -> Option<Self> {
        token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| Self(t.to_string()))
    }

    fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// Body of a successful analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub summary: String,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub suggested_verbs: Vec<String>,
}

impl AnalysisResponse {
    pub fn into_parts(self) -> (String, AnalysisResults) {
        (
            self.summary,
            AnalysisResults {
                missing_keywords: self.missing_keywords,
                suggested_verbs: self.suggested_verbs,
            },
        )
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Extracts the `detail` string of an error body, or [`UNKNOWN_ERROR`].
pub fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .and_then(|d| d.as_str().map(str::to_string))
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

#[derive(Clone)]
pub struct ResumeServiceClient {
    client: Client,
    base_url: String,
}

impl ResumeServiceClient {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET the user's saved document. `Ok(None)` when nothing is stored.
    pub async fn fetch_document(
        &self,
        credential: &Credential,
    ) -> Result<Option<PartialDocument>, RemoteError> {
        let response = self
            .client
            .get(self.url(DOCUMENT_PATH))
            .bearer_auth(credential.token())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
            debug!("Remote store holds no document (status {status})");
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: error_detail(&body),
            });
        }

        let body = body.trim();
        if body.is_empty() || body == "null" {
            return Ok(None);
        }
        Ok(Some(PartialDocument::from_json(body)?))
    }

    /// POST the full model, overwriting the stored copy.
    pub async fn save_document(
        &self,
        credential: &Credential,
        model: &DocumentModel,
    ) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(self.url(DOCUMENT_PATH))
            .bearer_auth(credential.token())
            .json(model)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: error_detail(&body),
            });
        }
        Ok(())
    }

    /// Sends the experience text for analysis and returns the generated summary.
    pub async fn analyze(
        &self,
        credential: Option<&Credential>,
        text: &str,
    ) -> Result<AnalysisResponse, RemoteError> {
        let mut request = self
            .client
            .post(self.url(ANALYZE_PATH))
            .json(&AnalyzeRequest { text });
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.token());
        }
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: error_detail(&body),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}
