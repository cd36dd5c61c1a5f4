//! Analysis trigger: sends the experience text to the resume service and
//! writes the generated summary back through the store.

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::document::model::DocumentModel;
use crate::document::store::{ChangeEvent, DocumentStore};
use crate::remote::{Credential, RemoteError, ResumeServiceClient};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Add some experience before requesting an analysis.")]
    NoExperience,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl AnalysisError {
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::NoExperience => self.to_string(),
            AnalysisError::Remote(e) => e.user_message(),
        }
    }
}

/// Role, company and details of every experience record, one record per line.
/// `None` when there is nothing to analyse.
pub fn analysis_payload(model: &DocumentModel) -> Option<String> {
    let text = model
        .experience
        .iter()
        .map(|entry| {
            [&entry.role, &entry.company, &entry.details]
                .into_iter()
                .map(|part| part.trim())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    (!text.is_empty()).then_some(text)
}

/// The store is not locked while the request is in flight; edits made
/// meanwhile are kept and only `summary` / `analysisResults` are replaced.
/// On failure the document is left untouched.
pub async fn run_analysis(
    store: &Mutex<DocumentStore>,
    client: &ResumeServiceClient,
    credential: Option<&Credential>,
) -> Result<ChangeEvent, AnalysisError> {
    let text = analysis_payload(store.lock().await.model()).ok_or(AnalysisError::NoExperience)?;

    info!(chars = text.len(), "Requesting analysis");
    let (summary, results) = client.analyze(credential, &text).await?.into_parts();

    Ok(store.lock().await.apply_analysis(summary, results))
}
