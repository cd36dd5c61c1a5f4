// Persistence: decides when (debounced) and where (remote store vs. local cache)
// the working draft is written, and publishes the save indicator.

pub mod cache;
pub mod coordinator;
pub mod scheduler;
pub mod status;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::document::model::DocumentModel;
use crate::remote::{Credential, RemoteError, ResumeServiceClient};

pub use cache::{CacheError, LocalCache};
pub use coordinator::PersistenceCoordinator;
pub use status::SaveStatus;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl PersistError {
    pub fn user_message(&self) -> String {
        match self {
            PersistError::Remote(e) => e.user_message(),
            PersistError::Cache(_) => "The draft could not be saved on this device.".to_string(),
        }
    }
}

/// Destination of a persistence attempt.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn persist(&self, model: &DocumentModel) -> Result<(), PersistError>;

    /// Short name used in logs.
    fn describe(&self) -> &'static str;
}

/// Guest sessions: the device cache is the only destination.
pub struct LocalCacheSink {
    cache: LocalCache,
}

impl LocalCacheSink {
    pub fn new(cache: LocalCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl PersistenceSink for LocalCacheSink {
    async fn persist(&self, model: &DocumentModel) -> Result<(), PersistError> {
        self.cache.save_document(model)?;
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "local-cache"
    }
}

/// Authenticated sessions: the full model is POSTed to the resume service.
/// With `warm_cache` set, the device cache is written too; its failures are
/// logged and never fail the attempt.
pub struct RemoteSink {
    client: ResumeServiceClient,
    credential: Credential,
    warm_cache: Option<LocalCache>,
}

impl RemoteSink {
    pub fn new(
        client: ResumeServiceClient,
        credential: Credential,
        warm_cache: Option<LocalCache>,
    ) -> Self {
        Self {
            client,
            credential,
            warm_cache,
        }
    }
}

#[async_trait]
impl PersistenceSink for RemoteSink {
    async fn persist(&self, model: &DocumentModel) -> Result<(), PersistError> {
        if let Some(cache) = &self.warm_cache {
            if let Err(e) = cache.save_document(model) {
                warn!("Warming the local cache failed: {e}");
            }
        }
        self.client.save_document(&self.credential, model).await?;
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "remote"
    }
}

/// Picks the destination for the session: remote when a credential is present,
/// the local cache otherwise.
pub fn select_sink(
    credential: Option<Credential>,
    client: ResumeServiceClient,
    cache: LocalCache,
    warm_local_cache: bool,
) -> Arc<dyn PersistenceSink> {
    match credential {
        Some(credential) => Arc::new(RemoteSink::new(
            client,
            credential,
            warm_local_cache.then_some(cache),
        )),
        None => Arc::new(LocalCacheSink::new(cache)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_guest_session_writes_local_cache_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        let client = ResumeServiceClient::new(&server.uri()).unwrap();
        let sink = select_sink(None, client, cache.clone(), true);
        assert_eq!(sink.describe(), "local-cache");

        sink.persist(&DocumentModel::builtin()).await.unwrap();
        assert!(cache.load_document().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_authenticated_session_skips_cache_unless_warming() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/me/resume"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let client = ResumeServiceClient::new(&server.uri()).unwrap();
        let credential = Credential::from_token(Some("tok"));

        let cold_dir = tempfile::tempdir().unwrap();
        let cold = LocalCache::new(cold_dir.path());
        let sink = select_sink(credential.clone(), client.clone(), cold.clone(), false);
        assert_eq!(sink.describe(), "remote");
        sink.persist(&DocumentModel::builtin()).await.unwrap();
        assert!(cold.load_document().unwrap().is_none());

        let warm_dir = tempfile::tempdir().unwrap();
        let warm = LocalCache::new(warm_dir.path());
        let sink = select_sink(credential, client, warm.clone(), true);
        sink.persist(&DocumentModel::builtin()).await.unwrap();
        assert!(warm.load_document().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_remote_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({"detail": "Token expired"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = ResumeServiceClient::new(&server.uri()).unwrap();
        let sink = select_sink(
            Credential::from_token(Some("tok")),
            client,
            LocalCache::new(dir.path()),
            false,
        );
        let err = sink.persist(&DocumentModel::builtin()).await.unwrap_err();
        assert_eq!(err.user_message(), "Token expired");
    }
}
