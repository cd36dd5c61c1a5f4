//! Hydration Resolver — builds the session's initial document from an ordered
//! list of sources. The first source that yields a document wins; it is laid
//! over the built-in defaults. No source can fail the resolver: a source that
//! errors is logged and treated as absent.
//!
//! Hydration runs once, before the session accepts edits.

pub mod share_link;
pub mod strategies;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::document::model::DocumentModel;
use crate::document::partial::PartialDocument;
use crate::persistence::cache::LocalCache;
use crate::remote::{Credential, ResumeServiceClient};

pub use share_link::NavigationContext;
pub use strategies::{LocalCacheStrategy, RemoteCopyStrategy, ShareLinkStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HydrationOrigin {
    ShareLink,
    Remote,
    LocalCache,
    Defaults,
}

impl HydrationOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            HydrationOrigin::ShareLink => "share_link",
            HydrationOrigin::Remote => "remote",
            HydrationOrigin::LocalCache => "local_cache",
            HydrationOrigin::Defaults => "defaults",
        }
    }
}

impl fmt::Display for HydrationOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One hydration source. `None` means "nothing here, try the next one".
#[async_trait]
pub trait HydrationStrategy: Send {
    fn origin(&self) -> HydrationOrigin;

    async fn attempt(&mut self) -> Option<PartialDocument>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hydrated {
    pub model: DocumentModel,
    pub origin: HydrationOrigin,
}

pub struct HydrationResolver<'a> {
    defaults: DocumentModel,
    strategies: Vec<Box<dyn HydrationStrategy + 'a>>,
}

impl<'a> HydrationResolver<'a> {
    pub fn new(defaults: DocumentModel) -> Self {
        Self {
            defaults,
            strategies: Vec::new(),
        }
    }

    pub fn then(mut self, strategy: impl HydrationStrategy + 'a) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub async fn resolve(self) -> Hydrated {
        let HydrationResolver {
            defaults,
            strategies,
        } = self;

        for mut strategy in strategies {
            let origin = strategy.origin();
            match strategy.attempt().await {
                Some(partial) => {
                    info!(%origin, "Document hydrated");
                    return Hydrated {
                        model: partial.merge_over(defaults),
                        origin,
                    };
                }
                None => debug!(%origin, "Hydration source yielded nothing"),
            }
        }

        info!("Starting from the built-in document");
        Hydrated {
            model: defaults,
            origin: HydrationOrigin::Defaults,
        }
    }
}

/// Share link, then the remote copy, then the local cache, then defaults.
pub fn standard_resolver<'a>(
    navigation: &'a mut NavigationContext,
    client: ResumeServiceClient,
    credential: Option<Credential>,
    cache: LocalCache,
) -> HydrationResolver<'a> {
    HydrationResolver::new(DocumentModel::builtin())
        .then(ShareLinkStrategy::new(navigation))
        .then(RemoteCopyStrategy::new(client, credential))
        .then(LocalCacheStrategy::new(cache))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydration::share_link::encode_share_payload;
    use crate::persistence::cache::STORAGE_KEY;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn remote_with(body: serde_json::Value, expected_calls: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(expected_calls)
            .mount(&server)
            .await;
        server
    }

    fn shared(model: &DocumentModel) -> NavigationContext {
        let fragment = encode_share_payload(model).unwrap();
        NavigationContext::parse(&format!("https://cv.example/builder#{fragment}"))
    }

    #[tokio::test]
    async fn test_share_link_wins_and_remote_is_never_queried() {
        let server = remote_with(serde_json::json!({"name": "Remote"}), 0).await;
        let dir = tempfile::tempdir().unwrap();

        let mut payload = DocumentModel::builtin();
        payload.name = Some("Shared Person".to_string());
        payload.experience.clear();
        let mut nav = shared(&payload);

        let hydrated = standard_resolver(
            &mut nav,
            ResumeServiceClient::new(&server.uri()).unwrap(),
            Credential::from_token(Some("tok")),
            LocalCache::new(dir.path()),
        )
        .resolve()
        .await;

        assert_eq!(hydrated.origin, HydrationOrigin::ShareLink);
        assert_eq!(hydrated.model, payload);
        assert_eq!(nav.fragment(), None);
        assert_eq!(nav.address(), "https://cv.example/builder");
    }

    #[tokio::test]
    async fn test_partial_share_link_keeps_defaults_for_absent_fields() {
        let fragment = urlencoding::encode(r#"{"title":"Principal Engineer","projects":null}"#)
            .into_owned();
        let mut nav = NavigationContext::parse(&format!("https://cv.example/#{fragment}"));
        let dir = tempfile::tempdir().unwrap();

        let hydrated = standard_resolver(
            &mut nav,
            ResumeServiceClient::new("http://127.0.0.1:9").unwrap(),
            None,
            LocalCache::new(dir.path()),
        )
        .resolve()
        .await;

        let mut expected = DocumentModel::builtin();
        expected.title = Some("Principal Engineer".to_string());
        expected.projects = Vec::new();
        assert_eq!(hydrated.origin, HydrationOrigin::ShareLink);
        assert_eq!(hydrated.model, expected);
    }

    #[tokio::test]
    async fn test_bad_share_link_falls_through_to_remote() {
        let server = remote_with(serde_json::json!({"name": "Remote Person"}), 1).await;
        let dir = tempfile::tempdir().unwrap();
        let mut nav = NavigationContext::parse("https://cv.example/#garbage!!");

        let hydrated = standard_resolver(
            &mut nav,
            ResumeServiceClient::new(&server.uri()).unwrap(),
            Credential::from_token(Some("tok")),
            LocalCache::new(dir.path()),
        )
        .resolve()
        .await;

        assert_eq!(hydrated.origin, HydrationOrigin::Remote);
        assert_eq!(hydrated.model.name.as_deref(), Some("Remote Person"));
        assert_eq!(hydrated.model.title, DocumentModel::builtin().title);
        assert_eq!(nav.fragment(), Some("garbage!!"));
    }

    #[tokio::test]
    async fn test_remote_failure_falls_through_to_local_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        let mut saved = DocumentModel::builtin();
        saved.summary = None;
        cache.save_document(&saved).unwrap();

        let mut nav = NavigationContext::default();
        let hydrated = standard_resolver(
            &mut nav,
            ResumeServiceClient::new(&server.uri()).unwrap(),
            Credential::from_token(Some("tok")),
            cache,
        )
        .resolve()
        .await;

        assert_eq!(hydrated.origin, HydrationOrigin::LocalCache);
        assert_eq!(hydrated.model, saved);
    }

    #[tokio::test]
    async fn test_corrupt_cache_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        cache.write(STORAGE_KEY, "[[[").unwrap();

        let mut nav = NavigationContext::default();
        let hydrated = standard_resolver(
            &mut nav,
            ResumeServiceClient::new("http://127.0.0.1:9").unwrap(),
            None,
            cache,
        )
        .resolve()
        .await;

        assert_eq!(hydrated.origin, HydrationOrigin::Defaults);
        assert_eq!(hydrated.model, DocumentModel::builtin());
    }
}
