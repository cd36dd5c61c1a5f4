//! One editing session: the hydrated store with its two standard observers
//! (live preview and persistence) attached.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::info;

use crate::config::Config;
use crate::document::DocumentStore;
use crate::hydration::{standard_resolver, HydrationOrigin, Hydrated, NavigationContext};
use crate::persistence::{select_sink, LocalCache, PersistenceCoordinator, PersistenceSink};
use crate::remote::{Credential, ResumeServiceClient};
use crate::render::{LivePreview, RenderedDocument};

pub struct Session {
    /// Single writer: every mutation takes this lock, so edits apply in
    /// arrival order.
    pub store: Mutex<DocumentStore>,
    pub origin: HydrationOrigin,
    pub preview: watch::Receiver<Arc<RenderedDocument>>,
    pub persistence: PersistenceCoordinator,
    /// Opening address, fragment already consumed when hydration used it.
    pub navigation: NavigationContext,
}

impl Session {
    /// Hydrates the document, then wires the observers. Hydration finishes
    /// before the session exists, so no late hydration result can replace edits.
    pub async fn start(
        config: &Config,
        client: ResumeServiceClient,
        credential: Option<Credential>,
    ) -> Self {
        let mut navigation = NavigationContext::parse(
            config
                .open_url
                .as_deref()
                .unwrap_or(&format!("http://localhost:{}/", config.port)),
        );
        let cache = LocalCache::new(&config.cache_dir);

        let hydrated = standard_resolver(
            &mut navigation,
            client.clone(),
            credential.clone(),
            cache.clone(),
        )
        .resolve()
        .await;

        let sink = select_sink(credential, client, cache, config.warm_local_cache);
        info!(
            origin = %hydrated.origin,
            destination = sink.describe(),
            address = %navigation.address(),
            "Editing session ready"
        );
        Self::with_sink(hydrated, navigation, sink, config)
    }

    /// Wires a hydrated document to the live preview and to a coordinator
    /// persisting into `sink`.
    pub fn with_sink(
        hydrated: Hydrated,
        navigation: NavigationContext,
        sink: Arc<dyn PersistenceSink>,
        config: &Config,
    ) -> Self {
        let persistence = PersistenceCoordinator::new(
            sink,
            config.autosave_debounce,
            config.save_status_display,
        );
        Self::assemble(hydrated, navigation, persistence)
    }

    fn assemble(
        hydrated: Hydrated,
        navigation: NavigationContext,
        persistence: PersistenceCoordinator,
    ) -> Self {
        let mut store = DocumentStore::new(hydrated.model);
        let (live_preview, preview) = LivePreview::new(store.model());
        store.subscribe(Box::new(live_preview));
        store.subscribe(Box::new(persistence.clone()));

        Self {
            store: Mutex::new(store),
            origin: hydrated.origin,
            preview,
            persistence,
            navigation,
        }
    }

    /// Writes out any edit still waiting for its quiet window.
    pub async fn shutdown(&self) {
        if self.persistence.has_pending() {
            info!("Flushing pending draft before exit");
        }
        self.persistence.flush().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::{DocumentModel, ScalarField};
    use crate::persistence::LocalCacheSink;
    use crate::render::BlockKind;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(dir: &std::path::Path) -> Config {
        Config {
            cache_dir: dir.to_path_buf(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_guest_session_starts_from_cache_and_saves_only_locally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        let mut saved = DocumentModel::builtin();
        saved.name = Some("Cached Person".into());
        cache.save_document(&saved).unwrap();

        let config = config_for(dir.path());
        let client = ResumeServiceClient::new(&server.uri()).unwrap();
        let session = Session::start(&config, client, None).await;
        assert_eq!(session.origin, HydrationOrigin::LocalCache);
        assert_eq!(session.preview.borrow().header.name, "Cached Person");

        session
            .store
            .lock()
            .await
            .set_field(ScalarField::Name, "Edited Person");
        assert_eq!(session.preview.borrow().header.name, "Edited Person");

        session.shutdown().await;
        let stored = cache.load_document().unwrap().unwrap();
        assert_eq!(stored.name, Some(Some("Edited Person".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_are_previewed_immediately_and_saved_after_quiet_window() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        let config = config_for(dir.path());
        let hydrated = Hydrated {
            model: DocumentModel::builtin(),
            origin: HydrationOrigin::Defaults,
        };
        let session = Session::with_sink(
            hydrated,
            NavigationContext::default(),
            Arc::new(LocalCacheSink::new(cache.clone())),
            &config,
        );

        session.store.lock().await.set_skills("");
        assert!(session.preview.borrow().section(BlockKind::Skills).is_none());
        assert!(cache.load_document().unwrap().is_none());

        tokio::time::sleep(config.autosave_debounce + Duration::from_millis(10)).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        let stored = cache.load_document().unwrap().unwrap();
        assert_eq!(stored.skills, Some(Some(Vec::new())));
    }
}
