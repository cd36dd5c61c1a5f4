//! The standard hydration sources, in priority order.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::document::partial::PartialDocument;
use crate::hydration::share_link::{decode_share_payload, NavigationContext};
use crate::hydration::{HydrationOrigin, HydrationStrategy};
use crate::persistence::cache::LocalCache;
use crate::remote::{Credential, ResumeServiceClient};

/// Payload in the `#fragment` of the opening address. The fragment is cleared
/// only when it parses; a bad payload is left alone and skipped.
pub struct ShareLinkStrategy<'a> {
    navigation: &'a mut NavigationContext,
}

impl<'a> ShareLinkStrategy<'a> {
    pub fn new(navigation: &'a mut NavigationContext) -> Self {
        Self { navigation }
    }
}

#[async_trait]
impl<'a> HydrationStrategy for ShareLinkStrategy<'a> {
    fn origin(&self) -> HydrationOrigin {
        HydrationOrigin::ShareLink
    }

    async fn attempt(&mut self) -> Option<PartialDocument> {
        let fragment = self.navigation.fragment()?;
        match decode_share_payload(fragment) {
            Ok(partial) => {
                self.navigation.clear_fragment();
                Some(partial)
            }
            Err(e) => {
                warn!("Ignoring unreadable share link: {e}");
                None
            }
        }
    }
}

/// The copy saved on the resume service. Guests never issue the request.
pub struct RemoteCopyStrategy {
    client: ResumeServiceClient,
    credential: Option<Credential>,
}

impl RemoteCopyStrategy {
    pub fn new(client: ResumeServiceClient, credential: Option<Credential>) -> Self {
        Self { client, credential }
    }
}

#[async_trait]
impl HydrationStrategy for RemoteCopyStrategy {
    fn origin(&self) -> HydrationOrigin {
        HydrationOrigin::Remote
    }

    async fn attempt(&mut self) -> Option<PartialDocument> {
        let Some(credential) = &self.credential else {
            debug!("Guest session, remote copy skipped");
            return None;
        };
        match self.client.fetch_document(credential).await {
            Ok(Some(partial)) => Some(partial),
            Ok(None) => {
                debug!("No document stored remotely");
                None
            }
            Err(e) => {
                warn!("Loading the remote copy failed: {e}");
                None
            }
        }
    }
}

pub struct LocalCacheStrategy {
    cache: LocalCache,
}

impl LocalCacheStrategy {
    pub fn new(cache: LocalCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl HydrationStrategy for LocalCacheStrategy {
    fn origin(&self) -> HydrationOrigin {
        HydrationOrigin::LocalCache
    }

    async fn attempt(&mut self) -> Option<PartialDocument> {
        match self.cache.load_document() {
            Ok(found) => found,
            Err(e) => {
                warn!(dir = %self.cache.dir().display(), "Ignoring unreadable local draft: {e}");
                None
            }
        }
    }
}
