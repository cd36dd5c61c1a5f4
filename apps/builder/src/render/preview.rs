use std::sync::Arc;

use tokio::sync::watch;

use crate::document::model::DocumentModel;
use crate::document::store::{ChangeEvent, DocumentObserver};
use crate::render::{project, RenderedDocument};

/// Observer that re-projects the model after every change and publishes the
/// latest tree. Readers hold a `watch::Receiver` and always see the projection
/// of the most recent completed mutation.
pub struct LivePreview {
    tx: watch::Sender<Arc<RenderedDocument>>,
}

impl LivePreview {
    pub fn new(model: &DocumentModel) -> (Self, watch::Receiver<Arc<RenderedDocument>>) {
        let (tx, rx) = watch::channel(Arc::new(project(model)));
        (Self { tx }, rx)
    }
}

impl DocumentObserver for LivePreview {
    fn on_change(&mut self, model: &DocumentModel, _event: &ChangeEvent) {
        self.tx.send_replace(Arc::new(project(model)));
    }
}
