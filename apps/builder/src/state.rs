use std::sync::Arc;

use crate::config::Config;
use crate::export::ExportInvoker;
use crate::remote::{Credential, ResumeServiceClient};
use crate::session::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
    /// Used by the analysis trigger; persistence holds its own copy.
    pub remote: ResumeServiceClient,
    pub credential: Option<Credential>,
    pub exporter: ExportInvoker,
    pub config: Config,
}
