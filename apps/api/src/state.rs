use crate::config::Config;
use crate::repository::ResumeRepository;
use crate::storage::ObjectStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Both client handles are cheap clones over connection-pooled drivers; there
/// are no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub resumes: ResumeRepository,
    pub storage: ObjectStore,
    pub config: Config,
}
