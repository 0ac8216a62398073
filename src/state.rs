use crate::metadata::MetadataService;

/// Shared application state passed to all handlers.
/// The metadata service is built once at startup so every request reuses
/// the same HTTP connection pool.
#[derive(Clone)]
pub struct AppState {
    pub metadata: MetadataService,
}
