use std::sync::Arc;

/// Snapshot of the cached album art.
#[derive(Debug, Clone)]
pub struct ArtImage {
    pub bytes: Arc<[u8]>,
    pub content_type: String,
    pub version: u64,
}
