//! Candidate sources — pluggable providers of photo records for search.

use std::sync::Arc;

use async_trait::async_trait;

use super::client::PhotoClient;
use super::PhotoRecord;

/// A provider of search candidates.
///
/// One search stage serves both flow variants: the store-backed one and the
/// fabricated sample one differ only in which source they are given.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Whether records come from the remote store (drives `from_store` on results).
    fn from_store(&self) -> bool;

    /// Produce the candidate pool. Failures degrade to an empty pool.
    async fn candidates(&self) -> Vec<PhotoRecord>;
}

/// Candidates fetched from the remote photo store.
pub struct StoreSource {
    client: Arc<PhotoClient>,
}

impl StoreSource {
    pub fn new(client: Arc<PhotoClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CandidateSource for StoreSource {
    fn from_store(&self) -> bool {
        true
    }

    async fn candidates(&self) -> Vec<PhotoRecord> {
        self.client.list_photos().await
    }
}

/// Fixed fabricated candidates for running without a photo store.
///
/// The `path` doubles as the display pictogram; these records never hit the
/// wire.
pub struct SampleLibrary;

impl SampleLibrary {
    fn records() -> Vec<PhotoRecord> {
        let samples = [
            ("sunrise-over-mountains.jpg", "🌅", 2_480_000),
            ("garden-flowers-spring.jpg", "🌺", 1_910_000),
            ("butterfly-lavender-macro.jpg", "🦋", 3_150_000),
            ("ocean-waves-coastline.jpg", "🌊", 2_730_000),
        ];
        samples
            .into_iter()
            .map(|(filename, icon, size)| PhotoRecord {
                filename: filename.to_string(),
                path: icon.to_string(),
                size_bytes: size,
                uploaded_at: chrono::Utc::now(),
            })
            .collect()
    }
}

#[async_trait]
impl CandidateSource for SampleLibrary {
    fn from_store(&self) -> bool {
        false
    }

    async fn candidates(&self) -> Vec<PhotoRecord> {
        Self::records()
    }
}
