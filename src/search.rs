//! Search stage — picks a bounded random subset of the candidate pool.
//!
//! There is no ranking and no query history: shuffle the pool, take a few
//! records, and caption each with the query text and the source filename.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::message::SearchResult;
use crate::photos::PhotoRecord;

/// Selects display-ready results from a previously fetched candidate pool.
pub struct SearchStage {
    candidates: Vec<PhotoRecord>,
    from_store: bool,
    limit: usize,
}

impl SearchStage {
    pub fn new(limit: usize) -> Self {
        Self {
            candidates: Vec::new(),
            from_store: false,
            limit,
        }
    }

    /// Install the candidate pool (fetched once per screen activation).
    pub fn set_candidates(&mut self, candidates: Vec<PhotoRecord>, from_store: bool) {
        self.candidates = candidates;
        self.from_store = from_store;
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Run a query against the pool.
    pub fn run(&self, query: &str) -> Vec<SearchResult> {
        self.run_with_rng(query, &mut rand::thread_rng())
    }

    /// Deterministic variant for tests.
    pub fn run_with_rng<R: Rng>(&self, query: &str, rng: &mut R) -> Vec<SearchResult> {
        if self.candidates.is_empty() {
            return vec![SearchResult {
                image_ref: "📷".to_string(),
                caption: format!("No photos found for \"{query}\" — try uploading some first"),
                from_store: false,
            }];
        }

        let mut pool: Vec<&PhotoRecord> = self.candidates.iter().collect();
        pool.shuffle(rng);
        pool.into_iter()
            .take(self.limit)
            .map(|record| SearchResult {
                image_ref: record.path.clone(),
                caption: format!("Matched \"{query}\" in {}", record.filename),
                from_store: self.from_store,
            })
            .collect()
    }
}
