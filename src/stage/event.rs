//! Events the stage controller reacts to — user actions plus scripted timers.

use crate::message::{AccountMode, SearchResult};
use crate::photos::PhotoRecord;

/// An input to the stage transition function.
///
/// User-facing sub-bubbles raise the user variants; scripted timers and the
/// upload pipeline deliver the rest back through the same event loop.
#[derive(Debug, Clone)]
pub enum StageEvent {
    /// Session start action ("Get Started").
    SessionStarted,
    /// The greeting script finished; the account choice bubble goes live.
    GreetingPlayed,
    /// User picked create/login at the choice bubble.
    AccountChosen(AccountMode),
    /// User submitted the account form.
    AccountSubmitted { email: String, password: String },
    /// Scripted photo-access prompt and thumbnail grid.
    PhotosPrompted,
    /// Scripted start of the upload run.
    UploadStarted,
    /// The upload pipeline finished a run.
    UploadFinished { total_files: u32, total_size_mb: f64 },
    /// The upload pipeline failed; selection is retained for retry.
    UploadFailed { reason: String },
    /// User activated the post-upload action button.
    ActionActivated,
    /// The candidate pool fetch resolved (possibly empty).
    CandidatesLoaded {
        records: Vec<PhotoRecord>,
        from_store: bool,
    },
    /// User submitted a search query. The controller fills `results` in at
    /// submit time; senders leave it empty.
    QuerySubmitted {
        query: String,
        results: Vec<SearchResult>,
    },
    /// The search reveal timer fired with the run's results.
    ResultsReady {
        query: String,
        results: Vec<SearchResult>,
    },
    /// The owning screen is going away; cancel everything pending.
    Teardown,
}
