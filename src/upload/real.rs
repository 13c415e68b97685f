//! Real upload — one multipart call with a cosmetic progress percentage.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::photos::{LocalPhoto, PhotoClient};
use crate::stage::event::StageEvent;

/// Ceiling for the cosmetic percentage until the store responds.
const PRE_RESPONSE_CAP: f64 = 90.0;

/// Period of the cosmetic progress timer.
const PROGRESS_TICK: Duration = Duration::from_millis(200);

/// Trailing delay between the response and the completion event.
const COMPLETION_DELAY: Duration = Duration::from_millis(500);

/// Uploads a user-selected file set to the photo store.
///
/// The progress percentage is decorative: it climbs by random increments,
/// capped below 100 until the real response arrives, then snaps to 100. It
/// never reflects actual bytes transferred.
pub struct RealUpload {
    client: Arc<PhotoClient>,
    selected: Vec<LocalPhoto>,
    progress: watch::Sender<f64>,
}

impl RealUpload {
    pub fn new(client: Arc<PhotoClient>) -> Self {
        let (progress, _) = watch::channel(0.0);
        Self {
            client,
            selected: Vec::new(),
            progress,
        }
    }

    /// Replace the selection, keeping image files only.
    pub fn select(&mut self, files: Vec<LocalPhoto>) {
        self.selected = files.into_iter().filter(LocalPhoto::is_image).collect();
    }

    pub fn selected(&self) -> &[LocalPhoto] {
        &self.selected
    }

    /// Selection size in MB (shown beside the thumbnails).
    pub fn selected_size_mb(&self) -> f64 {
        let bytes: usize = self.selected.iter().map(LocalPhoto::size_bytes).sum();
        bytes as f64 / (1024.0 * 1024.0)
    }

    /// Subscribe to the cosmetic percentage.
    pub fn progress(&self) -> watch::Receiver<f64> {
        self.progress.subscribe()
    }

    /// Run the upload, delivering `UploadFinished` or `UploadFailed`.
    ///
    /// On failure the percentage resets to 0 and the selection is retained so
    /// the user can retry without re-picking files.
    pub async fn run(&self, events: mpsc::UnboundedSender<StageEvent>) {
        if self.selected.is_empty() {
            let _ = events.send(StageEvent::UploadFailed {
                reason: "no photos selected".to_string(),
            });
            return;
        }

        self.progress.send_replace(0.0);
        let ticker = self.spawn_progress_ticker();

        let outcome = self.client.upload(&self.selected).await;
        ticker.abort();

        match outcome {
            Ok(receipt) => {
                self.progress.send_replace(100.0);
                info!(
                    files = receipt.total_files,
                    size_mb = receipt.total_size_mb,
                    "upload accepted"
                );
                tokio::time::sleep(COMPLETION_DELAY).await;
                let _ = events.send(StageEvent::UploadFinished {
                    total_files: receipt.total_files,
                    total_size_mb: receipt.total_size_mb,
                });
            }
            Err(e) => {
                warn!("Upload failed: {e}");
                self.progress.send_replace(0.0);
                let _ = events.send(StageEvent::UploadFailed {
                    reason: e.to_string(),
                });
            }
        }
    }

    fn spawn_progress_ticker(&self) -> tokio::task::JoinHandle<()> {
        let progress = self.progress.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(PROGRESS_TICK);
            interval.tick().await;
            loop {
                interval.tick().await;
                let current = *progress.borrow();
                if current >= PRE_RESPONSE_CAP {
                    break;
                }
                let step = rand::thread_rng().gen_range(0.0..10.0);
                progress.send_replace((current + step).min(PRE_RESPONSE_CAP));
            }
        })
    }
}
