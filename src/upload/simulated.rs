//! Simulated upload — fixed-period ticks up to a target count.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::stage::event::StageEvent;

use super::UploadProgress;

/// A running simulated upload.
///
/// Ticks at a fixed period, publishing the uploaded count and a fabricated
/// "MB saved" figure (a linear function of the count — flavor text, not a
/// measured quantity). After the final tick it waits a short trailing delay,
/// then delivers `UploadFinished` to the controller.
pub struct SimulatedUpload {
    handle: JoinHandle<()>,
    progress: watch::Receiver<UploadProgress>,
}

impl SimulatedUpload {
    pub fn start(
        total: u32,
        tick: Duration,
        trailing: Duration,
        saved_mb_per_item: f64,
        events: mpsc::UnboundedSender<StageEvent>,
    ) -> Self {
        let (progress_tx, progress_rx) = watch::channel(UploadProgress {
            uploaded: 0,
            total,
            saved_mb: 0.0,
        });

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // The first tick of a tokio interval resolves immediately.
            interval.tick().await;

            for uploaded in 1..=total {
                interval.tick().await;
                let saved_mb = f64::from(uploaded) * saved_mb_per_item;
                progress_tx.send_replace(UploadProgress {
                    uploaded,
                    total,
                    saved_mb,
                });
            }

            tokio::time::sleep(trailing).await;
            let total_size_mb = f64::from(total) * saved_mb_per_item;
            debug!(total, total_size_mb, "simulated upload complete");
            let _ = events.send(StageEvent::UploadFinished {
                total_files: total,
                total_size_mb,
            });
        });

        Self {
            handle,
            progress: progress_rx,
        }
    }

    /// Subscribe to tick progress.
    pub fn progress(&self) -> watch::Receiver<UploadProgress> {
        self.progress.clone()
    }

    /// Cancel the run; no completion event will be delivered.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for SimulatedUpload {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
