//! PhotoClient — HTTP client for the remote photo store.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StoreError, UploadError};

use super::{LocalPhoto, PhotoRecord};

/// Wire shape of one listed photo (`GET /api/photos`).
#[derive(Debug, Deserialize)]
struct PhotoWire {
    filename: String,
    path: String,
    size: u64,
    #[serde(rename = "uploadDate")]
    upload_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
struct PhotoListing {
    photos: Vec<PhotoWire>,
}

/// Aggregate returned by the store after an upload (`POST /api/upload`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(rename = "totalFiles")]
    pub total_files: u32,
    #[serde(rename = "totalSizeMB")]
    pub total_size_mb: f64,
}

/// Client for the photo directory service.
pub struct PhotoClient {
    client: reqwest::Client,
    base_url: String,
}

impl PhotoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Address serving the bytes of a listed photo.
    pub fn photo_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the photo listing. Errors are the caller's problem; most callers
    /// want [`Self::list_photos`], which degrades instead.
    pub async fn fetch_photos(&self) -> Result<Vec<PhotoRecord>, StoreError> {
        let url = format!("{}/api/photos", self.base_url);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: resp.status().as_u16(),
            });
        }
        let listing: PhotoListing = resp
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(listing
            .photos
            .into_iter()
            .map(|p| PhotoRecord {
                filename: p.filename,
                path: p.path,
                size_bytes: p.size,
                uploaded_at: p.upload_date,
            })
            .collect())
    }

    /// Fetch the photo listing, degrading to empty on any failure.
    ///
    /// A dead store must never surface as a conversation error; search simply
    /// sees an empty candidate pool.
    pub async fn list_photos(&self) -> Vec<PhotoRecord> {
        match self.fetch_photos().await {
            Ok(photos) => {
                debug!(count = photos.len(), "fetched photo listing");
                photos
            }
            Err(e) => {
                warn!("Failed to fetch photo listing: {e}");
                Vec::new()
            }
        }
    }

    /// Upload the selected photos as one multipart request.
    pub async fn upload(&self, photos: &[LocalPhoto]) -> Result<UploadReceipt, UploadError> {
        if photos.is_empty() {
            return Err(UploadError::NothingSelected);
        }

        let mut form = reqwest::multipart::Form::new();
        for photo in photos {
            let part = reqwest::multipart::Part::bytes(photo.bytes.clone())
                .file_name(photo.filename.clone())
                .mime_str(&photo.mime)
                .map_err(|e| UploadError::Transport(e.to_string()))?;
            form = form.part("photos", part);
        }

        let url = format!("{}/api/upload", self.base_url);
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(UploadError::Rejected {
                status: resp.status().as_u16(),
            });
        }

        resp.json::<UploadReceipt>()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))
    }
}
