//! Remote photo directory: records, HTTP client, and candidate sources.

pub mod client;
pub mod source;

pub use client::{PhotoClient, UploadReceipt};
pub use source::{CandidateSource, SampleLibrary, StoreSource};

use serde::{Deserialize, Serialize};

/// A photo known to the directory. Read-only from the conversation's
/// perspective; the search stage uses these as its candidate pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub filename: String,
    pub path: String,
    pub size_bytes: u64,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// A user-selected photo awaiting upload.
#[derive(Debug, Clone)]
pub struct LocalPhoto {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl LocalPhoto {
    pub fn new(filename: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Only image files are eligible for upload.
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_detection_is_mime_based() {
        assert!(LocalPhoto::new("a.jpg", "image/jpeg", vec![0; 4]).is_image());
        assert!(LocalPhoto::new("b.png", "image/png", vec![]).is_image());
        assert!(!LocalPhoto::new("c.pdf", "application/pdf", vec![]).is_image());
    }

    #[test]
    fn record_serde_roundtrip() {
        let record = PhotoRecord {
            filename: "beach.jpg".to_string(),
            path: "/photos/beach.jpg".to_string(),
            size_bytes: 1024,
            uploaded_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: PhotoRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
