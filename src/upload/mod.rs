//! Upload pipelines: simulated timer ticks or a real multipart call.

pub mod real;
pub mod simulated;

pub use real::RealUpload;
pub use simulated::SimulatedUpload;

/// Progress of a simulated upload run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadProgress {
    pub uploaded: u32,
    pub total: u32,
    /// Fabricated figure (`uploaded × per-item savings`); flavor text only.
    pub saved_mb: f64,
}
