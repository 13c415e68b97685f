//! CloudSnap — scripted chat onboarding for a photo-backup service.

pub mod config;
pub mod error;
pub mod message;
pub mod nav;
pub mod photos;
pub mod render;
pub mod sched;
pub mod search;
pub mod stage;
pub mod upload;
