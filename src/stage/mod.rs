//! Conversation sequencing: stage machine, script data, pure transitions,
//! and the controller that applies them.

pub mod controller;
pub mod event;
pub mod script;
pub mod state;
pub mod transition;

pub use controller::StageController;
pub use event::StageEvent;
pub use state::{Stage, StageState};
pub use transition::{Timed, TimerSpec, Transition};
