//! Top-level screen navigation seam.
//!
//! The conversation engine's responsibility ends at raising a navigation
//! intent; routing between screens belongs to the host shell.

/// The closed set of top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Chat,
    Search,
    Gallery,
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chat => write!(f, "chat"),
            Self::Search => write!(f, "search"),
            Self::Gallery => write!(f, "gallery"),
        }
    }
}

/// Opaque navigation callback.
pub trait Navigator: Send + Sync {
    fn navigate(&self, screen: Screen);
}

/// Navigator that ignores every intent. Used by tests.
pub struct NullNavigator;

impl Navigator for NullNavigator {
    fn navigate(&self, _screen: Screen) {}
}
