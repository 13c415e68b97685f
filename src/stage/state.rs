//! Conversation stage machine — tracks which scripted phase is live.

use serde::{Deserialize, Serialize};

use crate::message::AccountMode;

/// The stages of the onboarding → search conversation.
///
/// Onboarding progresses linearly: Greeting → AccountChoice → AccountForm →
/// AccountCreated → PhotoPicking → Uploading → UploadDone → SearchReady.
/// SearchReady ⇄ Searching is re-entrant and never terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Greeting,
    AccountChoice,
    AccountForm,
    AccountCreated,
    PhotoPicking,
    Uploading,
    UploadDone,
    SearchReady,
    Searching,
}

impl Stage {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, target),
            (Greeting, AccountChoice)
                | (AccountChoice, AccountForm)
                | (AccountForm, AccountCreated)
                | (AccountCreated, PhotoPicking)
                | (PhotoPicking, Uploading)
                | (Uploading, UploadDone)
                // Failed upload falls back so the run can be retried.
                | (Uploading, PhotoPicking)
                | (UploadDone, SearchReady)
                | (SearchReady, Searching)
                | (Searching, SearchReady)
        )
    }

    /// Next stage in the linear onboarding progression, if any.
    ///
    /// The search loop is re-entrant rather than linear, so SearchReady and
    /// Searching have no `next`.
    pub fn next(&self) -> Option<Stage> {
        use Stage::*;
        match self {
            Greeting => Some(AccountChoice),
            AccountChoice => Some(AccountForm),
            AccountForm => Some(AccountCreated),
            AccountCreated => Some(PhotoPicking),
            PhotoPicking => Some(Uploading),
            Uploading => Some(UploadDone),
            UploadDone => Some(SearchReady),
            SearchReady | Searching => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Greeting => "greeting",
            Self::AccountChoice => "account_choice",
            Self::AccountForm => "account_form",
            Self::AccountCreated => "account_created",
            Self::PhotoPicking => "photo_picking",
            Self::Uploading => "uploading",
            Self::UploadDone => "upload_done",
            Self::SearchReady => "search_ready",
            Self::Searching => "searching",
        };
        write!(f, "{s}")
    }
}

/// The stage controller's own small state.
///
/// Created on conversation start, mutated only by applying transitions,
/// discarded when the screen is torn down.
#[derive(Debug, Clone, PartialEq)]
pub struct StageState {
    /// Currently active stage.
    pub stage: Stage,
    /// Account mode picked at the choice bubble, if any.
    pub account_mode: Option<AccountMode>,
    /// Whether the search candidate pool has been loaded.
    pub candidates_loaded: bool,
}

impl Default for StageState {
    fn default() -> Self {
        Self {
            stage: Stage::Greeting,
            account_mode: None,
            candidates_loaded: false,
        }
    }
}

impl StageState {
    /// Whether a search query is currently in flight.
    pub fn is_searching(&self) -> bool {
        self.stage == Stage::Searching
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        use Stage::*;
        let transitions = [
            (Greeting, AccountChoice),
            (AccountChoice, AccountForm),
            (AccountForm, AccountCreated),
            (AccountCreated, PhotoPicking),
            (PhotoPicking, Uploading),
            (Uploading, UploadDone),
            (Uploading, PhotoPicking),
            (UploadDone, SearchReady),
            (SearchReady, Searching),
            (Searching, SearchReady),
        ];
        for (from, to) in transitions {
            assert!(from.can_transition_to(to), "{from} should transition to {to}");
        }
    }

    #[test]
    fn invalid_transitions() {
        use Stage::*;
        // Skip stages
        assert!(!Greeting.can_transition_to(AccountForm));
        assert!(!AccountForm.can_transition_to(Uploading));
        // Go backward in onboarding
        assert!(!AccountForm.can_transition_to(AccountChoice));
        // Self-transition
        assert!(!Searching.can_transition_to(Searching));
        // Search loop cannot re-enter onboarding
        assert!(!SearchReady.can_transition_to(Greeting));
    }

    #[test]
    fn next_walks_onboarding_then_loops() {
        use Stage::*;
        let expected = [
            AccountChoice,
            AccountForm,
            AccountCreated,
            PhotoPicking,
            Uploading,
            UploadDone,
            SearchReady,
        ];
        let mut current = Greeting;
        for expected_next in expected {
            let next = current.next().unwrap();
            assert_eq!(next, expected_next);
            current = next;
        }
        // No terminal stage — the search loop is re-entrant, not linear.
        assert!(current.next().is_none());
        assert!(current.can_transition_to(Searching));
        assert!(Searching.can_transition_to(SearchReady));
    }

    #[test]
    fn display_matches_serde() {
        use Stage::*;
        for stage in [
            Greeting,
            AccountChoice,
            AccountForm,
            AccountCreated,
            PhotoPicking,
            Uploading,
            UploadDone,
            SearchReady,
            Searching,
        ] {
            let display = format!("{stage}");
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }

    #[test]
    fn default_state() {
        let state = StageState::default();
        assert_eq!(state.stage, Stage::Greeting);
        assert!(state.account_mode.is_none());
        assert!(!state.candidates_loaded);
        assert!(!state.is_searching());
    }
}
