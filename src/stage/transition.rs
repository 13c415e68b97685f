//! Pure stage transition function.
//!
//! `(state, event) -> (state, log ops, timers, side requests)`. Nothing here
//! touches the log, the clock, or the network; the controller applies the
//! returned effects. This keeps every scripted sequence and edge policy
//! unit-testable without a runtime.

use std::time::Duration;

use crate::config::ScriptTimings;
use crate::message::{LogOp, Message, MessageKind};
use crate::nav::Screen;

use super::event::StageEvent;
use super::script;
use super::state::{Stage, StageState};

/// A delayed effect requested by a transition.
#[derive(Debug, Clone)]
pub enum Timed {
    /// Apply a pure log transform.
    Op(LogOp),
    /// Deliver an event back into the controller.
    Event(StageEvent),
}

/// A timer to be scheduled under the stage being entered.
#[derive(Debug, Clone)]
pub struct TimerSpec {
    pub delay: Duration,
    pub fire: Timed,
}

impl TimerSpec {
    fn op(delay: Duration, op: LogOp) -> Self {
        Self {
            delay,
            fire: Timed::Op(op),
        }
    }

    fn event(delay: Duration, event: StageEvent) -> Self {
        Self {
            delay,
            fire: Timed::Event(event),
        }
    }
}

/// Outcome of one transition.
#[derive(Debug)]
pub struct Transition {
    /// Next controller state.
    pub state: StageState,
    /// Log ops applied immediately, in order.
    pub ops: Vec<LogOp>,
    /// Delayed effects, scheduled under `state.stage`.
    pub timers: Vec<TimerSpec>,
    /// Navigation intent raised to the host shell.
    pub nav: Option<Screen>,
    /// The controller should start the upload pipeline.
    pub start_upload: bool,
    /// The controller should fetch the search candidate pool.
    pub fetch_candidates: bool,
}

impl Transition {
    /// Silent no-op: state unchanged, nothing appended or scheduled.
    fn stay(state: &StageState) -> Self {
        Self {
            state: state.clone(),
            ops: Vec::new(),
            timers: Vec::new(),
            nav: None,
            start_upload: false,
            fetch_candidates: false,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.ops.is_empty() && self.timers.is_empty() && self.nav.is_none()
    }
}

/// Compute the transition for `event` against `state`.
///
/// Events arriving in a stage that does not expect them are silently ignored
/// (stale timers, double submissions). All removal inside the emitted ops is
/// kind-filter based, so a superseded bubble can never reappear.
pub fn transition(
    state: &StageState,
    event: StageEvent,
    timings: &ScriptTimings,
    upload_total: u32,
) -> Transition {
    match (state.stage, event) {
        // ── Greeting script ─────────────────────────────────────────────
        (Stage::Greeting, StageEvent::SessionStarted) => {
            let mut t = Transition::stay(state);
            t.ops.push(LogOp::Append(vec![script::initial_message()]));
            t.timers.push(TimerSpec::op(
                timings.greeting_typing,
                LogOp::Append(vec![Message::typing()]),
            ));
            t.timers.push(TimerSpec::op(
                timings.greeting_reveal,
                LogOp::ReplaceKind(MessageKind::Typing, vec![script::greeting_prompt()]),
            ));
            t.timers.push(TimerSpec::event(
                timings.choice_reveal,
                StageEvent::GreetingPlayed,
            ));
            t
        }

        (Stage::Greeting, StageEvent::GreetingPlayed) => {
            let mut t = Transition::stay(state);
            t.state.stage = Stage::AccountChoice;
            t.ops.push(LogOp::Append(vec![script::account_choice()]));
            t
        }

        // ── Account creation ────────────────────────────────────────────
        (Stage::AccountChoice, StageEvent::AccountChosen(mode)) => {
            let mut t = Transition::stay(state);
            t.state.stage = Stage::AccountForm;
            t.state.account_mode = Some(mode);
            t.ops.push(LogOp::ReplaceKind(
                MessageKind::AccountChoice,
                vec![script::choice_echo(mode), script::account_form(mode)],
            ));
            t
        }

        (Stage::AccountForm, StageEvent::AccountSubmitted { email, password }) => {
            // Local validation failure: the form stays live, nothing reacts.
            if email.trim().is_empty() || password.trim().is_empty() {
                return Transition::stay(state);
            }
            let mut t = Transition::stay(state);
            t.state.stage = Stage::AccountCreated;
            t.ops.push(LogOp::ReplaceKind(
                MessageKind::AccountForm,
                vec![script::form_echo(&email), Message::typing()],
            ));
            t.timers.push(TimerSpec::op(
                timings.account_confirm,
                LogOp::ReplaceKind(MessageKind::Typing, vec![script::account_created()]),
            ));
            t.timers.push(TimerSpec::event(
                timings.photos_prompt,
                StageEvent::PhotosPrompted,
            ));
            t.timers.push(TimerSpec::event(
                timings.upload_start,
                StageEvent::UploadStarted,
            ));
            t
        }

        // ── Photo picking and upload ────────────────────────────────────
        (Stage::AccountCreated, StageEvent::PhotosPrompted) => {
            let mut t = Transition::stay(state);
            t.state.stage = Stage::PhotoPicking;
            t.ops.push(LogOp::Append(vec![
                script::photos_prompt(),
                script::thumbnails(),
            ]));
            t
        }

        (Stage::PhotoPicking, StageEvent::UploadStarted) => {
            let mut t = Transition::stay(state);
            t.state.stage = Stage::Uploading;
            t.ops.push(LogOp::Append(vec![script::progress(upload_total)]));
            t.start_upload = true;
            t
        }

        (
            Stage::Uploading,
            StageEvent::UploadFinished {
                total_files,
                total_size_mb,
            },
        ) => {
            let mut t = Transition::stay(state);
            t.state.stage = Stage::UploadDone;
            t.ops.push(LogOp::ReplaceKind(
                MessageKind::Progress,
                vec![
                    script::upload_summary(total_files, total_size_mb),
                    script::start_searching_button(),
                ],
            ));
            t
        }

        (Stage::Uploading, StageEvent::UploadFailed { reason: _ }) => {
            let mut t = Transition::stay(state);
            t.state.stage = Stage::PhotoPicking;
            t.ops.push(LogOp::ReplaceKind(
                MessageKind::Progress,
                vec![script::upload_failed()],
            ));
            t
        }

        // ── Hand-off to search ──────────────────────────────────────────
        (Stage::UploadDone, StageEvent::ActionActivated) => {
            let mut t = Transition::stay(state);
            t.state.stage = Stage::SearchReady;
            t.nav = Some(Screen::Search);
            t.ops.push(LogOp::Append(vec![script::search_greeting()]));
            t.fetch_candidates = true;
            t
        }

        // ── Search loop ─────────────────────────────────────────────────
        (Stage::SearchReady, StageEvent::QuerySubmitted { query, results }) => {
            // Blank queries are rejected silently.
            if query.trim().is_empty() {
                return Transition::stay(state);
            }
            let mut t = Transition::stay(state);
            t.state.stage = Stage::Searching;
            t.ops.push(LogOp::Append(vec![Message::user(query.clone())]));
            t.timers.push(TimerSpec::op(
                timings.search_typing,
                LogOp::Append(vec![Message::typing()]),
            ));
            t.timers.push(TimerSpec::event(
                timings.search_reveal,
                StageEvent::ResultsReady { query, results },
            ));
            t
        }

        (Stage::Searching, StageEvent::ResultsReady { query: _, results }) => {
            let mut t = Transition::stay(state);
            t.state.stage = Stage::SearchReady;
            t.ops.push(LogOp::ReplaceKind(
                MessageKind::Typing,
                vec![script::results(results)],
            ));
            t
        }

        // Pool bookkeeping is stage-independent.
        (_, StageEvent::CandidatesLoaded { .. }) => {
            let mut t = Transition::stay(state);
            t.state.candidates_loaded = true;
            t
        }

        // Anything else is stale or out of order; ignore it.
        (_, _) => Transition::stay(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{AccountMode, MessageLog};

    fn timings() -> ScriptTimings {
        ScriptTimings::default()
    }

    fn run(state: &StageState, event: StageEvent) -> Transition {
        transition(state, event, &timings(), 12)
    }

    /// Apply a transition's immediate ops to a log.
    fn apply_ops(log: MessageLog, t: &Transition) -> MessageLog {
        t.ops.iter().cloned().fold(log, MessageLog::apply)
    }

    /// Apply a transition's timer ops in delay order (events skipped).
    fn apply_timer_ops(log: MessageLog, t: &Transition) -> MessageLog {
        let mut timers: Vec<_> = t.timers.to_vec();
        timers.sort_by_key(|t| t.delay);
        timers.into_iter().fold(log, |log, spec| match spec.fire {
            Timed::Op(op) => log.apply(op),
            Timed::Event(_) => log,
        })
    }

    #[test]
    fn greeting_script_pairs_typing_insert_with_removal() {
        let state = StageState::default();
        let t = run(&state, StageEvent::SessionStarted);
        assert_eq!(t.state.stage, Stage::Greeting);

        let log = apply_ops(MessageLog::new(), &t);
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().text(), Some(script::GET_STARTED));

        // Replay the timers: at no point may two typing bubbles coexist.
        let log = apply_timer_ops(log, &t);
        assert_eq!(log.count_kind(MessageKind::Typing), 0);
        assert_eq!(log.last().unwrap().text(), Some(script::GREETING_PROMPT));
    }

    #[test]
    fn greeting_played_reveals_the_choice_bubble() {
        let state = StageState::default();
        let t = run(&state, StageEvent::GreetingPlayed);
        assert_eq!(t.state.stage, Stage::AccountChoice);
        let log = apply_ops(MessageLog::new(), &t);
        assert!(log.contains_kind(MessageKind::AccountChoice));
    }

    #[test]
    fn choosing_replaces_choice_with_echo_and_form() {
        let state = StageState {
            stage: Stage::AccountChoice,
            ..Default::default()
        };
        let t = run(&state, StageEvent::AccountChosen(AccountMode::Create));
        assert_eq!(t.state.stage, Stage::AccountForm);
        assert_eq!(t.state.account_mode, Some(AccountMode::Create));

        let log = apply_ops(
            MessageLog::new().append(vec![script::account_choice()]),
            &t,
        );
        assert!(!log.contains_kind(MessageKind::AccountChoice));
        assert_eq!(log.count_kind(MessageKind::AccountForm), 1);
    }

    #[test]
    fn empty_submission_is_a_silent_noop() {
        let state = StageState {
            stage: Stage::AccountForm,
            ..Default::default()
        };
        for (email, password) in [("", "pw"), ("a@b.c", ""), ("  ", "pw"), ("", "")] {
            let t = run(
                &state,
                StageEvent::AccountSubmitted {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            );
            assert!(t.is_noop(), "({email:?}, {password:?}) should be rejected");
            assert_eq!(t.state, state);
        }
    }

    #[test]
    fn valid_submission_scripts_the_upload_lead_in() {
        let state = StageState {
            stage: Stage::AccountForm,
            account_mode: Some(AccountMode::Create),
            ..Default::default()
        };
        let t = run(
            &state,
            StageEvent::AccountSubmitted {
                email: "a@b.c".to_string(),
                password: "hunter2".to_string(),
            },
        );
        assert_eq!(t.state.stage, Stage::AccountCreated);

        let log = apply_ops(
            MessageLog::new().append(vec![script::account_form(AccountMode::Create)]),
            &t,
        );
        assert!(!log.contains_kind(MessageKind::AccountForm));
        assert_eq!(log.count_kind(MessageKind::Typing), 1);
        assert_eq!(log.messages()[0].text(), Some("Account created with a@b.c"));

        // Two follow-up events: photos prompt then upload start, in that order.
        let events: Vec<_> = t
            .timers
            .iter()
            .filter(|spec| matches!(spec.fire, Timed::Event(_)))
            .collect();
        assert_eq!(events.len(), 2);
        assert!(events[0].delay < events[1].delay);
    }

    #[test]
    fn upload_finished_swaps_progress_for_summary_and_button() {
        let state = StageState {
            stage: Stage::Uploading,
            ..Default::default()
        };
        let t = run(
            &state,
            StageEvent::UploadFinished {
                total_files: 12,
                total_size_mb: 27.6,
            },
        );
        assert_eq!(t.state.stage, Stage::UploadDone);

        let log = apply_ops(MessageLog::new().append(vec![script::progress(12)]), &t);
        assert!(!log.contains_kind(MessageKind::Progress));
        assert_eq!(log.count_kind(MessageKind::Assistant), 1);
        assert_eq!(log.count_kind(MessageKind::ActionButton), 1);
    }

    #[test]
    fn upload_finished_twice_is_a_noop() {
        let done = StageState {
            stage: Stage::UploadDone,
            ..Default::default()
        };
        let t = run(
            &done,
            StageEvent::UploadFinished {
                total_files: 12,
                total_size_mb: 27.6,
            },
        );
        assert!(t.is_noop());
        assert_eq!(t.state.stage, Stage::UploadDone);
    }

    #[test]
    fn upload_failure_reverts_to_picking() {
        let state = StageState {
            stage: Stage::Uploading,
            ..Default::default()
        };
        let t = run(
            &state,
            StageEvent::UploadFailed {
                reason: "status 500".to_string(),
            },
        );
        assert_eq!(t.state.stage, Stage::PhotoPicking);
        let log = apply_ops(MessageLog::new().append(vec![script::progress(12)]), &t);
        assert!(!log.contains_kind(MessageKind::Progress));
    }

    #[test]
    fn action_button_raises_navigation_and_candidate_fetch() {
        let state = StageState {
            stage: Stage::UploadDone,
            ..Default::default()
        };
        let t = run(&state, StageEvent::ActionActivated);
        assert_eq!(t.state.stage, Stage::SearchReady);
        assert_eq!(t.nav, Some(Screen::Search));
        assert!(t.fetch_candidates);
    }

    #[test]
    fn blank_query_is_rejected_silently() {
        let state = StageState {
            stage: Stage::SearchReady,
            ..Default::default()
        };
        for query in ["", "   ", "\t\n"] {
            let t = run(
                &state,
                StageEvent::QuerySubmitted {
                    query: query.to_string(),
                    results: Vec::new(),
                },
            );
            assert!(t.is_noop(), "{query:?} should be rejected");
        }
    }

    #[test]
    fn query_while_searching_is_rejected_silently() {
        let state = StageState {
            stage: Stage::Searching,
            ..Default::default()
        };
        let t = run(
            &state,
            StageEvent::QuerySubmitted {
                query: "sunset".to_string(),
                results: Vec::new(),
            },
        );
        assert!(t.is_noop());
        assert_eq!(t.state.stage, Stage::Searching);
    }

    #[test]
    fn search_round_trip_returns_to_ready() {
        let ready = StageState {
            stage: Stage::SearchReady,
            candidates_loaded: true,
            ..Default::default()
        };
        let t = run(
            &ready,
            StageEvent::QuerySubmitted {
                query: "sunset".to_string(),
                results: Vec::new(),
            },
        );
        assert_eq!(t.state.stage, Stage::Searching);
        let log = apply_ops(MessageLog::new(), &t);
        assert_eq!(log.last().unwrap().text(), Some("sunset"));

        let t2 = run(
            &t.state,
            StageEvent::ResultsReady {
                query: "sunset".to_string(),
                results: Vec::new(),
            },
        );
        assert_eq!(t2.state.stage, Stage::SearchReady);
        let log = apply_ops(log.append(vec![Message::typing()]), &t2);
        assert!(!log.contains_kind(MessageKind::Typing));
        assert!(log.contains_kind(MessageKind::Results));
    }

    #[test]
    fn stale_events_are_ignored() {
        let state = StageState::default();
        assert!(run(&state, StageEvent::ActionActivated).is_noop());
        assert!(run(
            &state,
            StageEvent::UploadFinished {
                total_files: 1,
                total_size_mb: 1.0
            }
        )
        .is_noop());
        assert!(run(
            &state,
            StageEvent::QuerySubmitted {
                query: "q".to_string(),
                results: Vec::new()
            }
        )
        .is_noop());
    }

    #[test]
    fn candidates_loaded_sets_the_flag_anywhere() {
        let state = StageState {
            stage: Stage::SearchReady,
            ..Default::default()
        };
        let t = run(
            &state,
            StageEvent::CandidatesLoaded {
                records: Vec::new(),
                from_store: true,
            },
        );
        assert!(t.state.candidates_loaded);
        assert!(t.ops.is_empty());
    }
}
