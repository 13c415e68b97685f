//! StageController — the impure shell around the transition function.
//!
//! Owns the stage state, applies transitions to the shared log, schedules
//! their timers, and runs their side requests (upload start, candidate
//! fetch, navigation intent). All inputs arrive as [`StageEvent`]s on one
//! event loop, so no two mutations ever race.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::message::LogHandle;
use crate::nav::Navigator;
use crate::photos::CandidateSource;
use crate::search::SearchStage;
use crate::sched::EffectScheduler;
use crate::upload::{RealUpload, SimulatedUpload};

use super::event::StageEvent;
use super::state::{Stage, StageState};
use super::transition::{transition, Timed};

/// Drives the scripted conversation.
pub struct StageController {
    cfg: AppConfig,
    state: StageState,
    log: LogHandle,
    sched: EffectScheduler,
    search: SearchStage,
    source: Arc<dyn CandidateSource>,
    navigator: Arc<dyn Navigator>,
    events_tx: mpsc::UnboundedSender<StageEvent>,
    /// Real-mode pipeline, used when it holds a selection.
    real_upload: Option<Arc<RealUpload>>,
    /// Live simulated run, if any. Dropped (and thereby cancelled) on teardown.
    sim_run: Option<SimulatedUpload>,
    stage_tx: watch::Sender<Stage>,
}

impl StageController {
    /// Build a controller plus the receiving end of its event loop.
    pub fn new(
        cfg: AppConfig,
        log: LogHandle,
        source: Arc<dyn CandidateSource>,
        navigator: Arc<dyn Navigator>,
    ) -> (Self, mpsc::UnboundedReceiver<StageEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let sched = EffectScheduler::new(log.clone(), events_tx.clone());
        let search = SearchStage::new(cfg.result_limit);
        let (stage_tx, _) = watch::channel(Stage::Greeting);
        let controller = Self {
            cfg,
            state: StageState::default(),
            log,
            sched,
            search,
            source,
            navigator,
            events_tx,
            real_upload: None,
            sim_run: None,
            stage_tx,
        };
        (controller, events_rx)
    }

    /// Install a real-mode upload pipeline. A non-empty selection on it takes
    /// precedence over the simulated run.
    pub fn set_real_upload(&mut self, pipeline: Arc<RealUpload>) {
        self.real_upload = Some(pipeline);
    }

    /// Sender for raising events from outside (sub-bubbles, timers, pipelines).
    pub fn events(&self) -> mpsc::UnboundedSender<StageEvent> {
        self.events_tx.clone()
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    /// Watch the active stage (the host shell keys its input mode off this).
    pub fn stage_watch(&self) -> watch::Receiver<Stage> {
        self.stage_tx.subscribe()
    }

    pub fn log(&self) -> &LogHandle {
        &self.log
    }

    /// Kick off the conversation with the session-start bubble.
    pub fn start(&mut self) {
        self.handle(StageEvent::SessionStarted);
    }

    /// Process one event: transition, apply, schedule, run side requests.
    pub fn handle(&mut self, event: StageEvent) {
        // Events that carry payload for the controller itself.
        let event = match event {
            StageEvent::QuerySubmitted { query, .. } => {
                let results = self.search.run(&query);
                StageEvent::QuerySubmitted { query, results }
            }
            StageEvent::CandidatesLoaded { records, from_store } => {
                info!(count = records.len(), from_store, "search candidates loaded");
                self.search.set_candidates(records, from_store);
                StageEvent::CandidatesLoaded {
                    records: Vec::new(),
                    from_store,
                }
            }
            other => other,
        };

        let t = transition(&self.state, event, &self.cfg.timings, self.cfg.upload_total);

        if t.state.stage != self.state.stage {
            info!(from = %self.state.stage, to = %t.state.stage, "stage advanced");
        } else if t.is_noop() {
            debug!(stage = %self.state.stage, "event ignored");
        }

        for op in t.ops {
            self.log.apply(op);
        }
        for spec in t.timers {
            match spec.fire {
                Timed::Op(op) => self.sched.schedule_op(t.state.stage, spec.delay, op),
                Timed::Event(event) => {
                    self.sched.schedule_event(t.state.stage, spec.delay, event)
                }
            }
        }
        if let Some(screen) = t.nav {
            self.navigator.navigate(screen);
        }
        if t.start_upload {
            self.start_upload();
        }
        if t.fetch_candidates {
            self.fetch_candidates();
        }

        self.state = t.state;
        self.stage_tx.send_replace(self.state.stage);
    }

    /// Event loop: runs until a `Teardown` event (or every outside sender is
    /// gone), then cancels everything pending.
    pub async fn run(mut self, mut events_rx: mpsc::UnboundedReceiver<StageEvent>) {
        while let Some(event) = events_rx.recv().await {
            if matches!(event, StageEvent::Teardown) {
                break;
            }
            self.handle(event);
        }
        self.shutdown();
    }

    /// Cancel every pending timer and upload run. A late effect firing into a
    /// torn-down log would be undefined behavior, so this must precede drop
    /// of the owning screen.
    pub fn shutdown(&mut self) {
        self.sched.cancel_all();
        if let Some(run) = self.sim_run.take() {
            run.cancel();
        }
        info!("conversation torn down");
    }

    fn start_upload(&mut self) {
        match &self.real_upload {
            Some(pipeline) if !pipeline.selected().is_empty() => {
                let pipeline = Arc::clone(pipeline);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    pipeline.run(events).await;
                });
            }
            _ => {
                self.sim_run = Some(SimulatedUpload::start(
                    self.cfg.upload_total,
                    self.cfg.timings.upload_tick,
                    self.cfg.timings.upload_trailing,
                    self.cfg.saved_mb_per_item,
                    self.events_tx.clone(),
                ));
            }
        }
    }

    /// Fire-and-forget candidate fetch; resolution comes back as one event.
    fn fetch_candidates(&self) {
        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let from_store = source.from_store();
            let records = source.candidates().await;
            let _ = events.send(StageEvent::CandidatesLoaded { records, from_store });
        });
    }
}
