use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use cloudsnap::config::AppConfig;
use cloudsnap::message::{AccountMode, LogHandle};
use cloudsnap::nav::{Navigator, Screen};
use cloudsnap::photos::{CandidateSource, PhotoClient, SampleLibrary, StoreSource};
use cloudsnap::render::render_loop;
use cloudsnap::stage::{Stage, StageController, StageEvent};

/// Navigator for the terminal shell — there is only one surface, so a
/// navigation intent is just announced.
struct ShellNavigator;

impl Navigator for ShellNavigator {
    fn navigate(&self, screen: Screen) {
        info!(%screen, "navigation requested");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cfg = AppConfig::from_env()?;
    let use_store = std::env::var("CLOUDSNAP_USE_STORE").is_ok_and(|v| v == "1");

    eprintln!("📸 CloudSnap v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Photo store: {}", cfg.store_base_url);
    eprintln!(
        "   Candidates: {}",
        if use_store { "remote store" } else { "sample library" }
    );
    eprintln!("   Press Enter to begin. Ctrl-D to quit.\n");

    let source: Arc<dyn CandidateSource> = if use_store {
        Arc::new(StoreSource::new(Arc::new(PhotoClient::new(
            cfg.store_base_url.clone(),
        ))))
    } else {
        Arc::new(SampleLibrary)
    };

    let log = LogHandle::new();
    let (mut controller, events_rx) =
        StageController::new(cfg, log.clone(), source, Arc::new(ShellNavigator));
    let events = controller.events();
    let stage_rx = controller.stage_watch();

    tokio::spawn(render_loop(log.subscribe()));

    controller.start();
    tokio::spawn(controller.run(events_rx));

    // Map typed lines onto stage events based on the live stage.
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        let event = match *stage_rx.borrow() {
            Stage::AccountChoice => match line.as_str() {
                "create" => Some(StageEvent::AccountChosen(AccountMode::Create)),
                "login" => Some(StageEvent::AccountChosen(AccountMode::Login)),
                _ => None,
            },
            Stage::AccountForm => {
                let mut parts = line.split_whitespace();
                let email = parts.next().unwrap_or("").to_string();
                let password = parts.next().unwrap_or("").to_string();
                Some(StageEvent::AccountSubmitted { email, password })
            }
            Stage::UploadDone => Some(StageEvent::ActionActivated),
            Stage::SearchReady => Some(StageEvent::QuerySubmitted {
                query: line,
                results: Vec::new(),
            }),
            _ => None,
        };
        if let Some(event) = event {
            let _ = events.send(event);
        }
    }

    // Tear down the conversation so no pending timer outlives the log.
    let _ = events.send(StageEvent::Teardown);
    Ok(())
}
