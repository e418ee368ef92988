pub mod animation;
pub mod capture;
pub mod chart;
pub mod events;
pub mod header;
pub mod models;
pub mod navigation;
pub mod reveal;
pub mod scan;
pub mod screen;
pub mod settings;
pub mod streak;
mod utils;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use chrono::Local;
use tokio::sync::mpsc;

use events::{EventSink, JsonLinesSink, ScanEvent};
use navigation::Screen;
use scan::ScanPhase;
use screen::ResultsScreen;
use settings::{SettingsStore, UserSettings};

pub use utils::init_logging;

const DEFAULT_SETTINGS_FILE: &str = "nutrak-settings.json";

/// Headless entry point: mounts the results screen, streams every scan event
/// to stdout as JSON lines and exits once the reveal cascade has finished or
/// on Ctrl-C.
pub fn run() -> anyhow::Result<()> {
    init_logging();

    log::info!("Nutrak starting up...");

    let settings_path = std::env::var_os("NUTRAK_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let store = SettingsStore::new(settings_path)?;
    let settings = store.current();

    let today = Local::now().date_naive();
    let calendar = streak::StreakCalendar::new(today, 10);
    log::info!(
        "{} tab: {} streak days shown, next milestone {:?}",
        Screen::Streaks.title(),
        calendar.streak_count(),
        streak::next_milestone(calendar.streak_days).map(|m| m.days)
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(simulate_scan(settings))
}

async fn simulate_scan(settings: UserSettings) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<ScanEvent>();
    let output = JsonLinesSink::stdout();

    let screen = ResultsScreen::mount(&settings, Arc::new(tx)).await?;
    log::info!(
        "navigated to {} ({})",
        Screen::NutritionResults.title(),
        Screen::NutritionResults.route()
    );

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                let finished = matches!(
                    event,
                    ScanEvent::PhaseChanged { phase: ScanPhase::Complete, .. }
                );
                output.emit(event);
                if finished {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::warn!("interrupted, tearing down scan session");
                break;
            }
        }
    }

    let view = screen.view().await;
    let rendered = serde_json::to_string_pretty(&view).context("failed to render results view")?;
    println!("{rendered}");

    screen.unmount();
    Ok(())
}
