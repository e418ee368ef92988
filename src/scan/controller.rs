use std::{
    sync::{Arc, Mutex as StdMutex},
    time::Duration,
};

use anyhow::{bail, Result};
use serde::Serialize;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    events::{ScanEvent, SharedSink},
    reveal::{RevealCascade, RevealSchedule},
    settings::UserSettings,
};

use super::state::{Advance, ScanPhase, ScanSession};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScanSnapshot {
    pub session: ScanSession,
    pub is_ticking: bool,
}

/// Owns the running ticker. Dropping the guard cancels the ticker, so every
/// exit path (completion, teardown, drop of the host) releases it.
struct TickerGuard {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl TickerGuard {
    fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

enum TickerSlot {
    Idle,
    Running(TickerGuard),
    TornDown,
}

/// Drives one [`ScanSession`] from 0 to 100 on a fixed cadence, then hands
/// over to the reveal cascade.
#[derive(Clone)]
pub struct ScanController {
    session: Arc<Mutex<ScanSession>>,
    sink: SharedSink,
    ticker: Arc<StdMutex<TickerSlot>>,
    tick_interval: Duration,
    schedule: RevealSchedule,
    debug_mode: bool,
}

impl ScanController {
    pub fn new(settings: &UserSettings, sink: SharedSink) -> Result<Self> {
        settings.validate()?;

        let debug_mode = std::env::var("NUTRAK_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            session: Arc::new(Mutex::new(ScanSession::new(&settings.scan))),
            sink,
            ticker: Arc::new(StdMutex::new(TickerSlot::Idle)),
            tick_interval: settings.scan.tick_interval(),
            schedule: settings.reveal.schedule(),
            debug_mode,
        })
    }

    pub async fn session_id(&self) -> String {
        self.session.lock().await.id.clone()
    }

    pub async fn get_snapshot(&self) -> ScanSnapshot {
        let session = self.session.lock().await.clone();
        ScanSnapshot {
            session,
            is_ticking: self.is_ticking(),
        }
    }

    pub fn is_ticking(&self) -> bool {
        match self.ticker.lock() {
            Ok(slot) => matches!(&*slot, TickerSlot::Running(guard) if guard.is_running()),
            Err(_) => false,
        }
    }

    /// Begin ticking. The first tick lands one full interval after this call.
    pub async fn start(&self) -> Result<ScanSnapshot> {
        {
            let mut slot = self
                .ticker
                .lock()
                .map_err(|_| anyhow::anyhow!("ticker lock poisoned"))?;
            match &*slot {
                TickerSlot::Idle => {}
                TickerSlot::Running(_) => bail!("scan already started"),
                TickerSlot::TornDown => bail!("scan session was torn down"),
            }
            *slot = TickerSlot::Running(self.spawn_ticker());
        }

        let snapshot = self.get_snapshot().await;
        log_info!(
            "scan session {} started (tick every {}ms)",
            snapshot.session.id,
            self.tick_interval.as_millis()
        );
        Ok(snapshot)
    }

    /// Cancel any pending tick. Progress stays at its last committed value
    /// and the session can no longer reach REVEALING if it had not already.
    ///
    /// Returns whether a live ticker was stopped. Calling it again is a no-op.
    pub fn teardown(&self) -> bool {
        let previous = match self.ticker.lock() {
            Ok(mut slot) => std::mem::replace(&mut *slot, TickerSlot::TornDown),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), TickerSlot::TornDown),
        };

        match previous {
            TickerSlot::Running(guard) => {
                let was_running = guard.is_running();
                drop(guard);
                if was_running {
                    log_info!("scan ticker cancelled by teardown");
                }
                was_running
            }
            TickerSlot::Idle | TickerSlot::TornDown => false,
        }
    }

    fn spawn_ticker(&self) -> TickerGuard {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let session = self.session.clone();
        let sink = self.sink.clone();
        let tick_interval = self.tick_interval;
        let schedule = self.schedule.clone();
        let debug_mode = self.debug_mode;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + tick_interval, tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let (outcome, session_id) = {
                    let mut guard = session.lock().await;
                    if token.is_cancelled() {
                        break;
                    }
                    (guard.advance(), guard.id.clone())
                };

                match outcome {
                    Advance::Progressed(progress) => {
                        if debug_mode {
                            log_info!("scan {} progress {}%", session_id, progress);
                        } else {
                            log_debug!("scan {} progress {}%", session_id, progress);
                        }
                        sink.emit(ScanEvent::ScanProgress {
                            session_id,
                            progress,
                        });
                    }
                    Advance::Completed => {
                        log_info!("scan {} reached 100%, revealing results", session_id);
                        sink.emit(ScanEvent::ScanProgress {
                            session_id: session_id.clone(),
                            progress: 100,
                        });
                        sink.emit(ScanEvent::PhaseChanged {
                            session_id: session_id.clone(),
                            phase: ScanPhase::Revealing,
                        });
                        RevealCascade::launch(session.clone(), session_id, schedule, sink);
                        break;
                    }
                    Advance::Idle => break,
                }
            }
        });

        TickerGuard { cancel, handle }
    }
}
