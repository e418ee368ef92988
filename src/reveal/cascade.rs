use std::sync::Arc;

use tokio::{
    sync::Mutex,
    task::{JoinHandle, JoinSet},
    time::{self, Instant},
};

use crate::{
    events::{ScanEvent, SharedSink},
    scan::{ScanPhase, ScanSession},
};

use super::schedule::{RevealSchedule, RevealStep};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Staggered appearance of the result sections.
///
/// Each step runs on its own task and only waits on its own delay, so
/// sections overlap freely. Once started the cascade cannot be cancelled.
pub struct RevealCascade;

impl RevealCascade {
    /// Start the cascade for a session that has just entered REVEALING.
    ///
    /// The returned handle may be dropped; the cascade keeps running and
    /// marks the session complete when every section is at rest.
    pub fn launch(
        session: Arc<Mutex<ScanSession>>,
        session_id: String,
        schedule: RevealSchedule,
        sink: SharedSink,
    ) -> JoinHandle<()> {
        let started = Instant::now();
        let mut steps = JoinSet::new();

        for step in schedule.steps().iter().cloned() {
            steps.spawn(run_step(step, started, session_id.clone(), sink.clone()));
        }

        log_info!(
            "reveal cascade started for session {} ({} sections)",
            session_id,
            schedule.len()
        );

        tokio::spawn(async move {
            while let Some(joined) = steps.join_next().await {
                if let Err(err) = joined {
                    log_warn!("reveal step for session {} ended early: {}", session_id, err);
                }
            }

            let completed = {
                let mut guard = session.lock().await;
                guard.id == session_id && guard.mark_complete()
            };

            if completed {
                log_info!(
                    "session {} complete {}ms after reveal",
                    session_id,
                    started.elapsed().as_millis()
                );
                sink.emit(ScanEvent::PhaseChanged {
                    session_id,
                    phase: ScanPhase::Complete,
                });
            }
        })
    }
}

async fn run_step(step: RevealStep, started: Instant, session_id: String, sink: SharedSink) {
    time::sleep_until(started + step.delay).await;

    let offset_ms = started.elapsed().as_millis() as u64;
    log_debug!("revealing {:?} at +{}ms", step.section, offset_ms);
    sink.emit(ScanEvent::SectionRevealed {
        session_id: session_id.clone(),
        section: step.section,
        offset_ms,
        opacity: step.fade,
        motion: step.motion_transition,
    });

    time::sleep_until(started + step.settled_offset()).await;

    sink.emit(ScanEvent::SectionSettled {
        session_id,
        section: step.section,
        offset_ms: started.elapsed().as_millis() as u64,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reveal::SectionId, settings::ScanSettings};
    use std::time::Duration;
    use tokio::sync::mpsc;

    async fn revealing_session() -> (Arc<Mutex<ScanSession>>, String) {
        let mut session = ScanSession::new(&ScanSettings::default());
        while session.phase == ScanPhase::Scanning {
            session.advance();
        }
        let id = session.id.clone();
        (Arc::new(Mutex::new(session)), id)
    }

    #[tokio::test(start_paused = true)]
    async fn test_sections_reveal_in_schedule_order() {
        let (session, id) = revealing_session().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = RevealCascade::launch(session.clone(), id, RevealSchedule::default(), Arc::new(tx));
        handle.await.unwrap();

        let mut revealed = Vec::new();
        let mut settled = 0;
        let mut completed = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                ScanEvent::SectionRevealed {
                    section, offset_ms, ..
                } => revealed.push((section, offset_ms)),
                ScanEvent::SectionSettled { .. } => settled += 1,
                ScanEvent::PhaseChanged { phase, .. } => {
                    assert_eq!(phase, ScanPhase::Complete);
                    completed = true;
                }
                other => panic!("unexpected event {other:?}"),
            }
        }

        assert_eq!(
            revealed,
            vec![
                (SectionId::Overview, 100),
                (SectionId::Macronutrients, 300),
                (SectionId::Micronutrients, 500),
                (SectionId::WeeklyChart, 700),
                (SectionId::ActionButton, 900),
            ]
        );
        assert_eq!(settled, 5);
        assert!(completed);
        assert_eq!(session.lock().await.phase, ScanPhase::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_sections_visible_by_last_delay() {
        let (session, id) = revealing_session().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _handle = RevealCascade::launch(session.clone(), id, RevealSchedule::default(), Arc::new(tx));
        time::sleep(Duration::from_millis(901)).await;

        let mut revealed = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, ScanEvent::SectionRevealed { .. }) {
                revealed += 1;
            }
        }
        assert_eq!(revealed, 5);
        assert_eq!(session.lock().await.phase, ScanPhase::Revealing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_schedule_completes_immediately() {
        let (session, id) = revealing_session().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        let schedule = RevealSchedule::new(Vec::new()).unwrap();
        RevealCascade::launch(session.clone(), id, schedule, Arc::new(tx))
            .await
            .unwrap();

        assert!(matches!(
            rx.try_recv(),
            Ok(ScanEvent::PhaseChanged {
                phase: ScanPhase::Complete,
                ..
            })
        ));
    }
}
