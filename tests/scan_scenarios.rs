//! End-to-end scan lifecycles driven on a paused clock.

use std::{sync::Arc, time::Duration};

use nutrak_lib::{
    events::ScanEvent,
    reveal::SectionId,
    scan::{ScanController, ScanPhase},
    settings::UserSettings,
};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    time::{self, Instant},
};

fn drain(rx: &mut UnboundedReceiver<ScanEvent>) -> Vec<ScanEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test(start_paused = true)]
async fn full_session_reveals_every_section() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = ScanController::new(&UserSettings::default(), Arc::new(tx)).unwrap();
    let started = Instant::now();
    controller.start().await.unwrap();

    time::sleep(Duration::from_millis(2501)).await;
    let snapshot = controller.get_snapshot().await;
    assert_eq!(snapshot.session.progress, 100);
    assert_eq!(snapshot.session.phase, ScanPhase::Revealing);

    time::sleep_until(started + Duration::from_millis(2500 + 901)).await;
    let events = drain(&mut rx);

    let progress: Vec<u8> = events
        .iter()
        .filter_map(|event| match event {
            ScanEvent::ScanProgress { progress, .. } => Some(*progress),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![20, 40, 60, 80, 100]);

    let revealed: Vec<(SectionId, u64)> = events
        .iter()
        .filter_map(|event| match event {
            ScanEvent::SectionRevealed {
                section, offset_ms, ..
            } => Some((*section, *offset_ms)),
            _ => None,
        })
        .collect();
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

    // Every event belongs to the one session.
    let id = snapshot.session.id;
    assert!(events.iter().all(|event| event.session_id() == id));
}

#[tokio::test(start_paused = true)]
async fn teardown_after_first_tick_never_reveals() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = ScanController::new(&UserSettings::default(), Arc::new(tx)).unwrap();
    controller.start().await.unwrap();

    time::sleep(Duration::from_millis(600)).await;
    controller.teardown();

    time::sleep(Duration::from_secs(30)).await;
    let snapshot = controller.get_snapshot().await;
    assert_eq!(snapshot.session.progress, 20);
    assert_eq!(snapshot.session.phase, ScanPhase::Scanning);

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        ScanEvent::ScanProgress { progress: 20, .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_cancels_the_ticker() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = ScanController::new(&UserSettings::default(), Arc::new(tx)).unwrap();
    controller.start().await.unwrap();

    time::sleep(Duration::from_millis(1200)).await;
    drop(controller);

    time::sleep(Duration::from_secs(30)).await;
    let progress: Vec<u8> = drain(&mut rx)
        .into_iter()
        .filter_map(|event| match event {
            ScanEvent::ScanProgress { progress, .. } => Some(progress),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![20, 40]);
}
