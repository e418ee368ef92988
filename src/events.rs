use serde::Serialize;
use std::{
    io::Write,
    sync::{Arc, Mutex},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    animation::Transition,
    reveal::SectionId,
    scan::ScanPhase,
};

/// Everything the presentation layer hears from a scan session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ScanEvent {
    #[serde(rename_all = "camelCase")]
    ScanProgress { session_id: String, progress: u8 },
    #[serde(rename_all = "camelCase")]
    PhaseChanged { session_id: String, phase: ScanPhase },
    #[serde(rename_all = "camelCase")]
    SectionRevealed {
        session_id: String,
        section: SectionId,
        /// Measured time since REVEALING began.
        offset_ms: u64,
        opacity: Transition,
        motion: Transition,
    },
    #[serde(rename_all = "camelCase")]
    SectionSettled {
        session_id: String,
        section: SectionId,
        offset_ms: u64,
    },
}

impl ScanEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ScanEvent::ScanProgress { .. } => "scan-progress",
            ScanEvent::PhaseChanged { .. } => "phase-changed",
            ScanEvent::SectionRevealed { .. } => "section-revealed",
            ScanEvent::SectionSettled { .. } => "section-settled",
        }
    }

    pub fn session_id(&self) -> &str {
        match self {
            ScanEvent::ScanProgress { session_id, .. }
            | ScanEvent::PhaseChanged { session_id, .. }
            | ScanEvent::SectionRevealed { session_id, .. }
            | ScanEvent::SectionSettled { session_id, .. } => session_id,
        }
    }
}

/// Receiver of scan events. Delivery is best effort: a sink that can no
/// longer deliver drops the event.
pub trait EventSink: Send + Sync + 'static {
    fn emit(&self, event: ScanEvent);
}

pub type SharedSink = Arc<dyn EventSink>;

impl EventSink for UnboundedSender<ScanEvent> {
    fn emit(&self, event: ScanEvent) {
        let _ = self.send(event);
    }
}

/// Writes each event to the log at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: ScanEvent) {
        log::info!("{} {:?}", event.name(), event);
    }
}

/// Writes each event as one JSON object per line.
pub struct JsonLinesSink<W: Write + Send + 'static> {
    writer: Mutex<W>,
}

impl<W: Write + Send + 'static> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl JsonLinesSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> EventSink for JsonLinesSink<W> {
    fn emit(&self, event: ScanEvent) {
        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(err) => {
                log::error!("Failed to serialize {}: {}", event.name(), err);
                return;
            }
        };

        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(err) = writeln!(writer, "{line}").and_then(|_| writer.flush()) {
            log::warn!("Failed to write {}: {}", event.name(), err);
        }
    }
}
