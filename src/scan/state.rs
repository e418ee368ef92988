use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::settings::ScanSettings;

pub const PROGRESS_COMPLETE: u8 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScanPhase {
    Scanning,
    Revealing,
    Complete,
}

impl Default for ScanPhase {
    fn default() -> Self {
        ScanPhase::Scanning
    }
}

/// Outcome of a single progress tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Still scanning; carries the new progress value.
    Progressed(u8),
    /// Progress just reached 100 and the session entered REVEALING.
    Completed,
    /// The session had already finished scanning; nothing changed.
    Idle,
}

/// One scan lifecycle, from mount of the results screen until it is torn down.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSession {
    pub id: String,
    pub progress: u8,
    pub phase: ScanPhase,
    pub ticks: u32,
    pub step: u8,
    pub started_at: DateTime<Utc>,
    pub revealing_at: Option<DateTime<Utc>>,
}

impl ScanSession {
    pub fn new(settings: &ScanSettings) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            progress: 0,
            phase: ScanPhase::Scanning,
            ticks: 0,
            step: settings.progress_step.clamp(1, PROGRESS_COMPLETE),
            started_at: Utc::now(),
            revealing_at: None,
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.phase == ScanPhase::Scanning
    }

    /// Apply one tick. Progress only grows and is clamped to 100; reaching
    /// 100 flips the phase to REVEALING exactly once.
    pub fn advance(&mut self) -> Advance {
        if !self.is_scanning() {
            return Advance::Idle;
        }

        self.ticks = self.ticks.saturating_add(1);
        self.progress = self
            .progress
            .saturating_add(self.step)
            .min(PROGRESS_COMPLETE);

        if self.progress >= PROGRESS_COMPLETE {
            self.phase = ScanPhase::Revealing;
            self.revealing_at = Some(Utc::now());
            Advance::Completed
        } else {
            Advance::Progressed(self.progress)
        }
    }

    /// REVEALING -> COMPLETE. Returns whether the phase changed.
    pub fn mark_complete(&mut self) -> bool {
        if self.phase != ScanPhase::Revealing {
            return false;
        }
        self.phase = ScanPhase::Complete;
        true
    }

    /// Label shown under the progress bar while scanning.
    pub fn progress_label(&self) -> String {
        format!("{}%", self.progress)
    }

    /// Fill of the progress bar in [0, 1].
    pub fn progress_fraction(&self) -> f64 {
        f64::from(self.progress) / f64::from(PROGRESS_COMPLETE)
    }
}
