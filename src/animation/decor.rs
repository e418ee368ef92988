//! Looping decorative animations on the scanning screens.

use serde::Serialize;
use std::time::Duration;

use super::easing::{interpolate, Easing};

const SCAN_SWEEP_MS: u64 = 1500;
const SCAN_HOLD_MS: u64 = 100;
const SCAN_TRAVEL_PX: f64 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanLineFrame {
    /// Normalized position, 0 at the top of the viewfinder and 1 at the bottom.
    pub position: f64,
    pub translate_y: f64,
    pub opacity: f64,
}

/// The line sweeping up and down the camera viewfinder.
///
/// One cycle: sweep down, hold, sweep up, hold. Repeats forever.
#[derive(Debug, Clone, Copy)]
pub struct ScanLine {
    easing: Easing,
}

impl Default for ScanLine {
    fn default() -> Self {
        Self {
            easing: Easing::STANDARD,
        }
    }
}

impl ScanLine {
    pub fn period() -> Duration {
        Duration::from_millis(2 * (SCAN_SWEEP_MS + SCAN_HOLD_MS))
    }

    pub fn frame_at(&self, elapsed: Duration) -> ScanLineFrame {
        let period = Self::period().as_millis() as u64;
        let t = elapsed.as_millis() as u64 % period;

        let position = if t < SCAN_SWEEP_MS {
            self.easing.apply(t as f64 / SCAN_SWEEP_MS as f64)
        } else if t < SCAN_SWEEP_MS + SCAN_HOLD_MS {
            1.0
        } else if t < 2 * SCAN_SWEEP_MS + SCAN_HOLD_MS {
            let into = t - SCAN_SWEEP_MS - SCAN_HOLD_MS;
            1.0 - self.easing.apply(into as f64 / SCAN_SWEEP_MS as f64)
        } else {
            0.0
        };

        ScanLineFrame {
            position,
            translate_y: interpolate(position, &[0.0, 1.0], &[0.0, SCAN_TRAVEL_PX]),
            opacity: interpolate(position, &[0.0, 0.1, 0.9, 1.0], &[0.9, 1.0, 1.0, 0.9]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinnerDash {
    pub index: usize,
    pub rotation_deg: f64,
    pub opacity: f64,
    pub color: &'static str,
}

/// Ring of dashes whose brightness chases around the circle.
#[derive(Debug, Clone, Copy)]
pub struct Spinner {
    pub dashes: usize,
    pub period: Duration,
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            dashes: 30,
            period: Duration::from_millis(2000),
        }
    }
}

impl Spinner {
    pub fn frame_at(&self, elapsed: Duration) -> Vec<SpinnerDash> {
        let total = self.dashes as f64;
        let period_ms = self.period.as_millis().max(1) as f64;
        let cycle = (elapsed.as_millis() as f64 % period_ms) / period_ms;
        let progress = cycle * total;

        (0..self.dashes)
            .map(|index| {
                let dash_progress = (progress + index as f64) % total;
                SpinnerDash {
                    index,
                    rotation_deg: index as f64 * (360.0 / total),
                    opacity: interpolate(
                        dash_progress,
                        &[0.0, total * 0.2, total * 0.5],
                        &[1.0, 0.5, 0.2],
                    ),
                    color: if index < self.dashes / 2 {
                        "#66BB6A"
                    } else {
                        "#FFA726"
                    },
                }
            })
            .collect()
    }
}
