use rand::Rng;
use serde::Serialize;
use std::{ops::Range, time::Duration};

use crate::animation::Transition;

pub const DAY_LABELS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

const BAR_HEIGHT_PX: Range<f64> = 20.0..80.0;
const BAR_STAGGER_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeBar {
    pub label: &'static str,
    pub height_px: f64,
    #[serde(rename = "delayMs", serialize_with = "serialize_millis")]
    pub delay: Duration,
    pub transition: Transition,
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(value.as_millis() as u64)
}

impl IntakeBar {
    /// Rendered height `since_shown` after the results appeared.
    pub fn height_at(&self, since_shown: Duration) -> f64 {
        match since_shown.checked_sub(self.delay) {
            Some(elapsed) => self.transition.value_at(0.0, self.height_px, elapsed),
            None => 0.0,
        }
    }
}

/// The week-at-a-glance bar chart on the results screen. Bars grow from zero
/// one after another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyChart {
    pub bars: Vec<IntakeBar>,
}

impl WeeklyChart {
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng>(rng: &mut R) -> Self {
        let bars = DAY_LABELS
            .into_iter()
            .enumerate()
            .map(|(index, label)| IntakeBar {
                label,
                height_px: rng.gen_range(BAR_HEIGHT_PX),
                delay: Duration::from_millis(index as u64 * BAR_STAGGER_MS),
                transition: Transition::spring(),
            })
            .collect();
        Self { bars }
    }

    pub fn heights_at(&self, since_shown: Duration) -> Vec<f64> {
        self.bars
            .iter()
            .map(|bar| bar.height_at(since_shown))
            .collect()
    }

    pub fn tallest(&self) -> Option<&IntakeBar> {
        self.bars
            .iter()
            .max_by(|a, b| a.height_px.total_cmp(&b.height_px))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_seven_bars_within_range() {
        let chart = WeeklyChart::generate();
        assert_eq!(chart.bars.len(), 7);
        for bar in &chart.bars {
            assert!(BAR_HEIGHT_PX.contains(&bar.height_px), "{}", bar.height_px);
        }
        assert_eq!(chart.bars[0].label, "S");
        assert_eq!(chart.bars[1].label, "M");
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = WeeklyChart::generate_with(&mut StdRng::seed_from_u64(7));
        let b = WeeklyChart::generate_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_bars_grow_in_turn() {
        let chart = WeeklyChart::generate_with(&mut StdRng::seed_from_u64(1));

        let early = chart.heights_at(Duration::from_millis(250));
        assert!(early[0] > 0.0);
        assert!(early[2] > 0.0);
        assert_eq!(early[3], 0.0);
        assert_eq!(early[6], 0.0);

        let settled = chart.heights_at(Duration::from_secs(5));
        for (height, bar) in settled.iter().zip(&chart.bars) {
            assert_eq!(*height, bar.height_px);
        }
    }
}
