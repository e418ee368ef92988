use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::animation::Transition;

const SECTION_FADE_MS: u64 = 600;
const BUTTON_FADE_MS: u64 = 400;
const SECTION_SLIDE_PX: f64 = 50.0;
const BUTTON_START_SCALE: f64 = 0.9;

/// Result-screen blocks that appear one after another once a scan finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    Overview,
    Macronutrients,
    Micronutrients,
    WeeklyChart,
    ActionButton,
}

impl SectionId {
    pub const ALL: [SectionId; 5] = [
        SectionId::Overview,
        SectionId::Macronutrients,
        SectionId::Micronutrients,
        SectionId::WeeklyChart,
        SectionId::ActionButton,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionId::Overview => "Nutritional Overview",
            SectionId::Macronutrients => "Macronutrients",
            SectionId::Micronutrients => "Micronutrients",
            SectionId::WeeklyChart => "Weekly Progress",
            SectionId::ActionButton => "Done",
        }
    }
}

/// The positional property a section animates alongside its fade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum SectionMotion {
    /// Slides up from `from_px` below its resting place.
    Slide { from_px: f64 },
    /// Grows from `from_scale` to full size.
    Grow { from_scale: f64 },
}

impl SectionMotion {
    fn endpoints(&self) -> (f64, f64) {
        match *self {
            SectionMotion::Slide { from_px } => (from_px, 0.0),
            SectionMotion::Grow { from_scale } => (from_scale, 1.0),
        }
    }
}

/// Rendered state of a section at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStyle {
    pub opacity: f64,
    pub translate_y: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealStep {
    #[serde(rename = "delayMs", serialize_with = "serialize_millis")]
    pub delay: Duration,
    pub section: SectionId,
    pub fade: Transition,
    pub motion: SectionMotion,
    pub motion_transition: Transition,
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(value.as_millis() as u64)
}

impl RevealStep {
    pub fn for_section(section: SectionId, delay: Duration) -> Self {
        let (fade_ms, motion) = match section {
            SectionId::ActionButton => (
                BUTTON_FADE_MS,
                SectionMotion::Grow {
                    from_scale: BUTTON_START_SCALE,
                },
            ),
            _ => (
                SECTION_FADE_MS,
                SectionMotion::Slide {
                    from_px: SECTION_SLIDE_PX,
                },
            ),
        };

        Self {
            delay,
            section,
            fade: Transition::timing(Duration::from_millis(fade_ms)),
            motion,
            motion_transition: Transition::spring(),
        }
    }

    /// Time from the start of its own transition until the section is at rest.
    pub fn settle_time(&self) -> Duration {
        let (from, to) = self.motion.endpoints();
        self.fade
            .settle_time(0.0, 1.0)
            .max(self.motion_transition.settle_time(from, to))
    }

    /// Offset from the start of REVEALING at which the section is at rest.
    pub fn settled_offset(&self) -> Duration {
        self.delay + self.settle_time()
    }

    /// Style of the section `since_reveal` after REVEALING began.
    pub fn style_at(&self, since_reveal: Duration) -> SectionStyle {
        let (from, to) = self.motion.endpoints();
        let Some(elapsed) = since_reveal.checked_sub(self.delay) else {
            return self.style_with(0.0, from);
        };

        self.style_with(
            self.fade.value_at(0.0, 1.0, elapsed),
            self.motion_transition.value_at(from, to, elapsed),
        )
    }

    fn style_with(&self, opacity: f64, motion_value: f64) -> SectionStyle {
        match self.motion {
            SectionMotion::Slide { .. } => SectionStyle {
                opacity,
                translate_y: motion_value,
                scale: 1.0,
            },
            SectionMotion::Grow { .. } => SectionStyle {
                opacity,
                translate_y: 0.0,
                scale: motion_value,
            },
        }
    }
}

/// Ordered (delay, section) pairs consumed once REVEALING begins.
///
/// Delays never decrease and each section appears at most once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevealSchedule {
    steps: Vec<RevealStep>,
}

impl Default for RevealSchedule {
    fn default() -> Self {
        Self::staggered(Duration::from_millis(100), Duration::from_millis(200))
    }
}

impl RevealSchedule {
    pub fn new(steps: Vec<RevealStep>) -> Result<Self> {
        for (index, pair) in steps.windows(2).enumerate() {
            if pair[1].delay < pair[0].delay {
                bail!(
                    "reveal step {} ({:?}) is scheduled before its predecessor",
                    index + 1,
                    pair[1].section
                );
            }
        }
        for (index, step) in steps.iter().enumerate() {
            if steps[..index].iter().any(|prev| prev.section == step.section) {
                bail!("section {:?} appears more than once", step.section);
            }
        }
        Ok(Self { steps })
    }

    /// Every section in display order, the first at `base`, each following
    /// one `stagger` later.
    pub fn staggered(base: Duration, stagger: Duration) -> Self {
        let steps = SectionId::ALL
            .iter()
            .enumerate()
            .map(|(index, section)| RevealStep::for_section(*section, base + stagger * index as u32))
            .collect();
        Self { steps }
    }

    pub fn steps(&self) -> &[RevealStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Offset of the last reveal.
    pub fn last_delay(&self) -> Duration {
        self.steps.last().map(|step| step.delay).unwrap_or_default()
    }

    /// Offset at which every section is at rest.
    pub fn settled_offset(&self) -> Duration {
        self.steps
            .iter()
            .map(RevealStep::settled_offset)
            .max()
            .unwrap_or_default()
    }

    /// Sections visible (transition started) `since_reveal` after REVEALING began.
    pub fn revealed_by(&self, since_reveal: Duration) -> Vec<SectionId> {
        self.steps
            .iter()
            .filter(|step| step.delay <= since_reveal)
            .map(|step| step.section)
            .collect()
    }
}
