use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::easing::Easing;

/// Upper bound when searching for a spring's rest time.
const MAX_SPRING_SETTLE_MS: u64 = 10_000;

/// Physical parameters of a damped spring.
///
/// Defaults mirror the stock spring used for every sliding section:
/// mass 1, stiffness 100, damping 10.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpringConfig {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
    pub rest_displacement_threshold: f64,
    pub rest_speed_threshold: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 100.0,
            damping: 10.0,
            rest_displacement_threshold: 0.01,
            rest_speed_threshold: 2.0,
        }
    }
}

impl SpringConfig {
    fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Displacement from the target and velocity at `t` seconds, starting at
    /// rest with displacement `x0`.
    fn state_at(&self, x0: f64, t: f64) -> (f64, f64) {
        let w0 = self.natural_frequency();
        let zeta = self.damping_ratio();

        if zeta < 1.0 {
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * w0 * t).exp();
            let (sin, cos) = (wd * t).sin_cos();
            let x = envelope * (x0 * cos + (zeta * w0 * x0) / wd * sin);
            let v = envelope * (-(w0 * w0 * x0) / wd * sin);
            (x, v)
        } else {
            // Critically damped; overdamped springs are treated the same way.
            let envelope = (-w0 * t).exp();
            let b = w0 * x0;
            let x = (x0 + b * t) * envelope;
            let v = (-w0 * b * t) * envelope;
            (x, v)
        }
    }

    fn is_at_rest(&self, x: f64, v: f64) -> bool {
        x.abs() < self.rest_displacement_threshold && v.abs() < self.rest_speed_threshold
    }
}

/// How an animated value travels from its initial to its final state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Transition {
    Timing {
        #[serde(rename = "durationMs")]
        duration_ms: u64,
        easing: Easing,
    },
    Spring(SpringConfig),
}

impl Transition {
    pub fn timing(duration: Duration) -> Self {
        Transition::Timing {
            duration_ms: duration.as_millis() as u64,
            easing: Easing::Linear,
        }
    }

    pub fn eased(duration: Duration, easing: Easing) -> Self {
        Transition::Timing {
            duration_ms: duration.as_millis() as u64,
            easing,
        }
    }

    pub fn spring() -> Self {
        Transition::Spring(SpringConfig::default())
    }

    /// Value of the animated property `elapsed` after the transition started.
    pub fn value_at(&self, from: f64, to: f64, elapsed: Duration) -> f64 {
        match self {
            Transition::Timing {
                duration_ms,
                easing,
            } => {
                if *duration_ms == 0 {
                    return to;
                }
                let t = elapsed.as_millis() as f64 / *duration_ms as f64;
                from + (to - from) * easing.apply(t)
            }
            Transition::Spring(config) => {
                if self.is_finished(from, to, elapsed) {
                    return to;
                }
                let (x, _) = config.state_at(from - to, elapsed.as_secs_f64());
                to + x
            }
        }
    }

    /// Time until the value has come to rest at `to`.
    pub fn settle_time(&self, from: f64, to: f64) -> Duration {
        match self {
            Transition::Timing { duration_ms, .. } => Duration::from_millis(*duration_ms),
            Transition::Spring(config) => {
                let x0 = from - to;
                (0..=MAX_SPRING_SETTLE_MS)
                    .find(|ms| {
                        let (x, v) = config.state_at(x0, *ms as f64 / 1000.0);
                        config.is_at_rest(x, v)
                    })
                    .map(Duration::from_millis)
                    .unwrap_or(Duration::from_millis(MAX_SPRING_SETTLE_MS))
            }
        }
    }

    pub fn is_finished(&self, from: f64, to: f64, elapsed: Duration) -> bool {
        elapsed >= self.settle_time(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_runs_linearly_to_target() {
        let fade = Transition::timing(Duration::from_millis(600));
        assert_eq!(fade.value_at(0.0, 1.0, Duration::ZERO), 0.0);
        assert!((fade.value_at(0.0, 1.0, Duration::from_millis(300)) - 0.5).abs() < 1e-9);
        assert_eq!(fade.value_at(0.0, 1.0, Duration::from_millis(900)), 1.0);
        assert_eq!(fade.settle_time(0.0, 1.0), Duration::from_millis(600));
    }

    #[test]
    fn test_default_spring_overshoots_then_settles() {
        let slide = Transition::spring();

        // Underdamped: a 50px slide passes zero before coming to rest.
        let overshoot = (0..1000)
            .map(|ms| slide.value_at(50.0, 0.0, Duration::from_millis(ms)))
            .fold(f64::MAX, f64::min);
        assert!(overshoot < 0.0);

        let settle = slide.settle_time(50.0, 0.0);
        assert!(settle > Duration::from_millis(1000));
        assert!(settle < Duration::from_millis(2000));
        assert_eq!(slide.value_at(50.0, 0.0, settle), 0.0);
    }

    #[test]
    fn test_critically_damped_spring_never_overshoots() {
        let spring = Transition::Spring(SpringConfig {
            damping: 20.0,
            ..SpringConfig::default()
        });

        for ms in 0..2000 {
            let value = spring.value_at(0.9, 1.0, Duration::from_millis(ms));
            assert!(value <= 1.0 + 1e-9);
        }
    }
}
