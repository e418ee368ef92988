use serde::{Deserialize, Serialize};

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 32;
const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Easing {
    Linear,
    /// CSS-style cubic bezier with implicit endpoints (0, 0) and (1, 1).
    Bezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Linear
    }
}

impl Easing {
    /// The "standard" material curve used by the scan line sweep.
    pub const STANDARD: Easing = Easing::Bezier {
        x1: 0.4,
        y1: 0.0,
        x2: 0.2,
        y2: 1.0,
    };

    /// Map linear progress in [0, 1] onto the curve.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::Bezier { x1, y1, x2, y2 } => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let s = solve_curve_x(t, x1, x2);
                bezier_component(s, y1, y2)
            }
        }
    }
}

fn bezier_component(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`.
fn solve_curve_x(x: f64, x1: f64, x2: f64) -> f64 {
    let mut s = x;
    for _ in 0..NEWTON_ITERATIONS {
        let err = bezier_component(s, x1, x2) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < EPSILON {
            break;
        }
        s -= err / slope;
    }

    // Newton stalled on a flat segment; fall back to bisection.
    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    for _ in 0..BISECTION_ITERATIONS {
        let value = bezier_component(s, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

/// Piecewise-linear mapping of `value` from `input` breakpoints onto `output`,
/// clamped to the outermost outputs.
///
/// `input` must be ascending and the same length as `output`.
pub fn interpolate(value: f64, input: &[f64], output: &[f64]) -> f64 {
    debug_assert_eq!(input.len(), output.len());
    let (Some(&first_in), Some(&last_in)) = (input.first(), input.last()) else {
        return value;
    };

    if value <= first_in {
        return output[0];
    }
    if value >= last_in {
        return output[output.len() - 1];
    }

    for window in 0..input.len() - 1 {
        let (a, b) = (input[window], input[window + 1]);
        if value <= b {
            let span = b - a;
            if span <= 0.0 {
                return output[window + 1];
            }
            let t = (value - a) / span;
            return output[window] + (output[window + 1] - output[window]) * t;
        }
    }

    output[output.len() - 1]
}
