mod decor;
mod easing;
mod transition;

pub use decor::{ScanLine, ScanLineFrame, Spinner, SpinnerDash};
pub use easing::{interpolate, Easing};
pub use transition::{SpringConfig, Transition};
