pub mod controller;
pub mod state;

pub use controller::{ScanController, ScanSnapshot};
pub use state::{Advance, ScanPhase, ScanSession, PROGRESS_COMPLETE};
