pub mod cascade;
pub mod schedule;

pub use cascade::RevealCascade;
pub use schedule::{RevealSchedule, RevealStep, SectionId, SectionMotion, SectionStyle};
