pub mod models;
pub mod period;
pub mod scoring;

pub use models::*;
pub use period::{most_recent_saturday, week_label, Clock, FixedClock, SystemClock};
pub use scoring::{ChallengeSets, Side};
