pub mod autopilot;
pub mod headless;
pub mod session;

pub use autopilot::{AutopilotMode, PlaybackSpeed};
pub use headless::{HeadlessMode, HeadlessSummary};
pub use session::{GameEnd, GameOutcome, Session, TickOutcome};
