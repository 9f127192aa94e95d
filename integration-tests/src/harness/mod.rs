pub mod tracing;
mod workspace;

pub use self::tracing::{CapturedEvent, EventLog, captured_events};
pub use workspace::{TestWorkspace, fixture};
