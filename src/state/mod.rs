pub mod camera;
pub mod event_log;
pub mod host;

pub use camera::{Camera, Drag};
pub use event_log::{EventLog, LoggedEvent};
pub use host::{HostAction, HostState};
