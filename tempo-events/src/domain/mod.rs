mod event_patch;
mod user_event;

pub use event_patch::*;
pub use user_event::*;
