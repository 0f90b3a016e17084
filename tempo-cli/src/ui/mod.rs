mod calendar_view;
mod timer_view;

pub use calendar_view::render_calendar;
pub use timer_view::{render_elapsed, render_status};
