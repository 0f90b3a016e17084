use tempo_events::{format_elapsed, RecorderState};
use time::OffsetDateTime;

use crate::time_utils::{clock_time, to_local_time};

pub fn render_status(state: &RecorderState, now: OffsetDateTime) -> String {
    match state.date_start() {
        Some(start) => format!(
            "Recording since {} ({})",
            clock_time(to_local_time(start)),
            format_elapsed(state.elapsed_at(now))
        ),
        None => "Recorder is idle".to_string(),
    }
}

/// Single-line counter, redrawn in place on each tick.
pub fn render_elapsed(elapsed: time::Duration) -> String {
    format!("\r● {}", format_elapsed(elapsed))
}
