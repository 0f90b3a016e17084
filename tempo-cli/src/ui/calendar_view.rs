use std::fmt::Write;

use tempo_events::{domain::UserEvent, CalendarView, DateKey, DayGroup};

use crate::time_utils::{clock_time, to_local_time};

/// Text rendering of the calendar, one block per day.
pub fn render_calendar(view: &CalendarView) -> String {
    match view {
        CalendarView::Loading => "Loading...\n".to_string(),
        CalendarView::Empty => "No entries yet.\n".to_string(),
        CalendarView::Days(days) => {
            let mut out = String::new();
            for (i, day) in days.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                render_day(&mut out, day);
            }
            out
        }
    }
}

fn render_day(out: &mut String, day: &DayGroup) {
    let _ = writeln!(out, "{}", day_label(day.date));
    for event in &day.events {
        let _ = writeln!(
            out,
            "  {}  #{:<4} {}",
            time_span(event),
            event.id.to_string(),
            event.title
        );
    }
}

/// "5 March"
pub(super) fn day_label(date: DateKey) -> String {
    let date = date.date();
    format!("{} {}", date.day(), date.month())
}

/// "HH:MM - HH:MM" in local time.
fn time_span(event: &UserEvent) -> String {
    format!(
        "{} - {}",
        clock_time(to_local_time(event.date_start)),
        clock_time(to_local_time(event.date_end))
    )
}
