/// Sample entries for `--dev` mode
/// In production, these come from the events backend
use tempo_events::domain::{UserEvent, UserEventId};
use time::{Duration, OffsetDateTime, Time};

pub fn dev_events() -> Vec<UserEvent> {
    dev_events_around(OffsetDateTime::now_utc())
}

pub fn dev_events_around(now: OffsetDateTime) -> Vec<UserEvent> {
    let today = now.date();
    let yesterday = today - Duration::days(1);

    let at = |date: time::Date, hour: u8, minute: u8| {
        OffsetDateTime::new_utc(
            date,
            Time::from_hms(hour, minute, 0).expect("valid time of day"),
        )
    };

    let entry = |id: i64, title: &str, start: OffsetDateTime, end: OffsetDateTime| UserEvent {
        id: UserEventId::new(id),
        title: title.to_string(),
        date_start: start,
        date_end: end,
    };

    vec![
        entry(1, "Standup", at(yesterday, 9, 0), at(yesterday, 9, 15)),
        entry(2, "API refactor", at(yesterday, 9, 30), at(yesterday, 12, 0)),
        entry(3, "Release night", at(yesterday, 22, 30), at(today, 0, 45)),
        entry(4, "PR review", at(today, 10, 0), at(today, 11, 0)),
    ]
}
