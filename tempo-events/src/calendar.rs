//! Day buckets for the calendar view.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset};

use crate::{domain::UserEvent, EventsState};

/// A UTC calendar day, shown as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(Date);

impl DateKey {
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    pub fn from_timestamp(timestamp: OffsetDateTime) -> Self {
        Self(timestamp.to_offset(UtcOffset::UTC).date())
    }

    pub fn date(&self) -> Date {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month() as u8,
            self.0.day()
        )
    }
}

/// Direction in which day buckets are listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Bucket events by the UTC day of their start and of their end.
///
/// An event spanning midnight lands in both days. Within a day, events keep
/// the order of `events`.
pub fn group_by_day<'a, I>(events: I) -> HashMap<DateKey, Vec<UserEvent>>
where
    I: IntoIterator<Item = &'a UserEvent>,
{
    let mut groups: HashMap<DateKey, Vec<UserEvent>> = HashMap::new();

    for event in events {
        let start_key = DateKey::from_timestamp(event.date_start);
        let end_key = DateKey::from_timestamp(event.date_end);

        groups.entry(start_key).or_default().push(event.clone());
        if end_key != start_key {
            groups.entry(end_key).or_default().push(event.clone());
        }
    }

    groups
}

pub fn sorted_day_keys<V>(groups: &HashMap<DateKey, V>, order: SortOrder) -> Vec<DateKey> {
    let mut keys: Vec<DateKey> = groups.keys().copied().collect();
    match order {
        SortOrder::Ascending => keys.sort(),
        SortOrder::Descending => keys.sort_by(|a, b| b.cmp(a)),
    }
    keys
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub date: DateKey,
    pub events: Vec<UserEvent>,
}

/// What the calendar should show for a store snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarView {
    /// Nothing loaded yet.
    Loading,
    /// Loaded, and there are no entries.
    Empty,
    Days(Vec<DayGroup>),
}

impl CalendarView {
    pub fn from_state(state: &EventsState, order: SortOrder) -> Self {
        if state.is_empty() {
            return if state.has_loaded() {
                CalendarView::Empty
            } else {
                CalendarView::Loading
            };
        }

        Self::Days(day_groups(state.events(), order))
    }
}

pub fn day_groups<'a, I>(events: I, order: SortOrder) -> Vec<DayGroup>
where
    I: IntoIterator<Item = &'a UserEvent>,
{
    let mut groups = group_by_day(events);
    sorted_day_keys(&groups, order)
        .into_iter()
        .filter_map(|date| {
            groups
                .remove(&date)
                .map(|events| DayGroup { date, events })
        })
        .collect()
}
