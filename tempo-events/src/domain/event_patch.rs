use time::OffsetDateTime;

use super::{NewUserEvent, UserEvent};

/// Partial changes to an existing time entry.
///
/// Fields left as `None` keep the stored value when the patch is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date_start: Option<OffsetDateTime>,
    pub date_end: Option<OffsetDateTime>,
}

impl EventPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn date_start(mut self, date_start: OffsetDateTime) -> Self {
        self.date_start = Some(date_start);
        self
    }

    pub fn date_end(mut self, date_end: OffsetDateTime) -> Self {
        self.date_end = Some(date_end);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.date_start.is_none() && self.date_end.is_none()
    }

    /// Merge the patch onto `current`, producing the full update body.
    pub fn apply_to(&self, current: &UserEvent) -> NewUserEvent {
        NewUserEvent {
            title: self.title.clone().unwrap_or_else(|| current.title.clone()),
            date_start: self.date_start.unwrap_or(current.date_start),
            date_end: self.date_end.unwrap_or(current.date_end),
        }
    }

    /// True when applying the patch would not change `current`.
    pub fn is_noop_for(&self, current: &UserEvent) -> bool {
        self.apply_to(current) == current.to_new()
    }
}
