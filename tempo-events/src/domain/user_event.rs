use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// A server-assigned time entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserEventId(i64);

impl UserEventId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserEventId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<UserEventId> for i64 {
    fn from(id: UserEventId) -> Self {
        id.0
    }
}

impl std::str::FromStr for UserEventId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// A single recorded time interval with a title, as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    pub id: UserEventId,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub date_end: OffsetDateTime,
}

impl UserEvent {
    /// The body sent back to the backend when this entry is updated.
    pub fn to_new(&self) -> NewUserEvent {
        NewUserEvent {
            title: self.title.clone(),
            date_start: self.date_start,
            date_end: self.date_end,
        }
    }

    pub fn duration(&self) -> time::Duration {
        self.date_end - self.date_start
    }
}

/// A time entry that has not been assigned an id yet.
///
/// Used as the request body for both create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserEvent {
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub date_end: OffsetDateTime,
}

impl NewUserEvent {
    pub fn new(
        title: impl Into<String>,
        date_start: OffsetDateTime,
        date_end: OffsetDateTime,
    ) -> Self {
        Self {
            title: title.into(),
            date_start,
            date_end,
        }
    }

    pub fn with_id(self, id: UserEventId) -> UserEvent {
        UserEvent {
            id,
            title: self.title,
            date_start: self.date_start,
            date_end: self.date_end,
        }
    }
}
