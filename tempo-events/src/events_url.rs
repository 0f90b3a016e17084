use crate::domain::UserEventId;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsURL(String);

impl AsRef<str> for EventsURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Default for EventsURL {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl EventsURL {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into().trim_end_matches('/').to_string())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    /// `<base>/events`
    pub fn events(&self) -> Self {
        self.append_path("/events")
    }

    /// `<base>/events/{id}`
    pub fn event(&self, id: UserEventId) -> Self {
        self.events().append_path(&id.to_string())
    }
}
