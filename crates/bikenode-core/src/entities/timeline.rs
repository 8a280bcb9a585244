//! Timeline events recorded against an ownership

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::Snowflake;

/// Kind of timeline entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineEventType {
    Photo,
    #[default]
    Maintenance,
    Modification,
    Repair,
    Trip,
    Milestone,
}

impl TimelineEventType {
    pub const ALL: [TimelineEventType; 6] = [
        Self::Photo,
        Self::Maintenance,
        Self::Modification,
        Self::Repair,
        Self::Trip,
        Self::Milestone,
    ];

    /// Database / wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "PHOTO",
            Self::Maintenance => "MAINTENANCE",
            Self::Modification => "MODIFICATION",
            Self::Repair => "REPAIR",
            Self::Trip => "TRIP",
            Self::Milestone => "MILESTONE",
        }
    }
}

impl fmt::Display for TimelineEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown timeline event type: {0}")]
pub struct UnknownEventType(pub String);

impl FromStr for TimelineEventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

/// Dated entry attached to one ownership
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEvent {
    pub id: Snowflake,
    pub ownership_id: Snowflake,
    pub event_type: TimelineEventType,
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub media_url: Option<String>,
    pub is_public: bool,
    /// Servers (local ids) this event is shared to
    pub shared_to_servers: Vec<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimelineEvent {
    pub fn new(
        id: Snowflake,
        ownership_id: Snowflake,
        event_type: TimelineEventType,
        date: NaiveDate,
        title: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            ownership_id,
            event_type,
            date,
            title,
            description: String::new(),
            media_url: None,
            is_public: false,
            shared_to_servers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the share targets, dropping duplicates while keeping order
    pub fn set_shares(&mut self, servers: Vec<Snowflake>) {
        let mut seen = std::collections::HashSet::new();
        self.shared_to_servers = servers.into_iter().filter(|s| seen.insert(*s)).collect();
    }

    #[inline]
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
