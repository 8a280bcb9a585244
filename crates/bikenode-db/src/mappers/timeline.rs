//! Timeline event entity <-> model mapper

use std::collections::HashMap;

use bikenode_core::entities::{TimelineEvent, TimelineEventType};
use bikenode_core::value_objects::Snowflake;
use tracing::warn;

use crate::models::{TimelineEventModel, TimelineShareModel};

/// Unknown stored types (blocked by a CHECK constraint) fall back to the default type
fn parse_event_type(id: i64, raw: &str) -> TimelineEventType {
    raw.parse().unwrap_or_else(|_| {
        warn!(event_id = id, event_type = raw, "Unknown timeline event type in database");
        TimelineEventType::default()
    })
}

/// Build the entity from its row and the ids of the servers it is shared to
pub fn timeline_event_with_shares(model: TimelineEventModel, shares: Vec<Snowflake>) -> TimelineEvent {
    TimelineEvent {
        id: Snowflake::new(model.id),
        ownership_id: Snowflake::new(model.ownership_id),
        event_type: parse_event_type(model.id, &model.event_type),
        date: model.date,
        title: model.title,
        description: model.description,
        media_url: model.media_url,
        is_public: model.is_public,
        shared_to_servers: shares,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Share rows grouped by event id, preserving row order
pub fn group_shares(rows: Vec<TimelineShareModel>) -> HashMap<i64, Vec<Snowflake>> {
    let mut grouped: HashMap<i64, Vec<Snowflake>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.event_id)
            .or_default()
            .push(Snowflake::new(row.server_id));
    }
    grouped
}
