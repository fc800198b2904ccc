use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and timestamp shared by every integration event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    id: Uuid,
    occurred_on: DateTime<Utc>,
}

impl EventMeta {
    /// Fresh id and the current UTC time.
    pub fn new() -> Self {
        Self { id: Uuid::new_v4(), occurred_on: Utc::now() }
    }

    pub fn id(&self) -> Uuid { self.id }

    pub fn occurred_on(&self) -> DateTime<Utc> { self.occurred_on }
}

impl Default for EventMeta {
    fn default() -> Self { Self::new() }
}

/// An immutable fact broadcast to decouple producers from consumers.
///
/// `NAME` is the key handlers are registered under.
pub trait IntegrationEvent: Send + Sync + 'static {
    const NAME: &'static str;

    fn meta(&self) -> &EventMeta;

    fn id(&self) -> Uuid { self.meta().id() }

    fn occurred_on(&self) -> DateTime<Utc> { self.meta().occurred_on() }
}
