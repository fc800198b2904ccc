//! The closed set of integration events exchanged between the bus and menu
//! services. Fields are private so an event cannot change after construction.

use serde::{Deserialize, Serialize};

use super::event::{EventMeta, IntegrationEvent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusCreated {
    #[serde(flatten)]
    meta: EventMeta,
    bus_id: i32,
    plate_number: String,
    description: Option<String>,
}

impl BusCreated {
    pub fn new(bus_id: i32, plate_number: impl Into<String>, description: Option<String>) -> Self {
        Self { meta: EventMeta::new(), bus_id, plate_number: plate_number.into(), description }
    }

    pub fn bus_id(&self) -> i32 { self.bus_id }
    pub fn plate_number(&self) -> &str { &self.plate_number }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
}

impl IntegrationEvent for BusCreated {
    const NAME: &'static str = "BusCreated";
    fn meta(&self) -> &EventMeta { &self.meta }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusUpdated {
    #[serde(flatten)]
    meta: EventMeta,
    bus_id: i32,
    plate_number: String,
    description: Option<String>,
}

impl BusUpdated {
    pub fn new(bus_id: i32, plate_number: impl Into<String>, description: Option<String>) -> Self {
        Self { meta: EventMeta::new(), bus_id, plate_number: plate_number.into(), description }
    }

    pub fn bus_id(&self) -> i32 { self.bus_id }
    pub fn plate_number(&self) -> &str { &self.plate_number }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
}

impl IntegrationEvent for BusUpdated {
    const NAME: &'static str = "BusUpdated";
    fn meta(&self) -> &EventMeta { &self.meta }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusDeleted {
    #[serde(flatten)]
    meta: EventMeta,
    bus_id: i32,
}

impl BusDeleted {
    pub fn new(bus_id: i32) -> Self {
        Self { meta: EventMeta::new(), bus_id }
    }

    pub fn bus_id(&self) -> i32 { self.bus_id }
}

impl IntegrationEvent for BusDeleted {
    const NAME: &'static str = "BusDeleted";
    fn meta(&self) -> &EventMeta { &self.meta }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDeleted {
    #[serde(flatten)]
    meta: EventMeta,
    category_id: i32,
    bus_id: i32,
}

impl CategoryDeleted {
    pub fn new(category_id: i32, bus_id: i32) -> Self {
        Self { meta: EventMeta::new(), category_id, bus_id }
    }

    pub fn category_id(&self) -> i32 { self.category_id }
    pub fn bus_id(&self) -> i32 { self.bus_id }
}

impl IntegrationEvent for CategoryDeleted {
    const NAME: &'static str = "CategoryDeleted";
    fn meta(&self) -> &EventMeta { &self.meta }
}
