use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::events::{BusDeleted, EventBus, FromScope, IntegrationEventHandler, Scope};

use super::errors::MenuError;
use super::store::MenuStore;

/// Subscribe the menu service's handlers. Called once at startup.
pub fn register(bus: &EventBus) {
    bus.subscribe::<BusDeleted, CascadeDeleteCategories>();
}

/// Removes every category (and, through the storage cascade, every item) of
/// a deleted bus.
///
/// Storage failures are logged and swallowed. Nothing requeues the event, so
/// a failed cascade leaves orphaned categories behind.
pub struct CascadeDeleteCategories {
    store: Arc<dyn MenuStore>,
}

impl FromScope for CascadeDeleteCategories {
    fn from_scope(scope: &Scope) -> Option<Self> {
        Some(Self { store: scope.get::<Arc<dyn MenuStore>>()? })
    }
}

impl CascadeDeleteCategories {
    async fn cascade(&self, bus_id: i32) -> Result<u64, MenuError> {
        let mut session = self.store.begin().await?;
        let categories = session.categories_for_bus(bus_id).await?;
        if categories.is_empty() {
            info!(bus_id, "no categories belong to deleted bus");
            return Ok(0);
        }
        let ids: Vec<i32> = categories.iter().map(|c| c.id).collect();
        let removed = session.delete_categories(&ids).await?;
        session.commit().await?;
        Ok(removed)
    }
}

#[async_trait]
impl IntegrationEventHandler<BusDeleted> for CascadeDeleteCategories {
    async fn handle(&self, event: &BusDeleted) -> anyhow::Result<()> {
        let bus_id = event.bus_id();
        match self.cascade(bus_id).await {
            Ok(0) => {}
            Ok(removed) => info!(bus_id, removed, "deleted categories of deleted bus"),
            Err(e) => error!(bus_id, error = %e, "failed to delete categories of deleted bus; menu rows left orphaned"),
        }
        Ok(())
    }
}
