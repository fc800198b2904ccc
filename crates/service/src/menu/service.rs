use std::sync::Arc;

use tracing::{info, instrument};

use models::{category, menu_item};

use crate::errors::ServiceError;
use crate::events::{CategoryDeleted, EventBus};

use super::store::MenuStore;

/// Menu business service. Every call runs in its own store session.
pub struct MenuService {
    store: Arc<dyn MenuStore>,
    events: Arc<EventBus>,
}

impl MenuService {
    pub fn new(store: Arc<dyn MenuStore>, events: Arc<EventBus>) -> Self { Self { store, events } }

    #[instrument(skip(self))]
    pub async fn create_category(&self, bus_id: i32, name: &str) -> Result<category::Model, ServiceError> {
        let mut session = self.store.begin().await?;
        let created = session.create_category(bus_id, name).await?;
        session.commit().await?;
        info!(category_id = created.id, bus_id, "category_created");
        Ok(created)
    }

    /// Categories of a bus, in display order.
    pub async fn list_categories(&self, bus_id: i32) -> Result<Vec<category::Model>, ServiceError> {
        let mut session = self.store.begin().await?;
        Ok(session.categories_for_bus(bus_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn add_item(&self, category_id: i32, name: &str, price_cents: i32) -> Result<menu_item::Model, ServiceError> {
        let mut session = self.store.begin().await?;
        if session.find_category(category_id).await?.is_none() {
            return Err(ServiceError::not_found("category"));
        }
        let item = session.add_item(category_id, name, price_cents).await?;
        session.commit().await?;
        info!(item_id = item.id, category_id, "menu_item_added");
        Ok(item)
    }

    pub async fn list_items(&self, category_id: i32) -> Result<Vec<menu_item::Model>, ServiceError> {
        let mut session = self.store.begin().await?;
        if session.find_category(category_id).await?.is_none() {
            return Err(ServiceError::not_found("category"));
        }
        Ok(session.items_for_category(category_id).await?)
    }

    /// Deletes one category with its items, then announces it.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, category_id: i32) -> Result<(), ServiceError> {
        let mut session = self.store.begin().await?;
        let found = session
            .find_category(category_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("category"))?;
        session.delete_categories(&[category_id]).await?;
        session.commit().await?;
        info!(category_id, bus_id = found.bus_id, "category_deleted");

        self.events.publish(CategoryDeleted::new(category_id, found.bus_id)).await;
        Ok(())
    }
}
