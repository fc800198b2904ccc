use std::sync::Arc;

use tracing::{debug, info, instrument};

use models::bus;

use crate::errors::ServiceError;
use crate::events::{BusCreated, BusDeleted, BusUpdated, EventBus};

use super::repository::BusRepository;

/// Bus management service; the producer side of the bus events.
///
/// Events go out only after the repository call succeeded, and the outcome
/// of downstream handlers never changes the result reported to the caller.
pub struct FleetService<R: BusRepository> {
    repo: Arc<R>,
    events: Arc<EventBus>,
}

impl<R: BusRepository> FleetService<R> {
    pub fn new(repo: Arc<R>, events: Arc<EventBus>) -> Self { Self { repo, events } }

    /// Register a bus. Plate numbers are unique.
    ///
    /// # Examples
    /// ```
    /// use service::events::{EventBus, ServiceProvider};
    /// use service::fleet::{repository::mock::MockBusRepository, FleetService};
    /// use std::sync::Arc;
    /// let events = Arc::new(EventBus::new(ServiceProvider::default()));
    /// let svc = FleetService::new(Arc::new(MockBusRepository::default()), events);
    /// let bus = tokio_test::block_on(svc.create("34 ABC 12", Some("airport shuttle"))).unwrap();
    /// assert_eq!(bus.plate_number, "34 ABC 12");
    /// assert!(tokio_test::block_on(svc.create("34 ABC 12", None)).is_err());
    /// ```
    #[instrument(skip(self))]
    pub async fn create(&self, plate_number: &str, description: Option<&str>) -> Result<bus::Model, ServiceError> {
        if plate_number.trim().is_empty() {
            return Err(ServiceError::Validation("plate number required".into()));
        }
        if let Some(existing) = self.repo.find_by_plate(plate_number).await? {
            debug!(bus_id = existing.id, "plate number taken");
            return Err(ServiceError::Conflict(format!("plate number {} already registered", existing.plate_number)));
        }
        let created = self.repo.create(plate_number, description).await?;
        info!(bus_id = created.id, plate = %created.plate_number, "bus_created");

        self.events
            .publish(BusCreated::new(created.id, created.plate_number.clone(), created.description.clone()))
            .await;
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, plate_number: &str, description: Option<&str>) -> Result<bus::Model, ServiceError> {
        if plate_number.trim().is_empty() {
            return Err(ServiceError::Validation("plate number required".into()));
        }
        if let Some(existing) = self.repo.find_by_plate(plate_number).await? {
            if existing.id != id {
                return Err(ServiceError::Conflict(format!("plate number {} already registered", existing.plate_number)));
            }
        }
        let updated = self
            .repo
            .update(id, plate_number, description)
            .await?
            .ok_or_else(|| ServiceError::not_found("bus"))?;
        info!(bus_id = id, "bus_updated");

        self.events
            .publish(BusUpdated::new(updated.id, updated.plate_number.clone(), updated.description.clone()))
            .await;
        Ok(updated)
    }

    /// Remove a bus. Returns `false` when it did not exist, in which case
    /// nothing is published. The menu cascade runs before this returns but
    /// its failures are not reported here.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        if !self.repo.delete(id).await? {
            debug!(bus_id = id, "bus not found, nothing deleted");
            return Ok(false);
        }
        info!(bus_id = id, "bus_deleted");
        self.events.publish(BusDeleted::new(id)).await;
        Ok(true)
    }

    pub async fn get(&self, id: i32) -> Result<Option<bus::Model>, ServiceError> {
        self.repo.find(id).await
    }

    pub async fn list(&self) -> Result<Vec<bus::Model>, ServiceError> {
        self.repo.list().await
    }
}
