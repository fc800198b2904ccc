use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::bus;

use crate::errors::ServiceError;

/// Persistence for buses.
#[async_trait]
pub trait BusRepository: Send + Sync {
    async fn create(&self, plate_number: &str, description: Option<&str>) -> Result<bus::Model, ServiceError>;
    async fn find(&self, id: i32) -> Result<Option<bus::Model>, ServiceError>;
    async fn find_by_plate(&self, plate_number: &str) -> Result<Option<bus::Model>, ServiceError>;
    async fn list(&self) -> Result<Vec<bus::Model>, ServiceError>;
    /// `None` when the bus does not exist.
    async fn update(&self, id: i32, plate_number: &str, description: Option<&str>) -> Result<Option<bus::Model>, ServiceError>;
    /// Whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}

pub struct SeaOrmBusRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmBusRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl BusRepository for SeaOrmBusRepository {
    async fn create(&self, plate_number: &str, description: Option<&str>) -> Result<bus::Model, ServiceError> {
        Ok(bus::create(&self.db, plate_number, description).await?)
    }

    async fn find(&self, id: i32) -> Result<Option<bus::Model>, ServiceError> {
        Ok(bus::find(&self.db, id).await?)
    }

    async fn find_by_plate(&self, plate_number: &str) -> Result<Option<bus::Model>, ServiceError> {
        Ok(bus::find_by_plate(&self.db, plate_number).await?)
    }

    async fn list(&self) -> Result<Vec<bus::Model>, ServiceError> {
        Ok(bus::list(&self.db).await?)
    }

    async fn update(&self, id: i32, plate_number: &str, description: Option<&str>) -> Result<Option<bus::Model>, ServiceError> {
        Ok(bus::update(&self.db, id, plate_number, description).await?)
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(bus::hard_delete(&self.db, id).await?)
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use chrono::Utc;

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[derive(Default)]
    pub struct MockBusRepository {
        rows: Mutex<BTreeMap<i32, bus::Model>>,
        next_id: Mutex<i32>,
        fail_deletes: Mutex<bool>,
    }

    impl MockBusRepository {
        /// Make `delete` return a database error.
        pub fn fail_deletes(&self) {
            *lock(&self.fail_deletes) = true;
        }
    }

    #[async_trait]
    impl BusRepository for MockBusRepository {
        async fn create(&self, plate_number: &str, description: Option<&str>) -> Result<bus::Model, ServiceError> {
            if plate_number.trim().is_empty() {
                return Err(ServiceError::Validation("plate number required".into()));
            }
            let mut next = lock(&self.next_id);
            *next += 1;
            let now = Utc::now().into();
            let row = bus::Model {
                id: *next,
                plate_number: plate_number.trim().to_string(),
                description: description.map(str::to_string),
                created_at: now,
                updated_at: now,
            };
            lock(&self.rows).insert(row.id, row.clone());
            Ok(row)
        }

        async fn find(&self, id: i32) -> Result<Option<bus::Model>, ServiceError> {
            Ok(lock(&self.rows).get(&id).cloned())
        }

        async fn find_by_plate(&self, plate_number: &str) -> Result<Option<bus::Model>, ServiceError> {
            let rows = lock(&self.rows);
            Ok(rows.values().find(|b| b.plate_number == plate_number.trim()).cloned())
        }

        async fn list(&self) -> Result<Vec<bus::Model>, ServiceError> {
            Ok(lock(&self.rows).values().cloned().collect())
        }

        async fn update(&self, id: i32, plate_number: &str, description: Option<&str>) -> Result<Option<bus::Model>, ServiceError> {
            let mut rows = lock(&self.rows);
            let Some(row) = rows.get_mut(&id) else { return Ok(None) };
            row.plate_number = plate_number.trim().to_string();
            row.description = description.map(str::to_string);
            row.updated_at = Utc::now().into();
            Ok(Some(row.clone()))
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            if *lock(&self.fail_deletes) {
                return Err(ServiceError::Db("connection reset".into()));
            }
            Ok(lock(&self.rows).remove(&id).is_some())
        }
    }
}
