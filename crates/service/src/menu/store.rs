use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use models::{category, menu_item};

use super::errors::MenuError;

/// Source of menu storage sessions.
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Open a fresh unit of work. Dropping it without `commit` discards
    /// its writes.
    async fn begin(&self) -> Result<Box<dyn MenuSession>, MenuError>;
}

/// One unit of work against the menu store.
#[async_trait]
pub trait MenuSession: Send {
    async fn categories_for_bus(&mut self, bus_id: i32) -> Result<Vec<category::Model>, MenuError>;
    async fn find_category(&mut self, id: i32) -> Result<Option<category::Model>, MenuError>;
    async fn create_category(&mut self, bus_id: i32, name: &str) -> Result<category::Model, MenuError>;
    /// Removes the categories and, through the storage cascade, their items.
    async fn delete_categories(&mut self, ids: &[i32]) -> Result<u64, MenuError>;
    async fn items_for_category(&mut self, category_id: i32) -> Result<Vec<menu_item::Model>, MenuError>;
    async fn add_item(&mut self, category_id: i32, name: &str, price_cents: i32) -> Result<menu_item::Model, MenuError>;
    async fn commit(self: Box<Self>) -> Result<(), MenuError>;
}

/// SeaORM-backed store; every session is a database transaction.
#[derive(Clone)]
pub struct SeaOrmMenuStore {
    pub db: DatabaseConnection,
}

impl SeaOrmMenuStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl MenuStore for SeaOrmMenuStore {
    async fn begin(&self) -> Result<Box<dyn MenuSession>, MenuError> {
        let txn = self.db.begin().await?;
        Ok(Box::new(SeaOrmMenuSession { txn }))
    }
}

struct SeaOrmMenuSession {
    txn: DatabaseTransaction,
}

#[async_trait]
impl MenuSession for SeaOrmMenuSession {
    async fn categories_for_bus(&mut self, bus_id: i32) -> Result<Vec<category::Model>, MenuError> {
        Ok(category::find_by_bus(&self.txn, bus_id).await?)
    }

    async fn find_category(&mut self, id: i32) -> Result<Option<category::Model>, MenuError> {
        Ok(category::find(&self.txn, id).await?)
    }

    async fn create_category(&mut self, bus_id: i32, name: &str) -> Result<category::Model, MenuError> {
        Ok(category::create(&self.txn, bus_id, name).await?)
    }

    async fn delete_categories(&mut self, ids: &[i32]) -> Result<u64, MenuError> {
        Ok(category::delete_many(&self.txn, ids).await?)
    }

    async fn items_for_category(&mut self, category_id: i32) -> Result<Vec<menu_item::Model>, MenuError> {
        Ok(menu_item::find_by_category(&self.txn, category_id).await?)
    }

    async fn add_item(&mut self, category_id: i32, name: &str, price_cents: i32) -> Result<menu_item::Model, MenuError> {
        Ok(menu_item::create(&self.txn, category_id, name, price_cents).await?)
    }

    async fn commit(self: Box<Self>) -> Result<(), MenuError> {
        self.txn.commit().await?;
        Ok(())
    }
}

/// In-memory store for tests, with fault injection.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    use chrono::Utc;

    /// Storage operation that should fail while armed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Fault {
        Begin,
        Read,
        Write,
        Commit,
    }

    #[derive(Clone, Default)]
    struct Tables {
        categories: BTreeMap<i32, category::Model>,
        items: BTreeMap<i32, menu_item::Model>,
        next_category_id: i32,
        next_item_id: i32,
    }

    #[derive(Default)]
    struct Shared {
        tables: Mutex<Tables>,
        fault: Mutex<Option<Fault>>,
        commits: Mutex<usize>,
    }

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[derive(Clone, Default)]
    pub struct InMemoryMenuStore {
        shared: Arc<Shared>,
    }

    impl InMemoryMenuStore {
        pub fn new() -> Self { Self::default() }

        /// Make every later `fault` operation fail until cleared.
        pub fn fail_on(&self, fault: Fault) {
            *lock(&self.shared.fault) = Some(fault);
        }

        pub fn clear_fault(&self) {
            *lock(&self.shared.fault) = None;
        }

        /// Number of committed sessions that carried writes.
        pub fn commits(&self) -> usize { *lock(&self.shared.commits) }

        pub fn category_count(&self) -> usize { lock(&self.shared.tables).categories.len() }

        pub fn item_count(&self) -> usize { lock(&self.shared.tables).items.len() }

        fn check(&self, op: Fault) -> Result<(), MenuError> {
            if *lock(&self.shared.fault) == Some(op) {
                return Err(MenuError::Storage(format!("injected {:?} fault", op)));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MenuStore for InMemoryMenuStore {
        async fn begin(&self) -> Result<Box<dyn MenuSession>, MenuError> {
            self.check(Fault::Begin)?;
            let working = lock(&self.shared.tables).clone();
            Ok(Box::new(InMemorySession { store: self.clone(), working, dirty: false }))
        }
    }

    /// Works on a copy of the tables; `commit` publishes it.
    struct InMemorySession {
        store: InMemoryMenuStore,
        working: Tables,
        dirty: bool,
    }

    #[async_trait]
    impl MenuSession for InMemorySession {
        async fn categories_for_bus(&mut self, bus_id: i32) -> Result<Vec<category::Model>, MenuError> {
            self.store.check(Fault::Read)?;
            let mut found: Vec<_> = self.working.categories.values().filter(|c| c.bus_id == bus_id).cloned().collect();
            found.sort_by_key(|c| (c.position, c.id));
            Ok(found)
        }

        async fn find_category(&mut self, id: i32) -> Result<Option<category::Model>, MenuError> {
            self.store.check(Fault::Read)?;
            Ok(self.working.categories.get(&id).cloned())
        }

        async fn create_category(&mut self, bus_id: i32, name: &str) -> Result<category::Model, MenuError> {
            self.store.check(Fault::Write)?;
            if name.trim().is_empty() {
                return Err(MenuError::Validation("name required".into()));
            }
            let position = self.working.categories.values().filter(|c| c.bus_id == bus_id).count() as i32;
            self.working.next_category_id += 1;
            let model = category::Model {
                id: self.working.next_category_id,
                bus_id,
                name: name.trim().to_string(),
                position,
                created_at: Utc::now().into(),
            };
            self.working.categories.insert(model.id, model.clone());
            self.dirty = true;
            Ok(model)
        }

        async fn delete_categories(&mut self, ids: &[i32]) -> Result<u64, MenuError> {
            self.store.check(Fault::Write)?;
            let mut removed = 0;
            for id in ids {
                if self.working.categories.remove(id).is_some() {
                    removed += 1;
                }
            }
            self.working.items.retain(|_, item| !ids.contains(&item.category_id));
            self.dirty |= removed > 0;
            Ok(removed)
        }

        async fn items_for_category(&mut self, category_id: i32) -> Result<Vec<menu_item::Model>, MenuError> {
            self.store.check(Fault::Read)?;
            Ok(self.working.items.values().filter(|i| i.category_id == category_id).cloned().collect())
        }

        async fn add_item(&mut self, category_id: i32, name: &str, price_cents: i32) -> Result<menu_item::Model, MenuError> {
            self.store.check(Fault::Write)?;
            if name.trim().is_empty() {
                return Err(MenuError::Validation("name required".into()));
            }
            if price_cents < 0 {
                return Err(MenuError::Validation("price must not be negative".into()));
            }
            if !self.working.categories.contains_key(&category_id) {
                return Err(MenuError::Storage(format!("foreign key violation: category {} missing", category_id)));
            }
            self.working.next_item_id += 1;
            let model = menu_item::Model {
                id: self.working.next_item_id,
                category_id,
                name: name.trim().to_string(),
                price_cents,
                created_at: Utc::now().into(),
            };
            self.working.items.insert(model.id, model.clone());
            self.dirty = true;
            Ok(model)
        }

        async fn commit(self: Box<Self>) -> Result<(), MenuError> {
            let InMemorySession { store, working, dirty } = *self;
            store.check(Fault::Commit)?;
            if dirty {
                *lock(&store.shared.tables) = working;
                *lock(&store.shared.commits) += 1;
            }
            Ok(())
        }
    }
}
