//! Minimal dependency container with per-scope lifetimes.
//!
//! Singletons are shared by every scope. Scoped factories run once per
//! [`Scope`], so each event dispatch sees its own freshly built values.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

type Instance = Box<dyn Any + Send + Sync>;
type Factory = Box<dyn Fn() -> Instance + Send + Sync>;

#[derive(Default)]
struct Registrations {
    singletons: HashMap<TypeId, Instance>,
    scoped: HashMap<TypeId, Factory>,
}

/// Root container. Cheap to clone.
#[derive(Clone, Default)]
pub struct ServiceProvider {
    inner: Arc<Registrations>,
}

impl ServiceProvider {
    pub fn builder() -> ServiceProviderBuilder { ServiceProviderBuilder::default() }

    /// Open a new resolution scope, running every scoped factory once.
    pub fn create_scope(&self) -> Scope {
        let instances = self
            .inner
            .scoped
            .iter()
            .map(|(type_id, factory)| (*type_id, factory()))
            .collect();
        Scope { id: Uuid::new_v4(), root: Arc::clone(&self.inner), instances }
    }
}

#[derive(Default)]
pub struct ServiceProviderBuilder {
    registrations: Registrations,
}

impl ServiceProviderBuilder {
    /// Register a value shared by all scopes. A later registration of the
    /// same type replaces the earlier one.
    pub fn singleton<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.registrations.singletons.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    /// Register a factory invoked once per scope.
    pub fn scoped<T, F>(mut self, factory: F) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.registrations
            .scoped
            .insert(TypeId::of::<T>(), Box::new(move || Box::new(factory()) as Instance));
        self
    }

    pub fn build(self) -> ServiceProvider {
        ServiceProvider { inner: Arc::new(self.registrations) }
    }
}

/// Isolated lifetime boundary for dependency instances.
pub struct Scope {
    id: Uuid,
    root: Arc<Registrations>,
    instances: HashMap<TypeId, Instance>,
}

impl Scope {
    pub fn id(&self) -> Uuid { self.id }

    /// Scoped values win over singletons of the same type.
    pub fn get<T>(&self) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<T>();
        self.instances
            .get(&type_id)
            .or_else(|| self.root.singletons.get(&type_id))
            .and_then(|instance| instance.downcast_ref::<T>())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq)]
    struct Session(usize);

    trait Greeter: Send + Sync {
        fn greet(&self) -> &'static str;
    }

    struct Hello;

    impl Greeter for Hello {
        fn greet(&self) -> &'static str { "hello" }
    }

    #[test]
    fn singletons_are_shared_across_scopes() {
        let provider = ServiceProvider::builder()
            .singleton::<Arc<dyn Greeter>>(Arc::new(Hello))
            .build();
        let a = provider.create_scope().get::<Arc<dyn Greeter>>().unwrap();
        let b = provider.create_scope().get::<Arc<dyn Greeter>>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.greet(), "hello");
    }

    #[test]
    fn scoped_values_are_fresh_per_scope() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let provider = ServiceProvider::builder()
            .scoped(move || Session(c.fetch_add(1, Ordering::SeqCst)))
            .build();

        let first = provider.create_scope();
        let second = provider.create_scope();
        assert_ne!(first.id(), second.id());
        assert_eq!(first.get::<Session>(), Some(Session(0)));
        // same scope, same instance
        assert_eq!(first.get::<Session>(), Some(Session(0)));
        assert_eq!(second.get::<Session>(), Some(Session(1)));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_registration_resolves_to_none() {
        let scope = ServiceProvider::default().create_scope();
        assert!(scope.get::<Session>().is_none());
    }
}
