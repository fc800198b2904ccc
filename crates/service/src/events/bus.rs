use std::any::{Any, TypeId};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

use dashmap::DashMap;
use futures::FutureExt;
use tracing::{debug, error, info, info_span, Instrument, Span};

use super::container::{Scope, ServiceProvider};
use super::event::IntegrationEvent;
use super::handler::{FromScope, IntegrationEventHandler};

type HandlerFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// Resolves a handler from the scope and starts it on the event; `None`
/// when the handler cannot be resolved.
type DispatchFn = for<'a> fn(&'a Scope, &'a (dyn Any + Send + Sync)) -> Option<HandlerFuture<'a>>;

#[derive(Clone)]
struct Registration {
    handler_type: TypeId,
    handler_name: &'static str,
    dispatch: DispatchFn,
}

fn dispatch<'a, E, H>(scope: &'a Scope, event: &'a (dyn Any + Send + Sync)) -> Option<HandlerFuture<'a>>
where
    E: IntegrationEvent,
    H: IntegrationEventHandler<E> + FromScope,
{
    let event = event.downcast_ref::<E>()?;
    let handler = H::from_scope(scope)?;
    Some(Box::pin(async move { handler.handle(event).await }))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// What happened to one published event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Handlers that completed without error.
    pub handled: usize,
    /// Handlers that returned an error or panicked (logged, not propagated).
    pub failed: usize,
    /// Registered handlers that could not be resolved from the scope.
    pub skipped: usize,
}

impl PublishOutcome {
    pub fn invoked(&self) -> usize { self.handled + self.failed }
}

/// In-process integration event bus.
///
/// Handlers are registered per event type at startup and resolved fresh from
/// a new [`Scope`] on every publish. Dispatch is sequential in registration
/// order; a failing handler is logged and never stops its siblings or the
/// publisher.
pub struct EventBus {
    handlers: DashMap<&'static str, Vec<Registration>>,
    provider: ServiceProvider,
    span: Span,
}

impl EventBus {
    /// Bus logging under a default `event_bus` span.
    pub fn new(provider: ServiceProvider) -> Self {
        Self::with_span(provider, info_span!("event_bus"))
    }

    /// Bus whose records are all parented to `span`.
    pub fn with_span(provider: ServiceProvider, span: Span) -> Self {
        Self { handlers: DashMap::new(), provider, span }
    }

    /// Register `H` for events of type `E`. Registering the same pair again
    /// is a no-op.
    pub fn subscribe<E, H>(&self)
    where
        E: IntegrationEvent,
        H: IntegrationEventHandler<E> + FromScope,
    {
        let handler_type = TypeId::of::<H>();
        let handler_name = std::any::type_name::<H>();
        let added = {
            let mut registrations = self.handlers.entry(E::NAME).or_default();
            if registrations.iter().any(|r| r.handler_type == handler_type) {
                false
            } else {
                registrations.push(Registration { handler_type, handler_name, dispatch: dispatch::<E, H> });
                true
            }
        };
        if added {
            info!(parent: &self.span, event = E::NAME, handler = handler_name, "handler subscribed");
        } else {
            debug!(parent: &self.span, event = E::NAME, handler = handler_name, "handler already subscribed, ignoring");
        }
    }

    /// Handler type names registered for `E`, in dispatch order.
    pub fn handlers_for<E: IntegrationEvent>(&self) -> Vec<&'static str> {
        self.handlers
            .get(E::NAME)
            .map(|list| list.iter().map(|r| r.handler_name).collect())
            .unwrap_or_default()
    }

    /// Deliver `event` to every handler registered for its type.
    ///
    /// Always completes: resolution failures, handler errors and handler
    /// panics are logged and counted in the returned outcome.
    pub async fn publish<E: IntegrationEvent>(&self, event: E) -> PublishOutcome {
        // clone out of the map so no guard is held across handler awaits
        let registrations = self
            .handlers
            .get(E::NAME)
            .map(|list| list.value().clone())
            .unwrap_or_default();

        let mut outcome = PublishOutcome::default();
        if registrations.is_empty() {
            debug!(parent: &self.span, event = E::NAME, event_id = %event.id(), "no handlers subscribed");
            return outcome;
        }

        let scope = self.provider.create_scope();
        for registration in &registrations {
            let dispatch_span = info_span!(
                parent: &self.span,
                "dispatch",
                event = E::NAME,
                event_id = %event.id(),
                handler = registration.handler_name,
                scope_id = %scope.id()
            );

            let Some(handling) = (registration.dispatch)(&scope, &event) else {
                debug!(parent: &dispatch_span, event = E::NAME, handler = registration.handler_name, "handler not resolvable in scope, skipped");
                outcome.skipped += 1;
                continue;
            };

            let handled = AssertUnwindSafe(handling.instrument(dispatch_span.clone()))
                .catch_unwind()
                .await;
            match handled {
                Ok(Ok(())) => outcome.handled += 1,
                Ok(Err(e)) => {
                    error!(
                        parent: &dispatch_span,
                        event = E::NAME,
                        event_id = %event.id(),
                        handler = registration.handler_name,
                        error = %e,
                        "integration event handler failed"
                    );
                    outcome.failed += 1;
                }
                Err(payload) => {
                    error!(
                        parent: &dispatch_span,
                        event = E::NAME,
                        event_id = %event.id(),
                        handler = registration.handler_name,
                        panic = panic_message(payload.as_ref()),
                        "integration event handler panicked"
                    );
                    outcome.failed += 1;
                }
            }
        }
        debug!(
            parent: &self.span,
            event = E::NAME,
            event_id = %event.id(),
            handled = outcome.handled,
            failed = outcome.failed,
            skipped = outcome.skipped,
            "event dispatched"
        );
        outcome
    }
}

#[cfg(test)]
mod tests;
