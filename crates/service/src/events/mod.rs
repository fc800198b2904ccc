//! Integration events: in-process publish/subscribe between services.
//!
//! ```text
//!  producer (fleet)                      consumers (menu, ...)
//!  ───────────────                      ────────────────────
//!  commit bus change                    subscribe::<BusDeleted, H>() at startup
//!        │                                        │
//!        ▼                                        ▼
//!  EventBus::publish(BusDeleted) ──► registry[E::NAME] = [H1, H2, ...]
//!                                          │
//!                                    one Scope per publish
//!                                          │
//!                         H1::from_scope ─► handle(&e).await   (errors logged)
//!                         H2::from_scope ─► handle(&e).await   (errors logged)
//! ```
//!
//! Delivery is best effort: handler failures are logged and swallowed, the
//! publisher always observes a completed call, and nothing is persisted or
//! retried.

mod bus;
mod container;
mod event;
mod handler;
pub mod integration;

pub use bus::{EventBus, PublishOutcome};
pub use container::{Scope, ServiceProvider, ServiceProviderBuilder};
pub use event::{EventMeta, IntegrationEvent};
pub use handler::{FromScope, IntegrationEventHandler};
pub use integration::{BusCreated, BusDeleted, BusUpdated, CategoryDeleted};
