//! Service layer for the bus and menu stores.
//! - `events`: in-process integration-event bus that keeps the stores consistent.
//! - `fleet`: bus management, the producer of bus events.
//! - `menu`: categories and items, the consumer of bus events.

pub mod errors;
pub mod events;
pub mod fleet;
pub mod menu;
#[cfg(test)]
pub mod test_support;
