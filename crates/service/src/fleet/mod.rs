//! Bus management. Owns the `bus` table and announces every change to it
//! as an integration event once the write is durable.

pub mod repository;
pub mod service;

pub use repository::{BusRepository, SeaOrmBusRepository};
pub use service::FleetService;
