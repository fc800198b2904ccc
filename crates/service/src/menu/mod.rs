//! Menu management: categories and items scoped to a bus.
//!
//! The menu store does not own buses. It learns about bus deletions through
//! the `BusDeleted` integration event and cascades them locally.

pub mod errors;
pub mod handlers;
pub mod service;
pub mod store;

pub use handlers::CascadeDeleteCategories;
pub use service::MenuService;
pub use store::{MenuSession, MenuStore, SeaOrmMenuStore};
