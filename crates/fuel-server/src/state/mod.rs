pub mod store;

pub use store::{load_catalog, AppState, CatalogError};
