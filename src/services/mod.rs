// Service exports
pub mod store;

pub use store::{RequestStore, StoreError};
