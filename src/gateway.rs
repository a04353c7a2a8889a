//! Gateways that turn app requests into generative calls and back

pub mod background;
pub mod store;

pub use background::{BackgroundRemover, DataUri, RemovalError};
pub use store::{StoreDataFetcher, StoreDetails, StoreError};
