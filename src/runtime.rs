//! Sessions that execute view state machine effects against the gateways
//!
//! Each session owns exactly one view state. A gateway call is only made
//! when a transition into `Loading` asks for it, so at most one call per
//! session is ever in flight.

mod remover;
mod store_page;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use remover::RemoverSession;
pub use store_page::StorePageSession;
pub use traits::*;
