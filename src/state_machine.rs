//! View state machines for both apps
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition(state, event)` returns the next state plus the effects the
//! runtime must execute. Only transitions into `Loading` emit gateway effects.

pub mod remover;
pub mod store_page;

#[cfg(test)]
mod proptests;

pub use remover::{ProcessingState, RemoverEffect, RemoverEvent, RemoverState};
pub use store_page::{AppState, StorePageEffect, StorePageEvent, StorePageState};

use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult<S, E> {
    pub new_state: S,
    pub effects: Vec<E>,
}

impl<S, E> TransitionResult<S, E> {
    pub fn new(state: S) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("A request is already in flight")]
    Busy,
    #[error("No image selected")]
    NoImageSelected,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}
