//! Store page view state

use super::{TransitionError, TransitionResult};
use crate::gateway::StoreDetails;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum StorePageState {
    /// Before the page mounts
    #[default]
    Unmounted,
    Loading,
    Success {
        store: StoreDetails,
    },
    Error {
        message: String,
    },
}

impl StorePageState {
    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        matches!(self, StorePageState::Loading)
    }

    pub fn app_state(&self) -> AppState {
        match self {
            // The page starts out loading
            StorePageState::Unmounted | StorePageState::Loading => AppState {
                is_loading: true,
                error: None,
                store: None,
            },
            StorePageState::Success { store } => AppState {
                is_loading: false,
                error: None,
                store: Some(store.clone()),
            },
            StorePageState::Error { message } => AppState {
                is_loading: false,
                error: Some(message.clone()),
                store: None,
            },
        }
    }
}

/// Flat view of [`StorePageState`] for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub is_loading: bool,
    pub error: Option<String>,
    pub store: Option<StoreDetails>,
}

#[derive(Debug, Clone)]
pub enum StorePageEvent {
    Mount,
    /// Full reload, offered only from the error view
    Reload,
    FetchSucceeded(Box<StoreDetails>),
    FetchFailed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePageEffect {
    FetchStore,
}

pub fn transition(
    state: &StorePageState,
    event: StorePageEvent,
) -> Result<TransitionResult<StorePageState, StorePageEffect>, TransitionError> {
    match (state, event) {
        (StorePageState::Unmounted, StorePageEvent::Mount)
        | (StorePageState::Error { .. }, StorePageEvent::Reload) => {
            Ok(TransitionResult::new(StorePageState::Loading)
                .with_effect(StorePageEffect::FetchStore))
        }

        (StorePageState::Loading, StorePageEvent::Mount | StorePageEvent::Reload) => {
            Err(TransitionError::Busy)
        }

        (StorePageState::Loading, StorePageEvent::FetchSucceeded(store)) => {
            Ok(TransitionResult::new(StorePageState::Success { store: *store }))
        }

        (StorePageState::Loading, StorePageEvent::FetchFailed { message }) => {
            Ok(TransitionResult::new(StorePageState::Error { message }))
        }

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "{event:?} in {state:?}"
        ))),
    }
}
