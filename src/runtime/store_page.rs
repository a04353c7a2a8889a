//! Session driving the store page view

use super::traits::StoreGateway;
use crate::state_machine::store_page::transition;
use crate::state_machine::{
    AppState, StorePageEffect, StorePageEvent, StorePageState, TransitionError,
};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Owns one store page and executes its effects
pub struct StorePageSession<G> {
    gateway: G,
    state: Mutex<StorePageState>,
}

impl<G: StoreGateway> StorePageSession<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: Mutex::new(StorePageState::default()),
        }
    }

    pub fn state(&self) -> StorePageState {
        self.lock().clone()
    }

    pub fn app_state(&self) -> AppState {
        self.lock().app_state()
    }

    /// Mount the page, which fetches the store exactly once
    pub async fn mount(&self) -> Result<AppState, TransitionError> {
        self.run(StorePageEvent::Mount).await
    }

    /// Start over after an error
    #[allow(dead_code)] // The CLI mounts once per process
    pub async fn reload(&self) -> Result<AppState, TransitionError> {
        self.run(StorePageEvent::Reload).await
    }

    async fn run(&self, event: StorePageEvent) -> Result<AppState, TransitionError> {
        let effects = self.apply(event)?;
        for effect in effects {
            self.execute(effect).await;
        }
        Ok(self.app_state())
    }

    async fn execute(&self, effect: StorePageEffect) {
        match effect {
            StorePageEffect::FetchStore => {
                let event = match self.gateway.fetch_store_data().await {
                    Ok(store) => StorePageEvent::FetchSucceeded(Box::new(store)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Store fetch ended in error");
                        StorePageEvent::FetchFailed {
                            message: e.user_message().to_string(),
                        }
                    }
                };
                if let Err(e) = self.apply(event) {
                    tracing::error!(error = %e, "Dropped store fetch outcome");
                }
            }
        }
    }

    fn apply(&self, event: StorePageEvent) -> Result<Vec<StorePageEffect>, TransitionError> {
        let mut state = self.lock();
        let result = transition(&state, event)?;
        tracing::debug!(from = ?*state, to = ?result.new_state, "Store page transition");
        *state = result.new_state;
        Ok(result.effects)
    }

    fn lock(&self) -> MutexGuard<'_, StorePageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
