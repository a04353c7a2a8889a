//! Session driving the background remover view

use super::traits::ImageGateway;
use crate::input::SelectedImage;
use crate::state_machine::remover::transition;
use crate::state_machine::{
    ProcessingState, RemoverEffect, RemoverEvent, RemoverState, TransitionError,
};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Owns one remover view and executes its effects
pub struct RemoverSession<G> {
    gateway: G,
    state: Mutex<RemoverState>,
}

impl<G: ImageGateway> RemoverSession<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: Mutex::new(RemoverState::default()),
        }
    }

    pub fn state(&self) -> RemoverState {
        self.lock().clone()
    }

    pub fn processing_state(&self) -> ProcessingState {
        self.lock().processing_state()
    }

    pub fn select_image(&self, image: Option<SelectedImage>) -> Result<(), TransitionError> {
        self.apply(RemoverEvent::SelectImage(image)).map(drop)
    }

    #[allow(dead_code)] // The CLI runs one removal per process
    pub fn reset(&self) -> Result<(), TransitionError> {
        self.apply(RemoverEvent::Reset).map(drop)
    }

    /// Run one removal for the selected image.
    ///
    /// Rejected with [`TransitionError::Busy`] while a removal is in flight,
    /// in which case no gateway call is made.
    pub async fn generate(&self) -> Result<ProcessingState, TransitionError> {
        let effects = self.apply(RemoverEvent::Generate)?;
        for effect in effects {
            self.execute(effect).await;
        }
        Ok(self.processing_state())
    }

    async fn execute(&self, effect: RemoverEffect) {
        match effect {
            RemoverEffect::RemoveBackground { image } => {
                let event = match self
                    .gateway
                    .remove_background(&image.data, &image.mime_type)
                    .await
                {
                    Ok(result) => RemoverEvent::RemovalSucceeded(result),
                    Err(e) => {
                        tracing::warn!(error = %e, "Background removal ended in error");
                        RemoverEvent::RemovalFailed {
                            message: e.user_message(),
                        }
                    }
                };
                if let Err(e) = self.apply(event) {
                    tracing::error!(error = %e, "Dropped removal outcome");
                }
            }
        }
    }

    fn apply(&self, event: RemoverEvent) -> Result<Vec<RemoverEffect>, TransitionError> {
        let mut state = self.lock();
        let result = transition(&state, event)?;
        tracing::debug!(
            from = state.label(),
            to = result.new_state.label(),
            "Remover transition"
        );
        *state = result.new_state;
        Ok(result.effects)
    }

    fn lock(&self) -> MutexGuard<'_, RemoverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
