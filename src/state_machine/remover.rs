//! Background remover view state

use super::{TransitionError, TransitionResult};
use crate::gateway::DataUri;
use crate::input::SelectedImage;
use serde::Serialize;

/// Background remover state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoverState {
    /// Waiting for a selection or a generate request
    Idle { image: Option<SelectedImage> },
    /// Removal request in flight
    Loading { image: SelectedImage },
    Success {
        image: SelectedImage,
        result: DataUri,
    },
    Error {
        image: SelectedImage,
        message: String,
    },
}

impl Default for RemoverState {
    fn default() -> Self {
        RemoverState::Idle { image: None }
    }
}

impl RemoverState {
    pub fn selected_image(&self) -> Option<&SelectedImage> {
        match self {
            RemoverState::Idle { image } => image.as_ref(),
            RemoverState::Loading { image }
            | RemoverState::Success { image, .. }
            | RemoverState::Error { image, .. } => Some(image),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RemoverState::Idle { image: None } => "idle",
            RemoverState::Idle { image: Some(_) } => "idle_with_image",
            RemoverState::Loading { .. } => "loading",
            RemoverState::Success { .. } => "success",
            RemoverState::Error { .. } => "error",
        }
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, RemoverState::Loading { .. })
    }

    /// Whether the generate action should be offered
    pub fn can_generate(&self) -> bool {
        !self.is_processing() && self.selected_image().is_some()
    }

    pub fn processing_state(&self) -> ProcessingState {
        match self {
            RemoverState::Idle { .. } => ProcessingState::default(),
            RemoverState::Loading { .. } => ProcessingState {
                is_processing: true,
                ..ProcessingState::default()
            },
            RemoverState::Success { result, .. } => ProcessingState {
                result_url: Some(result.to_string()),
                ..ProcessingState::default()
            },
            RemoverState::Error { message, .. } => ProcessingState {
                error: Some(message.clone()),
                ..ProcessingState::default()
            },
        }
    }
}

/// Flat view of [`RemoverState`] for rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingState {
    pub is_processing: bool,
    pub error: Option<String>,
    pub result_url: Option<String>,
}

#[derive(Debug, Clone)]
pub enum RemoverEvent {
    /// `None` when the picker was dismissed
    SelectImage(Option<SelectedImage>),
    Generate,
    RemovalSucceeded(DataUri),
    RemovalFailed { message: String },
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoverEffect {
    RemoveBackground { image: SelectedImage },
}

pub fn transition(
    state: &RemoverState,
    event: RemoverEvent,
) -> Result<TransitionResult<RemoverState, RemoverEffect>, TransitionError> {
    match (state, event) {
        (RemoverState::Loading { .. }, RemoverEvent::SelectImage(None)) => {
            Err(TransitionError::Busy)
        }
        // Nothing chosen leaves everything as it was
        (_, RemoverEvent::SelectImage(None)) => Ok(TransitionResult::new(state.clone())),

        (
            RemoverState::Loading { .. },
            RemoverEvent::SelectImage(Some(_)) | RemoverEvent::Generate | RemoverEvent::Reset,
        ) => Err(TransitionError::Busy),

        (_, RemoverEvent::SelectImage(Some(image))) => Ok(TransitionResult::new(
            RemoverState::Idle { image: Some(image) },
        )),

        (RemoverState::Idle { image: None }, RemoverEvent::Generate) => {
            Err(TransitionError::NoImageSelected)
        }

        (
            RemoverState::Idle { image: Some(image) }
            | RemoverState::Success { image, .. }
            | RemoverState::Error { image, .. },
            RemoverEvent::Generate,
        ) => Ok(
            TransitionResult::new(RemoverState::Loading {
                image: image.clone(),
            })
            .with_effect(RemoverEffect::RemoveBackground {
                image: image.clone(),
            }),
        ),

        (RemoverState::Loading { image }, RemoverEvent::RemovalSucceeded(result)) => {
            Ok(TransitionResult::new(RemoverState::Success {
                image: image.clone(),
                result,
            }))
        }

        (RemoverState::Loading { image }, RemoverEvent::RemovalFailed { message }) => {
            Ok(TransitionResult::new(RemoverState::Error {
                image: image.clone(),
                message,
            }))
        }

        (_, RemoverEvent::Reset) => Ok(TransitionResult::new(RemoverState::default())),

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "{event:?} in {state:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> SelectedImage {
        SelectedImage {
            data: "AAAA".into(),
            mime_type: "image/jpeg".into(),
            preview: name.into(),
        }
    }

    fn png(data: &str) -> DataUri {
        DataUri {
            mime_type: "image/png".into(),
            data: data.into(),
        }
    }

    #[test]
    fn test_select_then_generate_requests_removal() {
        let selected = transition(
            &RemoverState::default(),
            RemoverEvent::SelectImage(Some(image("a.jpg"))),
        )
        .unwrap();
        assert!(selected.effects.is_empty());
        assert!(selected.new_state.can_generate());

        let loading = transition(&selected.new_state, RemoverEvent::Generate).unwrap();
        assert_eq!(
            loading.new_state,
            RemoverState::Loading {
                image: image("a.jpg")
            }
        );
        assert_eq!(
            loading.effects,
            vec![RemoverEffect::RemoveBackground {
                image: image("a.jpg")
            }]
        );
        assert!(loading.new_state.processing_state().is_processing);
    }

    #[test]
    fn test_generate_offered_only_with_idle_selection() {
        assert!(!RemoverState::default().can_generate());
        assert!(!RemoverState::Loading {
            image: image("a.jpg")
        }
        .can_generate());
        assert!(RemoverState::Error {
            image: image("a.jpg"),
            message: "boom".into(),
        }
        .can_generate());
    }

    #[test]
    fn test_dismissed_picker_keeps_state() {
        let state = RemoverState::Error {
            image: image("a.jpg"),
            message: "boom".into(),
        };
        let result = transition(&state, RemoverEvent::SelectImage(None)).unwrap();
        assert_eq!(result.new_state, state);
    }

    #[test]
    fn test_generate_without_image_is_rejected() {
        let err = transition(&RemoverState::default(), RemoverEvent::Generate).unwrap_err();
        assert_eq!(err, TransitionError::NoImageSelected);
    }

    #[test]
    fn test_loading_rejects_user_events() {
        let state = RemoverState::Loading {
            image: image("a.jpg"),
        };
        for event in [
            RemoverEvent::Generate,
            RemoverEvent::Reset,
            RemoverEvent::SelectImage(Some(image("b.jpg"))),
            RemoverEvent::SelectImage(None),
        ] {
            assert_eq!(transition(&state, event).unwrap_err(), TransitionError::Busy);
        }
    }

    #[test]
    fn test_success_view_has_result_only() {
        let state = RemoverState::Loading {
            image: image("a.jpg"),
        };
        let done = transition(&state, RemoverEvent::RemovalSucceeded(png("AAAA"))).unwrap();
        assert_eq!(
            done.new_state.processing_state(),
            ProcessingState {
                is_processing: false,
                error: None,
                result_url: Some("data:image/png;base64,AAAA".into()),
            }
        );
    }

    #[test]
    fn test_failure_view_has_error_only() {
        let state = RemoverState::Loading {
            image: image("a.jpg"),
        };
        let failed = transition(
            &state,
            RemoverEvent::RemovalFailed {
                message: "No response generated from AI.".into(),
            },
        )
        .unwrap();
        let view = failed.new_state.processing_state();
        assert_eq!(view.error.as_deref(), Some("No response generated from AI."));
        assert_eq!(view.result_url, None);
        assert!(!view.is_processing);
    }

    #[test]
    fn test_reset_clears_everything() {
        let state = RemoverState::Success {
            image: image("a.jpg"),
            result: png("AAAA"),
        };
        let reset = transition(&state, RemoverEvent::Reset).unwrap();
        assert_eq!(reset.new_state, RemoverState::Idle { image: None });
        assert_eq!(reset.new_state.processing_state(), ProcessingState::default());
        assert!(reset.new_state.selected_image().is_none());
    }

    #[test]
    fn test_new_selection_after_result_clears_result() {
        let state = RemoverState::Success {
            image: image("a.jpg"),
            result: png("AAAA"),
        };
        let next = transition(&state, RemoverEvent::SelectImage(Some(image("b.jpg")))).unwrap();
        assert_eq!(
            next.new_state,
            RemoverState::Idle {
                image: Some(image("b.jpg"))
            }
        );
    }

    #[test]
    fn test_generate_again_after_error() {
        let state = RemoverState::Error {
            image: image("a.jpg"),
            message: "boom".into(),
        };
        let retry = transition(&state, RemoverEvent::Generate).unwrap();
        assert!(retry.new_state.is_processing());
        assert_eq!(retry.effects.len(), 1);
    }

    #[test]
    fn test_stray_gateway_result_is_invalid() {
        let err = transition(
            &RemoverState::default(),
            RemoverEvent::RemovalSucceeded(png("AAAA")),
        )
        .unwrap_err();
        assert!(matches!(err, TransitionError::InvalidTransition(_)));
    }

    #[test]
    fn test_processing_state_serializes_camel_case() {
        let view = ProcessingState {
            is_processing: false,
            error: None,
            result_url: Some("data:image/png;base64,AAAA".into()),
        };
        assert_eq!(
            serde_json::to_value(view).unwrap(),
            serde_json::json!({
                "isProcessing": false,
                "error": null,
                "resultUrl": "data:image/png;base64,AAAA"
            })
        );
    }
}
