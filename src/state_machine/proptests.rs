//! Property-based tests for the view state machines
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::gateway::{DataUri, StoreDetails};
use crate::input::SelectedImage;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_image() -> impl Strategy<Value = SelectedImage> {
    ("[A-Za-z0-9+/]{4,16}", prop_oneof![Just("image/jpeg"), Just("image/png")], "[a-z]{1,8}")
        .prop_map(|(data, mime, name)| SelectedImage {
            data,
            mime_type: mime.to_string(),
            preview: format!("{name}.jpg").into(),
        })
}

fn arb_data_uri() -> impl Strategy<Value = DataUri> {
    "[A-Za-z0-9+/]{4,16}".prop_map(|data| DataUri {
        mime_type: "image/png".into(),
        data,
    })
}

fn arb_remover_state() -> impl Strategy<Value = RemoverState> {
    prop_oneof![
        proptest::option::of(arb_image()).prop_map(|image| RemoverState::Idle { image }),
        arb_image().prop_map(|image| RemoverState::Loading { image }),
        (arb_image(), arb_data_uri())
            .prop_map(|(image, result)| RemoverState::Success { image, result }),
        (arb_image(), "[a-zA-Z ]{0,30}")
            .prop_map(|(image, message)| RemoverState::Error { image, message }),
    ]
}

fn arb_remover_user_event() -> impl Strategy<Value = RemoverEvent> {
    prop_oneof![
        proptest::option::of(arb_image()).prop_map(RemoverEvent::SelectImage),
        Just(RemoverEvent::Generate),
        Just(RemoverEvent::Reset),
    ]
}

fn arb_remover_event() -> impl Strategy<Value = RemoverEvent> {
    prop_oneof![
        arb_remover_user_event(),
        arb_data_uri().prop_map(RemoverEvent::RemovalSucceeded),
        "[a-zA-Z ]{0,30}".prop_map(|message| RemoverEvent::RemovalFailed { message }),
    ]
}

fn store() -> StoreDetails {
    StoreDetails {
        name: "Toko A".into(),
        address: "Jl. X".into(),
        rating: Some(4.0),
        review_count: Some(3),
        phone: None,
        website: None,
        opening_hours: None,
        reviews: None,
        summary: "s".into(),
        category: "c".into(),
        map_uri: "https://maps.example/x".into(),
    }
}

fn arb_store_state() -> impl Strategy<Value = StorePageState> {
    prop_oneof![
        Just(StorePageState::Unmounted),
        Just(StorePageState::Loading),
        Just(StorePageState::Success { store: store() }),
        "[a-z ]{0,20}".prop_map(|message| StorePageState::Error { message }),
    ]
}

fn arb_store_event() -> impl Strategy<Value = StorePageEvent> {
    prop_oneof![
        Just(StorePageEvent::Mount),
        Just(StorePageEvent::Reload),
        Just(StorePageEvent::FetchSucceeded(Box::new(store()))),
        "[a-z ]{0,20}".prop_map(|message| StorePageEvent::FetchFailed { message }),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// No user action can leave or restart an in-flight removal
    #[test]
    fn prop_loading_rejects_user_events(image in arb_image(), event in arb_remover_user_event()) {
        let state = RemoverState::Loading { image };
        prop_assert_eq!(remover::transition(&state, event).unwrap_err(), TransitionError::Busy);
    }

    /// Removal effects only accompany entry into Loading from a non-loading state
    #[test]
    fn prop_effects_only_on_loading_entry(state in arb_remover_state(), event in arb_remover_event()) {
        if let Ok(result) = remover::transition(&state, event) {
            if !result.effects.is_empty() {
                prop_assert!(!state.is_processing());
                prop_assert!(result.new_state.is_processing());
                prop_assert_eq!(result.effects.len(), 1);
            }
        }
    }

    /// The flat view never reports an error and a result together
    #[test]
    fn prop_processing_view_is_exclusive(state in arb_remover_state()) {
        let view = state.processing_state();
        prop_assert!(view.error.is_none() || view.result_url.is_none());
        prop_assert_eq!(view.is_processing, state.is_processing());
        if view.is_processing {
            prop_assert!(view.error.is_none() && view.result_url.is_none());
        }
    }

    /// Images are replaced wholesale, never edited
    #[test]
    fn prop_selected_image_comes_from_state_or_event(state in arb_remover_state(), event in arb_remover_event()) {
        let selected = match &event {
            RemoverEvent::SelectImage(Some(image)) => Some(image.clone()),
            _ => None,
        };
        if let Ok(result) = remover::transition(&state, event) {
            if let Some(image) = result.new_state.selected_image() {
                prop_assert!(
                    Some(image) == state.selected_image() || Some(image) == selected.as_ref()
                );
            }
        }
    }

    #[test]
    fn prop_store_fetch_only_on_loading_entry(state in arb_store_state(), event in arb_store_event()) {
        if let Ok(result) = store_page::transition(&state, event) {
            if !result.effects.is_empty() {
                prop_assert!(!state.is_loading());
                prop_assert!(result.new_state.is_loading());
            }
        }
    }

    #[test]
    fn prop_store_view_has_exactly_one_outcome(state in arb_store_state()) {
        let view = state.app_state();
        let set = [view.is_loading, view.error.is_some(), view.store.is_some()]
            .into_iter()
            .filter(|flag| *flag)
            .count();
        prop_assert_eq!(set, 1);
    }
}
