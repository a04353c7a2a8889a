//! Trait abstractions for gateway I/O
//!
//! These traits enable testing the sessions with mock implementations.

use crate::gateway::{
    BackgroundRemover, DataUri, RemovalError, StoreDataFetcher, StoreDetails, StoreError,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Performs background removal for the remover view
#[async_trait]
pub trait ImageGateway: Send + Sync {
    async fn remove_background(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<DataUri, RemovalError>;
}

/// Fetches the store shown on the store page
#[async_trait]
pub trait StoreGateway: Send + Sync {
    async fn fetch_store_data(&self) -> Result<StoreDetails, StoreError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ImageGateway + ?Sized> ImageGateway for Arc<T> {
    async fn remove_background(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<DataUri, RemovalError> {
        (**self).remove_background(image_base64, mime_type).await
    }
}

#[async_trait]
impl<T: StoreGateway + ?Sized> StoreGateway for Arc<T> {
    async fn fetch_store_data(&self) -> Result<StoreDetails, StoreError> {
        (**self).fetch_store_data().await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

#[async_trait]
impl ImageGateway for BackgroundRemover {
    async fn remove_background(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<DataUri, RemovalError> {
        BackgroundRemover::remove_background(self, image_base64, mime_type).await
    }
}

#[async_trait]
impl StoreGateway for StoreDataFetcher {
    async fn fetch_store_data(&self) -> Result<StoreDetails, StoreError> {
        StoreDataFetcher::fetch_store_data(self).await
    }
}
