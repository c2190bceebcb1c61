//! Remote media-library service - the collaborator the playlist controller
//! mutates through.
//!
//! # Architecture
//!
//! This module follows the same separation as any external API binding:
//! - **API DTOs** (`dto.rs`) - Exact JSON shapes the service sends and accepts
//! - **Adapter** (`adapter.rs`) - Converts DTOs to domain models in [`crate::model`]
//! - **Client** (`client.rs`) - reqwest HTTP client for the service
//! - **Traits** (`traits.rs`) - [`PlaylistApi`], the seam the controller depends on
//!
//! The controller only ever sees [`PlaylistApi`] and [`RemoteError`], so tests
//! substitute `traits::mocks::MockPlaylistApi` for the HTTP client.

pub mod adapter;
pub mod client;
pub mod dto;
pub mod traits;

pub use client::PlaylistClient;
pub use traits::PlaylistApi;

/// Failures reported by the remote service boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The target does not exist on the server
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server refused the request; the message is shown verbatim
    #[error("{0}")]
    RemoteRejected(String),

    /// Network, timeout or parse failure; the outcome on the server is unknown
    #[error("Transport failure: {0}")]
    TransportFailure(String),
}

impl RemoteError {
    /// Message for the user, e.g. "Failed to rate track: connection refused".
    ///
    /// Server rejections are surfaced verbatim.
    pub fn user_message(&self, action: &str) -> String {
        match self {
            RemoteError::RemoteRejected(message) => message.clone(),
            RemoteError::NotFound(what) => format!("Failed to {action}: {what} not found"),
            RemoteError::TransportFailure(detail) => format!("Failed to {action}: {detail}"),
        }
    }
}
