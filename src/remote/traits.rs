//! Trait definition for the remote playlist service.
//!
//! This trait enables dependency injection and mocking for tests.
//! Production code uses [`PlaylistClient`](super::PlaylistClient), while
//! tests substitute [`mocks::MockPlaylistApi`].
//!
//! # Example
//!
//! ```ignore
//! use playlist_minder::remote::PlaylistApi;
//!
//! async fn count<T: PlaylistApi>(api: &T, id: &PlaylistId) -> usize {
//!     api.fetch_playlist(id).await.map(|d| d.items.len()).unwrap_or(0)
//! }
//! ```

use async_trait::async_trait;

use super::RemoteError;
use crate::model::{
    Library, LibraryTrack, PlaylistDetails, PlaylistId, PlaylistItemId, PlaylistSummary, Rating,
    TrackId,
};

/// Operations the playlist controller consumes from the media-library service.
#[async_trait]
pub trait PlaylistApi: Send + Sync {
    /// Connect the service to a media server with an access token.
    async fn connect(&self, server_url: &str, token: &str) -> Result<(), RemoteError>;

    /// List the media server's library sections.
    async fn list_libraries(&self) -> Result<Vec<Library>, RemoteError>;

    /// List all playlists.
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, RemoteError>;

    /// Create an empty playlist named `name`.
    async fn create_playlist(&self, name: &str) -> Result<(), RemoteError>;

    /// Delete a playlist.
    async fn delete_playlist(&self, id: &PlaylistId) -> Result<(), RemoteError>;

    /// Fetch playlist metadata and its entries in playlist order.
    async fn fetch_playlist(&self, id: &PlaylistId) -> Result<PlaylistDetails, RemoteError>;

    /// Set a track's library-wide rating.
    async fn rate_track(
        &self,
        playlist: &PlaylistId,
        track: &TrackId,
        rating: Rating,
    ) -> Result<(), RemoteError>;

    /// Append a library track to a playlist. The server assigns the slot id.
    async fn add_track(&self, playlist: &PlaylistId, track: &TrackId) -> Result<(), RemoteError>;

    /// Remove one slot from a playlist.
    async fn remove_track(
        &self,
        playlist: &PlaylistId,
        item: &PlaylistItemId,
    ) -> Result<(), RemoteError>;

    /// Search the library for tracks.
    async fn search_tracks(&self, query: &str) -> Result<Vec<LibraryTrack>, RemoteError>;
}

#[async_trait]
impl PlaylistApi for super::PlaylistClient {
    async fn connect(&self, server_url: &str, token: &str) -> Result<(), RemoteError> {
        self.connect(server_url, token).await
    }

    async fn list_libraries(&self) -> Result<Vec<Library>, RemoteError> {
        self.list_libraries().await
    }

    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, RemoteError> {
        self.list_playlists().await
    }

    async fn create_playlist(&self, name: &str) -> Result<(), RemoteError> {
        self.create_playlist(name).await
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> Result<(), RemoteError> {
        self.delete_playlist(id).await
    }

    async fn fetch_playlist(&self, id: &PlaylistId) -> Result<PlaylistDetails, RemoteError> {
        self.fetch_playlist(id).await
    }

    async fn rate_track(
        &self,
        playlist: &PlaylistId,
        track: &TrackId,
        rating: Rating,
    ) -> Result<(), RemoteError> {
        self.rate_track(playlist, track, rating).await
    }

    async fn add_track(&self, playlist: &PlaylistId, track: &TrackId) -> Result<(), RemoteError> {
        self.add_track(playlist, track).await
    }

    async fn remove_track(
        &self,
        playlist: &PlaylistId,
        item: &PlaylistItemId,
    ) -> Result<(), RemoteError> {
        self.remove_track(playlist, item).await
    }

    async fn search_tracks(&self, query: &str) -> Result<Vec<LibraryTrack>, RemoteError> {
        self.search_tracks(query).await
    }
}
