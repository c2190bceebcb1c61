//! Media-library HTTP client
//!
//! Talks to the playlist service's JSON API under `/api`.
//!
//! ## Status handling
//! - 2xx: success; mutation responses carry no body we rely on
//! - 404: [`RemoteError::NotFound`]
//! - other non-success with `{"error": "..."}`: [`RemoteError::RemoteRejected`]
//! - anything else (no body, network errors, bad JSON): [`RemoteError::TransportFailure`]

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::{RemoteError, adapter, dto};
use crate::config::ServerConfig;
use crate::model::{
    Library, LibraryTrack, PlaylistDetails, PlaylistId, PlaylistItemId, PlaylistSummary, Rating,
    TrackId,
};

/// User agent string
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Media-library API client
pub struct PlaylistClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl PlaylistClient {
    /// Create a new client for the service at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    /// Create a client from the `[server]` config section
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Point the service at a media server
    pub async fn connect(&self, server_url: &str, token: &str) -> Result<(), RemoteError> {
        let request = self
            .http_client
            .post(self.url("/api/connect"))
            .json(&dto::ConnectRequest {
                server_url: server_url.to_string(),
                token: token.to_string(),
            });
        Self::send(request).await
    }

    /// List the media server's library sections
    pub async fn list_libraries(&self) -> Result<Vec<Library>, RemoteError> {
        let request = self.http_client.get(self.url("/api/libraries"));
        let libraries: Vec<dto::Library> = Self::send_json(request).await?;
        Ok(libraries.into_iter().filter_map(adapter::to_library).collect())
    }

    /// List all playlists
    pub async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, RemoteError> {
        let request = self.http_client.get(self.url("/api/playlists"));
        let playlists: Vec<dto::Playlist> = Self::send_json(request).await?;
        Ok(playlists.into_iter().map(adapter::to_summary).collect())
    }

    /// Create an empty playlist
    pub async fn create_playlist(&self, name: &str) -> Result<(), RemoteError> {
        let request = self
            .http_client
            .post(self.url("/api/playlists"))
            .json(&dto::CreatePlaylistRequest {
                name: name.to_string(),
            });
        Self::send(request).await
    }

    /// Delete a playlist
    pub async fn delete_playlist(&self, id: &PlaylistId) -> Result<(), RemoteError> {
        let url = self.url(&format!("/api/playlists/{}", encode(id.as_str())));
        Self::send(self.http_client.delete(url)).await
    }

    /// Fetch a playlist with its entries in playlist order
    pub async fn fetch_playlist(&self, id: &PlaylistId) -> Result<PlaylistDetails, RemoteError> {
        let url = self.url(&format!("/api/playlists/{}", encode(id.as_str())));
        let response: dto::PlaylistDetails = Self::send_json(self.http_client.get(url)).await?;
        Ok(adapter::to_details(response))
    }

    /// Set a track's library-wide rating
    pub async fn rate_track(
        &self,
        playlist: &PlaylistId,
        track: &TrackId,
        rating: Rating,
    ) -> Result<(), RemoteError> {
        let url = self.url(&format!(
            "/api/playlists/{}/tracks/{}/rate",
            encode(playlist.as_str()),
            encode(track.as_str())
        ));
        let request = self.http_client.post(url).json(&dto::RateRequest {
            rating: rating.value(),
        });
        Self::send(request).await
    }

    /// Append a library track to a playlist
    pub async fn add_track(&self, playlist: &PlaylistId, track: &TrackId) -> Result<(), RemoteError> {
        let url = self.url(&format!("/api/playlists/{}/tracks", encode(playlist.as_str())));
        let request = self.http_client.post(url).json(&dto::AddTrackRequest {
            track_id: track.as_str().to_string(),
        });
        Self::send(request).await
    }

    /// Remove one slot from a playlist
    pub async fn remove_track(
        &self,
        playlist: &PlaylistId,
        item: &PlaylistItemId,
    ) -> Result<(), RemoteError> {
        let url = self.url(&format!(
            "/api/playlists/{}/tracks/{}",
            encode(playlist.as_str()),
            encode(item.as_str())
        ));
        Self::send(self.http_client.delete(url)).await
    }

    /// Search the library for tracks
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<LibraryTrack>, RemoteError> {
        let url = self.url(&format!("/api/search?query={}&type=track", encode(query)));
        let tracks: Vec<dto::Track> = Self::send_json(self.http_client.get(url)).await?;
        Ok(tracks
            .into_iter()
            .filter_map(adapter::to_library_track)
            .collect())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request whose success body we ignore
    async fn send(request: reqwest::RequestBuilder) -> Result<(), RemoteError> {
        Self::checked(request).await.map(|_| ())
    }

    /// Send a request and parse its JSON body
    async fn send_json<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, RemoteError> {
        Self::checked(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| RemoteError::TransportFailure(format!("invalid response: {}", e)))
    }

    /// Send the request and turn non-success statuses into errors
    async fn checked(request: reqwest::RequestBuilder) -> Result<reqwest::Response, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::TransportFailure(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().path().to_string();
        let body = response.json::<dto::ApiError>().await.ok();
        Err(classify_status(status, &url, body))
    }
}

/// Map a non-success status (and optional error body) onto [`RemoteError`]
fn classify_status(status: StatusCode, path: &str, body: Option<dto::ApiError>) -> RemoteError {
    let message = body.map(|b| b.error).filter(|m| !m.is_empty());

    if status == StatusCode::NOT_FOUND {
        return RemoteError::NotFound(message.unwrap_or_else(|| path.to_string()));
    }

    match message {
        Some(message) => RemoteError::RemoteRejected(message),
        None => RemoteError::TransportFailure(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )),
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = PlaylistClient::new("http://localhost:3000/", Duration::from_secs(5));
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(
            client.url("/api/playlists"),
            "http://localhost:3000/api/playlists"
        );
    }

    #[test]
    fn test_client_from_config() {
        let config = ServerConfig {
            url: "http://media.local:8080".to_string(),
            timeout_secs: 3,
        };
        let client = PlaylistClient::from_config(&config);
        assert_eq!(client.base_url(), "http://media.local:8080");
    }

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("playlist-minder/"));
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode("a b/c"), "a%20b%2Fc");
    }

    #[test]
    fn test_classify_not_found() {
        let err = classify_status(StatusCode::NOT_FOUND, "/api/playlists/9", None);
        assert_eq!(err, RemoteError::NotFound("/api/playlists/9".to_string()));
    }

    #[test]
    fn test_classify_rejection_with_message() {
        let body = dto::ApiError {
            error: "Not connected to server".to_string(),
        };
        let err = classify_status(StatusCode::BAD_REQUEST, "/api/x", Some(body));
        assert_eq!(
            err,
            RemoteError::RemoteRejected("Not connected to server".to_string())
        );
    }

    #[test]
    fn test_classify_bare_status_is_transport_failure() {
        let err = classify_status(StatusCode::BAD_GATEWAY, "/api/x", None);
        assert_eq!(
            err,
            RemoteError::TransportFailure("HTTP 502: Bad Gateway".to_string())
        );
    }
}
