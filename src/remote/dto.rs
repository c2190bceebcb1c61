//! Media-library web API Data Transfer Objects
//!
//! These types match what the `/api` endpoints return and accept.
//! DO NOT use these types outside the remote module - convert to domain types.
//!
//! Identifiers arrive either as JSON strings or as numbers depending on the
//! server version, so they are captured as [`IdValue`].

use serde::{Deserialize, Serialize};

/// An identifier that may be sent as a string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum IdValue {
    Text(String),
    Number(i64),
}

impl IdValue {
    /// String form; `None` for empty strings.
    pub fn into_string(self) -> Option<String> {
        match self {
            IdValue::Text(s) if s.is_empty() => None,
            IdValue::Text(s) => Some(s),
            IdValue::Number(n) => Some(n.to_string()),
        }
    }
}

/// Playlist metadata (`GET /api/playlists`, and `playlist` in details)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub rating_key: IdValue,
    pub title: String,
    /// Number of tracks
    pub leaf_count: Option<u32>,
    /// Total duration in milliseconds
    pub duration: Option<u64>,
    pub summary: Option<String>,
}

/// Playlist details response (`GET /api/playlists/{id}`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistDetails {
    pub playlist: Playlist,
    /// Absent or null for empty playlists
    pub items: Option<Vec<Track>>,
}

/// A track, either a playlist item or a search result
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Library track ID
    pub rating_key: Option<IdValue>,
    /// Playlist slot ID (playlist items only)
    #[serde(rename = "playlistItemID")]
    pub playlist_item_id: Option<IdValue>,
    #[serde(default)]
    pub title: String,
    /// Artist
    pub grandparent_title: Option<String>,
    /// Album
    pub parent_title: Option<String>,
    /// Duration in milliseconds
    pub duration: Option<u64>,
    /// 0-10, may be fractional
    pub user_rating: Option<f64>,
    /// Unix seconds
    pub added_at: Option<i64>,
    /// Everything else, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Library section (`GET /api/libraries`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Library {
    pub key: IdValue,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Error body sent with non-success responses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: String,
}

/// Body for `POST /api/playlists/{id}/tracks/{trackId}/rate`
#[derive(Debug, Clone, Serialize)]
pub struct RateRequest {
    pub rating: u8,
}

/// Body for `POST /api/playlists/{id}/tracks`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackRequest {
    pub track_id: String,
}

/// Body for `POST /api/playlists`
#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
}

/// Body for `POST /api/connect`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub server_url: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_playlist_details() {
        let json = r#"{
            "playlist": {"ratingKey": "42", "title": "Road Trip", "leafCount": 2, "duration": 360000},
            "items": [
                {"ratingKey": "100", "playlistItemID": 7, "title": "Song A",
                 "grandparentTitle": "Artist", "parentTitle": "Album",
                 "duration": 180000, "userRating": 8.0, "addedAt": 1700000000,
                 "thumb": "/library/metadata/100/thumb", "viewCount": 3},
                {"ratingKey": 101, "playlistItemID": "8", "title": "Song B"}
            ]
        }"#;

        let details: PlaylistDetails = serde_json::from_str(json).unwrap();

        assert_eq!(details.playlist.title, "Road Trip");
        let items = details.items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].playlist_item_id, Some(IdValue::Number(7)));
        assert_eq!(items[0].user_rating, Some(8.0));
        assert_eq!(items[0].extra.get("viewCount"), Some(&serde_json::json!(3)));
        assert!(!items[0].extra.contains_key("title"));
        assert_eq!(items[1].rating_key, Some(IdValue::Number(101)));
    }

    #[test]
    fn test_parse_null_items() {
        let json = r#"{"playlist": {"ratingKey": "1", "title": "Empty"}, "items": null}"#;
        let details: PlaylistDetails = serde_json::from_str(json).unwrap();
        assert!(details.items.is_none());
    }

    #[test]
    fn test_request_bodies() {
        assert_eq!(
            serde_json::to_string(&RateRequest { rating: 6 }).unwrap(),
            r#"{"rating":6}"#
        );
        assert_eq!(
            serde_json::to_string(&AddTrackRequest {
                track_id: "100".to_string()
            })
            .unwrap(),
            r#"{"trackId":"100"}"#
        );
    }

    #[test]
    fn test_parse_libraries() {
        let json = r#"[
            {"key": "1", "title": "Movies", "type": "movie"},
            {"key": 3, "title": "Music", "type": "artist", "agent": "tv.plex.agents.music"}
        ]"#;

        let libraries: Vec<Library> = serde_json::from_str(json).unwrap();

        assert_eq!(libraries.len(), 2);
        assert_eq!(libraries[1].key, IdValue::Number(3));
        assert_eq!(libraries[1].kind, "artist");
    }

    #[test]
    fn test_connect_and_create_bodies() {
        let connect = ConnectRequest {
            server_url: "http://plex.local:32400".to_string(),
            token: "abc".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&connect).unwrap(),
            r#"{"serverUrl":"http://plex.local:32400","token":"abc"}"#
        );
        assert_eq!(
            serde_json::to_string(&CreatePlaylistRequest {
                name: "Road Trip".to_string()
            })
            .unwrap(),
            r#"{"name":"Road Trip"}"#
        );
    }

    #[test]
    fn test_id_value_into_string() {
        assert_eq!(IdValue::Number(5).into_string(), Some("5".to_string()));
        assert_eq!(IdValue::Text(String::new()).into_string(), None);
    }
}
