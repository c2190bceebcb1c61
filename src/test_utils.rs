//! Test utilities and fixtures for playlist-minder tests.
//!
//! This module provides common test helpers and mock factories to reduce
//! boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use playlist_minder::test_utils::{mock_entries, mock_details};
//!
//! #[test]
//! fn test_something() {
//!     let mut collection = TrackCollection::new();
//!     collection.load(mock_entries(10));
//!     // ... test logic
//! }
//! ```

use std::time::Duration;

use crate::model::{
    LibraryTrack, PlaylistDetails, PlaylistId, PlaylistItemId, PlaylistSummary, Rating,
    TrackEntry, TrackId,
};

/// Creates a mock TrackEntry with sensible defaults.
///
/// `n` drives the identifiers: track `t{n}`, playlist item `p{n}`, title
/// `Track {n}`. Customize using struct update syntax:
///
/// ```ignore
/// let entry = TrackEntry {
///     rating: Rating::MAX,
///     ..mock_entry(3)
/// };
/// ```
pub fn mock_entry(n: usize) -> TrackEntry {
    TrackEntry {
        track_id: TrackId::new(format!("t{n}")),
        playlist_item_id: PlaylistItemId::new(format!("p{n}")),
        title: format!("Track {n}"),
        artist: Some("Test Artist".to_string()),
        album: Some("Test Album".to_string()),
        duration: Some(Duration::from_secs(180)),
        rating: Rating::UNRATED,
        added_at: None,
        metadata: serde_json::Map::new(),
    }
}

/// Creates `count` mock entries numbered 1..=count, in order.
pub fn mock_entries(count: usize) -> Vec<TrackEntry> {
    (1..=count).map(mock_entry).collect()
}

/// Creates a mock entry with the given rating.
pub fn rated_entry(n: usize, rating: u8) -> TrackEntry {
    TrackEntry {
        rating: Rating::new(rating).expect("test rating must be valid"),
        ..mock_entry(n)
    }
}

/// Creates fetched playlist details wrapping the given entries.
pub fn mock_details(id: &str, items: Vec<TrackEntry>) -> PlaylistDetails {
    PlaylistDetails {
        playlist: PlaylistSummary {
            id: PlaylistId::new(id),
            title: format!("Playlist {id}"),
            track_count: items.len() as u32,
            duration: None,
            summary: None,
        },
        items,
    }
}

/// Creates a library search result for track `t{n}`.
pub fn library_track(n: usize) -> LibraryTrack {
    LibraryTrack {
        track_id: TrackId::new(format!("t{n}")),
        title: format!("Track {n}"),
        artist: Some("Test Artist".to_string()),
        album: Some("Test Album".to_string()),
    }
}

/// Shorthand for a playlist item id.
pub fn item(n: usize) -> PlaylistItemId {
    PlaylistItemId::new(format!("p{n}"))
}

/// Shorthand for a list of playlist item ids.
pub fn items(ns: impl IntoIterator<Item = usize>) -> Vec<PlaylistItemId> {
    ns.into_iter().map(item).collect()
}
