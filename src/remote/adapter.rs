//! Adapter layer: Convert web API DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! Rows that cannot be identified are dropped here, with a warning, so the
//! collection never holds an entry without both keys.

use std::collections::HashSet;
use std::time::Duration;

use super::dto;
use crate::model::{
    Library, LibraryId, LibraryTrack, PlaylistDetails, PlaylistId, PlaylistItemId,
    PlaylistSummary, Rating, TrackEntry, TrackId,
};

/// Convert a playlist DTO to a summary
pub fn to_summary(playlist: dto::Playlist) -> PlaylistSummary {
    PlaylistSummary {
        id: PlaylistId::new(playlist.rating_key.into_string().unwrap_or_default()),
        title: playlist.title,
        track_count: playlist.leaf_count.unwrap_or(0),
        duration: playlist.duration.map(Duration::from_millis),
        summary: playlist.summary.filter(|s| !s.is_empty()),
    }
}

/// Convert a playlist details response, keeping playlist order
pub fn to_details(response: dto::PlaylistDetails) -> PlaylistDetails {
    let playlist = to_summary(response.playlist);
    let mut seen = HashSet::new();

    let items = response
        .items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|track| {
            let title = track.title.clone();
            let entry = to_entry(track);
            if entry.is_none() {
                tracing::warn!(
                    target: "remote::adapter",
                    "Dropping playlist row without identifiers: {:?}",
                    title
                );
            }
            entry
        })
        .filter(|entry| {
            let fresh = seen.insert(entry.playlist_item_id.clone());
            if !fresh {
                tracing::warn!(
                    target: "remote::adapter",
                    "Dropping duplicate playlist item {}",
                    entry.playlist_item_id
                );
            }
            fresh
        })
        .collect();

    PlaylistDetails { playlist, items }
}

/// Convert one playlist row; `None` if either identifier is missing
pub fn to_entry(track: dto::Track) -> Option<TrackEntry> {
    let track_id = track.rating_key?.into_string()?;
    let playlist_item_id = track.playlist_item_id?.into_string()?;

    Some(TrackEntry {
        track_id: TrackId::new(track_id),
        playlist_item_id: PlaylistItemId::new(playlist_item_id),
        title: track.title,
        artist: track.grandparent_title.filter(|s| !s.is_empty()),
        album: track.parent_title.filter(|s| !s.is_empty()),
        duration: track.duration.map(Duration::from_millis),
        rating: track
            .user_rating
            .map(Rating::from_raw)
            .unwrap_or(Rating::UNRATED),
        added_at: track.added_at,
        metadata: track.extra,
    })
}

/// Convert a search result; `None` if it has no track id
pub fn to_library_track(track: dto::Track) -> Option<LibraryTrack> {
    let track_id = track.rating_key?.into_string()?;
    Some(LibraryTrack {
        track_id: TrackId::new(track_id),
        title: track.title,
        artist: track.grandparent_title.filter(|s| !s.is_empty()),
        album: track.parent_title.filter(|s| !s.is_empty()),
    })
}

/// Convert a library section; `None` if its key is empty
pub fn to_library(library: dto::Library) -> Option<Library> {
    Some(Library {
        id: LibraryId::new(library.key.into_string()?),
        title: library.title,
        kind: library.kind,
    })
}
