//! Core data models for playlists and their entries.
//!
//! Defines the primary entities: [`TrackEntry`], [`PlaylistSummary`] and
//! [`PlaylistDetails`], plus the identifier newtypes that keep track,
//! playlist and playlist-slot identities from being mixed up.
//!
//! # Identity
//!
//! A playlist entry carries two keys:
//! - [`TrackId`] - the library-wide track identifier, stable across playlists
//! - [`PlaylistItemId`] - the slot identifier, unique within one playlist
//!
//! The same track may appear in a playlist more than once, each time with a
//! different `PlaylistItemId`.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Library-wide track identifier.
    TrackId
);
string_id!(
    /// Identifier of one slot within one playlist.
    PlaylistItemId
);
string_id!(
    /// Playlist identifier.
    PlaylistId
);
string_id!(
    /// Library section identifier.
    LibraryId
);

/// A track rating on the 0-10 scale in steps of 2 (0-5 stars).
///
/// `Rating::UNRATED` (0) doubles as "no rating".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const UNRATED: Rating = Rating(0);
    pub const MAX: Rating = Rating(10);

    /// All valid ratings, lowest first.
    pub const ALL: [Rating; 6] = [
        Rating(0),
        Rating(2),
        Rating(4),
        Rating(6),
        Rating(8),
        Rating(10),
    ];

    /// Create a rating from a raw 0-10 value. Returns `None` for odd or
    /// out-of-range values.
    pub fn new(value: u8) -> Option<Self> {
        (value <= 10 && value % 2 == 0).then_some(Self(value))
    }

    /// Create a rating from a star count (0-5).
    pub fn from_stars(stars: u8) -> Option<Self> {
        (stars <= 5).then(|| Self(stars * 2))
    }

    /// Normalize a server-provided rating, which may be fractional or odd,
    /// onto the even 0-10 scale.
    pub fn from_raw(value: f64) -> Self {
        if !value.is_finite() {
            return Self::UNRATED;
        }
        let clamped = value.clamp(0.0, 10.0);
        let even = (clamped / 2.0).round() * 2.0;
        Self(even as u8)
    }

    /// The raw 0-10 value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Number of filled stars (0-5).
    pub fn stars(self) -> u8 {
        self.0 / 2
    }

    pub fn is_rated(self) -> bool {
        self.0 > 0
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Rating::new(value).ok_or_else(|| {
            serde::de::Error::custom(format!("rating must be 0-10 in steps of 2, got {value}"))
        })
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One playlist slot: a library track plus its playlist-specific identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEntry {
    pub track_id: TrackId,
    pub playlist_item_id: PlaylistItemId,
    pub title: String,
    /// Artist name (server field `grandparentTitle`)
    pub artist: Option<String>,
    /// Album title (server field `parentTitle`)
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub rating: Rating,
    /// Unix timestamp (seconds) when the track was added to the library
    pub added_at: Option<i64>,
    /// Every other field the server sent, passed through unchanged
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl TrackEntry {
    /// Artist name with the display fallback.
    pub fn display_artist(&self) -> &str {
        self.artist.as_deref().unwrap_or("Unknown Artist")
    }

    /// Album title with the display fallback.
    pub fn display_album(&self) -> &str {
        self.album.as_deref().unwrap_or("Unknown Album")
    }

    pub fn stars(&self) -> u8 {
        self.rating.stars()
    }

    /// Human-readable rating, e.g. "3/5" or "Not rated".
    pub fn rating_label(&self) -> String {
        if self.rating.is_rated() {
            format!("{}/5", self.rating.stars())
        } else {
            "Not rated".to_string()
        }
    }

    /// When the track was added to the library.
    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        self.added_at
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }

    /// Case-insensitive substring match against title, artist and album.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle)
            || self
                .artist
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains(needle))
            || self
                .album
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains(needle))
    }
}

/// Playlist metadata as listed by the server.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaylistSummary {
    pub id: PlaylistId,
    pub title: String,
    /// Number of tracks the server reports
    pub track_count: u32,
    pub duration: Option<Duration>,
    pub summary: Option<String>,
}

/// A fetched playlist: its metadata and its entries in playlist order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaylistDetails {
    pub playlist: PlaylistSummary,
    pub items: Vec<TrackEntry>,
}

/// A library track returned by search (no playlist identity yet).
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryTrack {
    pub track_id: TrackId,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
}

/// A library section on the media server.
#[derive(Debug, Clone, PartialEq)]
pub struct Library {
    pub id: LibraryId,
    pub title: String,
    /// Section type as the server names it: "artist", "movie", "show", "photo"
    pub kind: String,
}

impl Library {
    /// Human-readable section type.
    pub fn kind_label(&self) -> &str {
        match self.kind.as_str() {
            "artist" => "Music",
            "movie" => "Movies",
            "show" => "TV Shows",
            "photo" => "Photos",
            other => other,
        }
    }
}

/// Format a duration as "Hh Mm" or "Mm Ss".
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else {
        format!("{}m {}s", minutes, seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_entry;

    #[test]
    fn test_rating_validation() {
        assert_eq!(Rating::new(6).map(Rating::value), Some(6));
        assert!(Rating::new(7).is_none());
        assert!(Rating::new(12).is_none());
        assert_eq!(Rating::from_stars(5), Some(Rating::MAX));
        assert!(Rating::from_stars(6).is_none());
    }

    #[test]
    fn test_rating_from_raw_rounds_to_even() {
        assert_eq!(Rating::from_raw(7.0).value(), 8);
        assert_eq!(Rating::from_raw(6.9).value(), 6);
        assert_eq!(Rating::from_raw(-3.0), Rating::UNRATED);
        assert_eq!(Rating::from_raw(42.0), Rating::MAX);
        assert_eq!(Rating::from_raw(f64::NAN), Rating::UNRATED);
    }

    #[test]
    fn test_rating_deserialize_rejects_odd() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("5").is_err());
    }

    #[test]
    fn test_rating_label() {
        let mut entry = mock_entry(1);
        assert_eq!(entry.rating_label(), "Not rated");
        entry.rating = Rating::from_stars(3).unwrap();
        assert_eq!(entry.rating_label(), "3/5");
    }

    #[test]
    fn test_matches_query_is_case_insensitive() {
        let entry = TrackEntry {
            title: "Bohemian Rhapsody".to_string(),
            artist: Some("Queen".to_string()),
            album: None,
            ..mock_entry(1)
        };
        assert!(entry.matches_query("rhapsody"));
        assert!(entry.matches_query("queen"));
        assert!(!entry.matches_query("opera"));
        assert!(entry.matches_query(""));
    }

    #[test]
    fn test_display_fallbacks() {
        let entry = TrackEntry {
            artist: None,
            album: None,
            ..mock_entry(1)
        };
        assert_eq!(entry.display_artist(), "Unknown Artist");
        assert_eq!(entry.display_album(), "Unknown Album");
    }

    #[test]
    fn test_added_at() {
        let entry = TrackEntry {
            added_at: Some(1_700_000_000),
            ..mock_entry(1)
        };
        assert_eq!(
            entry.added_at().map(|d| d.format("%Y-%m-%d").to_string()),
            Some("2023-11-14".to_string())
        );
    }

    #[test]
    fn test_library_kind_label() {
        let library = Library {
            id: LibraryId::new("3"),
            title: "Music".to_string(),
            kind: "artist".to_string(),
        };
        assert_eq!(library.kind_label(), "Music");
        let other = Library {
            kind: "podcast".to_string(),
            ..library
        };
        assert_eq!(other.kind_label(), "podcast");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(185)), "3m 5s");
        assert_eq!(format_duration(Duration::from_secs(3 * 3600 + 125)), "3h 2m");
    }
}
