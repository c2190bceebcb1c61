//! The authoritative in-memory sequence of entries for the open playlist.

use std::collections::HashSet;

use crate::model::{PlaylistItemId, Rating, TrackEntry, TrackId};

/// Ordered playlist entries plus the transient "removing" marker.
///
/// Order is playlist order as last fetched from the server.
/// `playlist_item_id` is unique across `entries` at all times.
#[derive(Debug, Clone, Default)]
pub struct TrackCollection {
    entries: Vec<TrackEntry>,
    /// Entries with a delete request in flight
    removing: HashSet<PlaylistItemId>,
}

impl TrackCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire sequence.
    ///
    /// Duplicate playlist item ids keep their first occurrence.
    pub fn load(&mut self, entries: Vec<TrackEntry>) {
        let mut seen = HashSet::with_capacity(entries.len());
        let before = entries.len();
        self.entries = entries
            .into_iter()
            .filter(|e| seen.insert(e.playlist_item_id.clone()))
            .collect();
        if self.entries.len() != before {
            tracing::warn!(
                target: "playlist::collection",
                "Dropped {} entries with duplicate playlist item ids",
                before - self.entries.len()
            );
        }
        self.removing.clear();
    }

    /// Discard all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.removing.clear();
    }

    pub fn entries(&self) -> &[TrackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_by_playlist_item_id(&self, id: &PlaylistItemId) -> Option<&TrackEntry> {
        self.entries.iter().find(|e| &e.playlist_item_id == id)
    }

    pub fn contains(&self, id: &PlaylistItemId) -> bool {
        self.find_by_playlist_item_id(id).is_some()
    }

    /// Current rating of a track, from its first entry.
    pub fn rating_of(&self, track_id: &TrackId) -> Option<Rating> {
        self.entries
            .iter()
            .find(|e| &e.track_id == track_id)
            .map(|e| e.rating)
    }

    /// Delete the entry with this playlist item id.
    ///
    /// Returns the removed entry, or `None` if it was already absent.
    pub fn remove(&mut self, id: &PlaylistItemId) -> Option<TrackEntry> {
        self.removing.remove(id);
        let index = self.entries.iter().position(|e| &e.playlist_item_id == id)?;
        Some(self.entries.remove(index))
    }

    /// Set the rating on every entry sharing this track id.
    ///
    /// Returns how many entries were updated.
    pub fn update_rating(&mut self, track_id: &TrackId, rating: Rating) -> usize {
        let mut updated = 0;
        for entry in self.entries.iter_mut().filter(|e| &e.track_id == track_id) {
            entry.rating = rating;
            updated += 1;
        }
        updated
    }

    /// Mark an entry as having a delete in flight. Returns `false` if absent.
    pub fn mark_removing(&mut self, id: &PlaylistItemId) -> bool {
        if self.contains(id) {
            self.removing.insert(id.clone());
            true
        } else {
            false
        }
    }

    /// Restore an entry to its normal state after a failed delete.
    pub fn clear_removing(&mut self, id: &PlaylistItemId) {
        self.removing.remove(id);
    }

    pub fn is_removing(&self, id: &PlaylistItemId) -> bool {
        self.removing.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{item, mock_entries, mock_entry};

    #[test]
    fn test_load_replaces_entries() {
        let mut collection = TrackCollection::new();
        collection.load(mock_entries(3));
        collection.mark_removing(&item(1));
        collection.load(mock_entries(2));

        assert_eq!(collection.len(), 2);
        assert!(!collection.is_removing(&item(1)));
    }

    #[test]
    fn test_load_drops_duplicate_item_ids() {
        let mut first = mock_entry(1);
        first.title = "First".to_string();
        let mut dup = mock_entry(1);
        dup.title = "Duplicate".to_string();

        let mut collection = TrackCollection::new();
        collection.load(vec![first, mock_entry(2), dup]);

        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.find_by_playlist_item_id(&item(1)).map(|e| e.title.as_str()),
            Some("First")
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut collection = TrackCollection::new();
        collection.load(mock_entries(3));

        assert!(collection.remove(&item(2)).is_some());
        let after_once: Vec<_> = collection.entries().to_vec();
        assert!(collection.remove(&item(2)).is_none());

        assert_eq!(collection.entries(), after_once.as_slice());
    }

    #[test]
    fn test_update_rating_hits_every_duplicate() {
        let mut same_track = mock_entry(2);
        same_track.track_id = mock_entry(1).track_id;

        let mut collection = TrackCollection::new();
        collection.load(vec![mock_entry(1), same_track, mock_entry(3)]);

        let updated = collection.update_rating(&mock_entry(1).track_id, Rating::MAX);

        assert_eq!(updated, 2);
        assert_eq!(collection.entries()[0].rating, Rating::MAX);
        assert_eq!(collection.entries()[1].rating, Rating::MAX);
        assert_eq!(collection.entries()[2].rating, Rating::UNRATED);
    }

    #[test]
    fn test_mark_removing_requires_presence() {
        let mut collection = TrackCollection::new();
        collection.load(mock_entries(1));

        assert!(collection.mark_removing(&item(1)));
        assert!(!collection.mark_removing(&item(9)));
        assert!(collection.is_removing(&item(1)));

        collection.clear_removing(&item(1));
        assert!(!collection.is_removing(&item(1)));
    }
}
