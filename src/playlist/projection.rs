//! Projection of the collection through the view state onto one page.
//!
//! [`project`] is pure: filter by search query, filter by rating, optionally
//! sort by rating, then slice out the current page. It runs on every view
//! or collection change, so it only allocates the index of matching
//! entries and never clones them.

use crate::model::{PlaylistItemId, TrackEntry};

use super::view_state::{SortKey, ViewState};

/// The visible page of a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<'a> {
    /// Entries on the current page, in display order
    pub items: Vec<&'a TrackEntry>,
    /// Number of entries that passed the filters (across all pages)
    pub total_count: usize,
    /// At least 1, even when nothing matches
    pub total_pages: usize,
    /// The page actually shown, after clamping
    pub current_page: usize,
    /// Offset of the first item on this page within the filtered list
    pub offset: usize,
}

impl Projection<'_> {
    /// Playlist item ids of the visible entries, in display order.
    pub fn visible_ids(&self) -> Vec<PlaylistItemId> {
        self.items
            .iter()
            .map(|e| e.playlist_item_id.clone())
            .collect()
    }

    /// 1-based inclusive range shown, e.g. `Some((1, 1000))`; `None` when empty.
    pub fn display_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            None
        } else {
            Some((self.offset + 1, self.offset + self.items.len()))
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Number of pages for `count` items: `max(1, ceil(count / page_size))`.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Entries passing the search and rating filters, sorted per the view.
pub fn filter_and_sort<'a>(entries: &'a [TrackEntry], view: &ViewState) -> Vec<&'a TrackEntry> {
    let needle = view.search_query.to_lowercase();

    let mut matched: Vec<&TrackEntry> = entries
        .iter()
        .filter(|e| e.matches_query(&needle))
        .filter(|e| view.rating_filter.is_empty() || view.rating_filter.contains(&e.rating))
        .collect();

    if view.sort == SortKey::RatingDescending {
        // sort_by is stable: equal ratings keep playlist order
        matched.sort_by(|a, b| b.rating.cmp(&a.rating));
    }

    matched
}

/// Project the entries through the view state onto the current page.
pub fn project<'a>(entries: &'a [TrackEntry], view: &ViewState) -> Projection<'a> {
    let filtered = filter_and_sort(entries, view);
    let page_size = view.page_size.get();
    let total_count = filtered.len();
    let total_pages = total_pages(total_count, page_size);
    let current_page = view.page.clamp(1, total_pages);

    let offset = ((current_page - 1) * page_size).min(total_count);
    let end = (offset + page_size).min(total_count);

    Projection {
        items: filtered[offset..end].to_vec(),
        total_count,
        total_pages,
        current_page,
        offset,
    }
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::model::Rating;
    use crate::playlist::view_state::PageSize;
    use crate::test_utils::rated_entry;
    use proptest::prelude::*;

    fn entries_strategy() -> impl Strategy<Value = Vec<TrackEntry>> {
        prop::collection::vec(0u8..=5, 0..300).prop_map(|stars| {
            stars
                .into_iter()
                .enumerate()
                .map(|(i, s)| rated_entry(i + 1, s * 2))
                .collect()
        })
    }

    fn rating_set_strategy() -> impl Strategy<Value = Vec<Rating>> {
        prop::collection::vec(prop::sample::select(Rating::ALL.to_vec()), 0..4)
    }

    proptest! {
        /// Projecting twice with identical inputs yields identical output
        #[test]
        fn project_is_deterministic(
            entries in entries_strategy(),
            page in 0usize..10,
            sort in any::<bool>(),
            query in "[0-9]{0,2}",
        ) {
            let view = ViewState {
                search_query: query,
                sort: if sort { SortKey::RatingDescending } else { SortKey::None },
                page,
                ..ViewState::with_page_size(PageSize::S50)
            };
            prop_assert_eq!(project(&entries, &view), project(&entries, &view));
        }

        /// Filtering an already-filtered list by the same ratings changes nothing
        #[test]
        fn rating_filter_is_idempotent(
            entries in entries_strategy(),
            ratings in rating_set_strategy(),
        ) {
            let view = ViewState {
                rating_filter: ratings.into_iter().collect(),
                ..ViewState::with_page_size(PageSize::S50)
            };
            let once: Vec<TrackEntry> = filter_and_sort(&entries, &view)
                .into_iter()
                .cloned()
                .collect();
            let twice: Vec<TrackEntry> = filter_and_sort(&once, &view)
                .into_iter()
                .cloned()
                .collect();
            prop_assert_eq!(once, twice);
        }

        /// Page lengths sum to the item count and the page count is max(1, ceil(N/P))
        #[test]
        fn pages_partition_items(
            count in 0usize..2500,
            size_index in 0usize..PageSize::ALL.len(),
        ) {
            let page_size = PageSize::ALL[size_index];
            let entries: Vec<TrackEntry> = (1..=count).map(|n| rated_entry(n, 0)).collect();
            let first = project(&entries, &ViewState::with_page_size(page_size));
            let expected_pages = std::cmp::max(1, count.div_ceil(page_size.get()));
            prop_assert_eq!(first.total_pages, expected_pages);

            let sum: usize = (1..=first.total_pages)
                .map(|page| {
                    let view = ViewState { page, ..ViewState::with_page_size(page_size) };
                    project(&entries, &view).items.len()
                })
                .sum();
            prop_assert_eq!(sum, count);
        }
    }
}
