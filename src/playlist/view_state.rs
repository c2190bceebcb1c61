//! Derived, recomputable view state: filters, sort order and pagination.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Rating;

/// Number of entries per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    S50,
    S100,
    S250,
    S500,
    #[default]
    S1000,
    S2000,
    S5000,
    S10000,
}

impl PageSize {
    pub const ALL: [PageSize; 8] = [
        PageSize::S50,
        PageSize::S100,
        PageSize::S250,
        PageSize::S500,
        PageSize::S1000,
        PageSize::S2000,
        PageSize::S5000,
        PageSize::S10000,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::S50 => 50,
            PageSize::S100 => 100,
            PageSize::S250 => 250,
            PageSize::S500 => 500,
            PageSize::S1000 => 1000,
            PageSize::S2000 => 2000,
            PageSize::S5000 => 5000,
            PageSize::S10000 => 10000,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|p| p.get() == value as usize)
            .ok_or_else(|| {
                format!("unsupported page size {value} (expected 50, 100, 250, 500, 1000, 2000, 5000 or 10000)")
            })
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.get() as u32
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Sort order applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Playlist order
    #[default]
    None,
    /// Highest rating first; ties keep playlist order
    RatingDescending,
}

/// Search, filter, sort and pagination settings for the open playlist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    /// Case-insensitive substring matched against title, artist and album
    pub search_query: String,
    /// Accepted ratings; empty accepts all
    pub rating_filter: BTreeSet<Rating>,
    pub sort: SortKey,
    /// 1-based; clamped into range when projected
    pub page: usize,
    pub page_size: PageSize,
}

impl ViewState {
    /// Defaults with the given page size.
    pub fn with_page_size(page_size: PageSize) -> Self {
        Self {
            page: 1,
            page_size,
            ..Default::default()
        }
    }

    /// State for a reload of the same playlist: defaults except the rating
    /// filter, which is carried over.
    pub fn preserved_for_reload(&self, page_size: PageSize) -> Self {
        Self {
            rating_filter: self.rating_filter.clone(),
            ..Self::with_page_size(page_size)
        }
    }
}

/// Search text as stored in [`ViewState::search_query`]: surrounding
/// whitespace is dropped, so a blank query matches everything.
pub fn normalize_query(query: String) -> String {
    let trimmed = query.trim();
    if trimmed.len() == query.len() {
        query
    } else {
        trimmed.to_string()
    }
}
