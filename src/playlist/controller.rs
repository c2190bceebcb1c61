//! Playlist view controller.
//!
//! Owns the [`TrackCollection`], [`ViewState`] and [`Selection`] for the open
//! playlist and is the only place they are mutated. Remote mutations follow
//! optimistic apply, remote call, reconcile:
//!
//! | Operation | Optimistic change | On failure |
//! |---|---|---|
//! | rate | rating applied to every entry of the track | previous rating restored |
//! | add | none (server assigns the slot id) | nothing to undo |
//! | remove | entry marked removing | removing marker cleared |
//! | bulk remove | every entry marked removing | failed entries restored |
//!
//! `NotFound` from a remove means the slot is already gone, which is what
//! the caller wanted, so it reconciles as a success.
//!
//! Renderers subscribe with [`PlaylistController::subscribe`] and receive a
//! fresh [`PageView`] after every state change.

use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::Instant;

use super::collection::TrackCollection;
use super::debounce::Debouncer;
use super::projection::{Projection, project};
use super::selection::{SelectAllState, Selection};
use super::view_state::{PageSize, SortKey, ViewState, normalize_query};
use super::PlaylistError;
use crate::config::Config;
use crate::model::{
    LibraryTrack, PlaylistId, PlaylistItemId, PlaylistSummary, Rating, TrackEntry, TrackId,
};
use crate::notify::{Notice, NoticeLevel, Notifier};
use crate::remote::{PlaylistApi, RemoteError};

/// Tunables taken from the `[view]` and `[mutations]` config sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub page_size: PageSize,
    /// Max deletes in flight during a bulk remove
    pub bulk_concurrency: usize,
    pub search_debounce: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            bulk_concurrency: 4,
            search_debounce: Duration::from_millis(300),
        }
    }
}

impl From<&Config> for ControllerOptions {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.view.page_size,
            bulk_concurrency: config.mutations.bulk_concurrency.max(1),
            search_debounce: Duration::from_millis(config.view.search_debounce_ms),
        }
    }
}

/// One visible row.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRow<'a> {
    pub entry: &'a TrackEntry,
    pub selected: bool,
    /// A delete for this entry is in flight
    pub removing: bool,
}

/// Everything a renderer needs to draw the current page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub rows: Vec<PageRow<'a>>,
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    /// 1-based inclusive range shown, `None` when the page is empty
    pub display_range: Option<(usize, usize)>,
    pub selected_count: usize,
    pub select_all: SelectAllState,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageView<'_> {
    /// "Showing X-Y of N" style summary.
    pub fn range_label(&self) -> String {
        match self.display_range {
            Some((first, last)) => format!("Showing {}-{} of {}", first, last, self.total_count),
            None => "No tracks match".to_string(),
        }
    }
}

fn build_page_view<'a>(
    collection: &'a TrackCollection,
    view: &ViewState,
    selection: &Selection,
) -> PageView<'a> {
    let projection = project(collection.entries(), view);
    let visible = projection.visible_ids();

    PageView {
        total_count: projection.total_count,
        total_pages: projection.total_pages,
        current_page: projection.current_page,
        display_range: projection.display_range(),
        selected_count: selection.len(),
        select_all: selection.select_all_state(&visible),
        has_previous: projection.has_previous(),
        has_next: projection.has_next(),
        rows: projection
            .items
            .into_iter()
            .map(|entry| PageRow {
                entry,
                selected: selection.is_selected(&entry.playlist_item_id),
                removing: collection.is_removing(&entry.playlist_item_id),
            })
            .collect(),
    }
}

/// Result of a single remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// Nothing to do: the entry was not in the collection
    AlreadyAbsent,
}

/// A bulk remove awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRemoval {
    ids: Vec<PlaylistItemId>,
}

impl PendingRemoval {
    /// Snapshot of ids to remove, duplicates dropped. Empty input is an error.
    pub fn new(ids: impl IntoIterator<Item = PlaylistItemId>) -> Result<Self, PlaylistError> {
        let mut seen = HashSet::new();
        let ids: Vec<_> = ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        if ids.is_empty() {
            return Err(PlaylistError::NothingSelected);
        }
        Ok(Self { ids })
    }

    /// Confirmation question to put to the user.
    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to remove {} from this playlist?",
            track_count(self.ids.len())
        )
    }

    pub fn ids(&self) -> &[PlaylistItemId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The user said yes.
    pub fn confirm(self) -> ConfirmedRemoval {
        ConfirmedRemoval { ids: self.ids }
    }
}

/// A bulk remove the user has confirmed. Only obtainable through
/// [`PendingRemoval::confirm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedRemoval {
    ids: Vec<PlaylistItemId>,
}

impl ConfirmedRemoval {
    pub fn ids(&self) -> &[PlaylistItemId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Aggregate outcome of a bulk remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkRemoveSummary {
    pub success_count: usize,
    pub fail_count: usize,
}

impl BulkRemoveSummary {
    pub fn attempted(&self) -> usize {
        self.success_count + self.fail_count
    }

    /// The single notification reported for the whole batch.
    pub fn notice(&self) -> Notice {
        let (level, message) = if self.fail_count == 0 {
            (
                NoticeLevel::Success,
                format!("Successfully removed {}!", track_count(self.success_count)),
            )
        } else if self.success_count == 0 {
            (NoticeLevel::Error, "Failed to remove tracks".to_string())
        } else {
            (
                NoticeLevel::Warning,
                format!(
                    "Removed {}, {} failed",
                    track_count(self.success_count),
                    self.fail_count
                ),
            )
        };
        Notice { level, message }
    }
}

fn track_count(n: usize) -> String {
    if n == 1 {
        "1 track".to_string()
    } else {
        format!("{} tracks", n)
    }
}

/// Handle returned by [`PlaylistController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&PageView<'_>) + Send>;

/// Controller for the open playlist's track view.
pub struct PlaylistController<A: PlaylistApi, N: Notifier> {
    api: A,
    notifier: N,
    options: ControllerOptions,
    playlist: Option<PlaylistSummary>,
    collection: TrackCollection,
    view: ViewState,
    selection: Selection,
    search_input: Debouncer<String>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl<A: PlaylistApi, N: Notifier> PlaylistController<A, N> {
    pub fn new(api: A, notifier: N, options: ControllerOptions) -> Self {
        Self {
            api,
            notifier,
            options,
            playlist: None,
            collection: TrackCollection::new(),
            view: ViewState::with_page_size(options.page_size),
            selection: Selection::new(),
            search_input: Debouncer::for_search(options.search_debounce),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Metadata of the open playlist.
    pub fn playlist(&self) -> Option<&PlaylistSummary> {
        self.playlist.as_ref()
    }

    pub fn is_open(&self, id: &PlaylistId) -> bool {
        self.playlist.as_ref().is_some_and(|p| &p.id == id)
    }

    pub fn collection(&self) -> &TrackCollection {
        &self.collection
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The current page, as a renderer would draw it.
    pub fn page_view(&self) -> PageView<'_> {
        build_page_view(&self.collection, &self.view, &self.selection)
    }

    /// Playlist item ids on the current page, in display order.
    pub fn visible_ids(&self) -> Vec<PlaylistItemId> {
        self.projection().visible_ids()
    }

    /// Register a listener called with the new page view after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&PageView<'_>) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the listener was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Fetch and open a playlist.
    ///
    /// Opening the playlist that is already open is a reload and keeps the
    /// rating filter; any other playlist starts from default view state. On
    /// failure the previous state is left untouched.
    pub async fn open(&mut self, id: &PlaylistId) -> Result<(), PlaylistError> {
        let details = match self.api.fetch_playlist(id).await {
            Ok(details) => details,
            Err(err) => {
                tracing::warn!(target: "playlist::controller", "Failed to load playlist {}: {}", id, err);
                self.notifier
                    .error(err.user_message("load playlist details"));
                return Err(err.into());
            }
        };

        self.view = if self.is_open(id) {
            self.view.preserved_for_reload(self.options.page_size)
        } else {
            ViewState::with_page_size(self.options.page_size)
        };
        self.search_input.cancel();
        self.selection.clear();

        let mut playlist = details.playlist;
        playlist.id = id.clone();
        tracing::info!(
            target: "playlist::controller",
            "Opened playlist {} ({}) with {} entries",
            playlist.id,
            playlist.title,
            details.items.len()
        );
        self.playlist = Some(playlist);
        self.collection.load(details.items);
        self.view_changed();
        Ok(())
    }

    /// Re-fetch the open playlist.
    pub async fn reload(&mut self) -> Result<(), PlaylistError> {
        let id = self.open_playlist_id()?;
        self.open(&id).await
    }

    /// Discard the open playlist and all view state.
    pub fn close(&mut self) {
        self.playlist = None;
        self.collection.clear();
        self.view = ViewState::with_page_size(self.options.page_size);
        self.selection.clear();
        self.search_input.cancel();
        self.emit();
    }

    // ========================================================================
    // View state transitions
    // ========================================================================

    /// Apply a search query now, trimmed. Resets to page 1.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = normalize_query(query.into());
        self.search_input.cancel();
        if self.view.search_query == query {
            return;
        }
        tracing::debug!(target: "playlist::controller", "Search query: {:?}", query);
        self.view.search_query = query;
        self.view.page = 1;
        self.view_changed();
    }

    /// Record a keystroke's worth of search input; applied once input goes
    /// quiet (see [`poll_search`](Self::poll_search)).
    pub fn search_input(&mut self, query: impl Into<String>, now: Instant) {
        self.search_input.push(query.into(), now);
    }

    /// Apply pending search input if its quiet window has elapsed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.search_input.poll(now) {
            Some(query) => {
                self.set_search_query(query);
                true
            }
            None => false,
        }
    }

    /// Add or remove a rating from the filter set. Resets to page 1.
    pub fn toggle_rating_filter(&mut self, rating: Rating) {
        if !self.view.rating_filter.remove(&rating) {
            self.view.rating_filter.insert(rating);
        }
        self.view.page = 1;
        self.view_changed();
    }

    /// Replace the rating filter set. Resets to page 1.
    pub fn set_rating_filter(&mut self, ratings: impl IntoIterator<Item = Rating>) {
        self.view.rating_filter = ratings.into_iter().collect();
        self.view.page = 1;
        self.view_changed();
    }

    pub fn clear_rating_filter(&mut self) {
        self.set_rating_filter([]);
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if self.view.sort == sort {
            return;
        }
        self.view.sort = sort;
        self.view_changed();
    }

    pub fn toggle_sort_by_rating(&mut self) {
        let sort = match self.view.sort {
            SortKey::None => SortKey::RatingDescending,
            SortKey::RatingDescending => SortKey::None,
        };
        self.set_sort(sort);
    }

    /// Go to `page`, clamped into range. Returns `false` if nothing changed.
    pub fn set_page(&mut self, page: usize) -> bool {
        let page = page.clamp(1, self.projection().total_pages);
        if page == self.view.page {
            return false;
        }
        self.view.page = page;
        self.view_changed();
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.view.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.set_page(self.view.page.saturating_sub(1))
    }

    /// Change the page size. Resets to page 1.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        if self.view.page_size == page_size {
            return;
        }
        self.view.page_size = page_size;
        self.view.page = 1;
        self.view_changed();
    }

    /// Checkbox click on a visible row. Returns the row's new state.
    pub fn click(&mut self, id: &PlaylistItemId, shift: bool) -> bool {
        let visible = self.visible_ids();
        let checked = self.selection.click(id, shift, &visible);
        self.emit();
        checked
    }

    /// The "select all" checkbox: applies to the visible page only.
    pub fn select_all(&mut self, checked: bool) {
        let visible = self.visible_ids();
        self.selection.set_all(&visible, checked);
        self.emit();
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Rate a track. Applied locally first and reverted if the server
    /// refuses.
    pub async fn rate_track(&mut self, track: &TrackId, rating: Rating) -> Result<(), PlaylistError> {
        let playlist_id = self.open_playlist_id()?;
        let previous = self
            .collection
            .rating_of(track)
            .ok_or_else(|| PlaylistError::UnknownTrack(track.clone()))?;

        // The new rating can push the row out of the rating filter, which
        // prunes it from the selection; a revert has to put that back too
        let selection_before = self.selection.clone();
        let page_before = self.view.page;

        let updated = self.collection.update_rating(track, rating);
        tracing::debug!(
            target: "playlist::mutations",
            "Optimistically rated {} ({} entries): {} -> {}",
            track,
            updated,
            previous.value(),
            rating.value()
        );
        self.collection_changed();

        match self.api.rate_track(&playlist_id, track, rating).await {
            Ok(()) => {
                tracing::info!(target: "playlist::mutations", "Rated track {} {}", track, rating.value());
                self.notifier.success("Track rated successfully!");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    target: "playlist::mutations",
                    "Rating {} failed, reverting to {}: {}",
                    track,
                    previous.value(),
                    err
                );
                self.collection.update_rating(track, previous);
                self.selection = selection_before;
                self.view.page = page_before;
                self.emit();
                self.notifier.error(err.user_message("rate track"));
                Err(err.into())
            }
        }
    }

    /// Append a library track to a playlist. Nothing changes locally; the
    /// caller reloads to pick up the server-assigned slot.
    pub async fn add_track(
        &self,
        playlist: &PlaylistSummary,
        track: &LibraryTrack,
    ) -> Result<(), PlaylistError> {
        match self.api.add_track(&playlist.id, &track.track_id).await {
            Ok(()) => {
                tracing::info!(
                    target: "playlist::mutations",
                    "Added track {} to playlist {}",
                    track.track_id,
                    playlist.id
                );
                self.notifier
                    .success(format!("\"{}\" added to \"{}\"!", track.title, playlist.title));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    target: "playlist::mutations",
                    "Adding {} to playlist {} failed: {}",
                    track.track_id,
                    playlist.id,
                    err
                );
                self.notifier
                    .error(err.user_message("add track to playlist"));
                Err(err.into())
            }
        }
    }

    /// Remove one entry from the open playlist.
    pub async fn remove_track(&mut self, item: &PlaylistItemId) -> Result<RemoveOutcome, PlaylistError> {
        let playlist_id = self.open_playlist_id()?;
        if !self.collection.mark_removing(item) {
            tracing::debug!(target: "playlist::mutations", "Entry {} already absent", item);
            self.selection.remove([item]);
            return Ok(RemoveOutcome::AlreadyAbsent);
        }
        self.emit();

        match self.api.remove_track(&playlist_id, item).await {
            Ok(()) | Err(RemoteError::NotFound(_)) => {
                self.collection.remove(item);
                self.selection.remove([item]);
                self.collection_changed();
                tracing::info!(target: "playlist::mutations", "Removed entry {}", item);
                self.notifier.success("Track removed from playlist!");
                Ok(RemoveOutcome::Removed)
            }
            Err(err) => {
                tracing::warn!(target: "playlist::mutations", "Removing entry {} failed: {}", item, err);
                self.collection.clear_removing(item);
                self.emit();
                self.notifier.error(err.user_message("remove track"));
                Err(err.into())
            }
        }
    }

    /// Snapshot the selection, in playlist order, for confirmation.
    pub fn prepare_bulk_remove(&self) -> Result<PendingRemoval, PlaylistError> {
        self.open_playlist_id()?;
        PendingRemoval::new(
            self.collection
                .entries()
                .iter()
                .filter(|e| self.selection.is_selected(&e.playlist_item_id))
                .map(|e| e.playlist_item_id.clone()),
        )
    }

    /// Remove a confirmed batch.
    ///
    /// Each id gets at most one delete; up to `bulk_concurrency` are in
    /// flight at once. Failed entries stay in the collection. Every attempted
    /// id leaves the selection. Exactly one notification is sent.
    pub async fn bulk_remove(&mut self, batch: ConfirmedRemoval) -> Result<BulkRemoveSummary, PlaylistError> {
        let playlist_id = self.open_playlist_id()?;
        let ConfirmedRemoval { ids } = batch;

        let mut summary = BulkRemoveSummary::default();
        let mut to_send = Vec::with_capacity(ids.len());
        for id in &ids {
            if self.collection.mark_removing(id) {
                to_send.push(id.clone());
            } else {
                tracing::debug!(target: "playlist::mutations", "Entry {} already absent", id);
                summary.success_count += 1;
            }
        }
        self.emit();

        tracing::info!(
            target: "playlist::mutations",
            "Removing {} entries from playlist {}",
            to_send.len(),
            playlist_id
        );

        let concurrency = self.options.bulk_concurrency.max(1);
        let api = &self.api;
        let outcomes: Vec<(PlaylistItemId, Result<(), RemoteError>)> = stream::iter(to_send)
            .map(|id| {
                let playlist_id = &playlist_id;
                async move {
                    let result = api.remove_track(playlist_id, &id).await;
                    (id, result)
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        for (id, result) in outcomes {
            match result {
                Ok(()) | Err(RemoteError::NotFound(_)) => {
                    self.collection.remove(&id);
                    summary.success_count += 1;
                }
                Err(err) => {
                    tracing::warn!(target: "playlist::mutations", "Removing entry {} failed: {}", id, err);
                    self.collection.clear_removing(&id);
                    summary.fail_count += 1;
                }
            }
        }

        self.selection.remove(&ids);
        self.collection_changed();

        tracing::info!(
            target: "playlist::mutations",
            "Bulk remove finished: {} removed, {} failed",
            summary.success_count,
            summary.fail_count
        );
        self.notifier.notify(summary.notice());
        Ok(summary)
    }

    // ========================================================================
    // Server and playlist management
    // ========================================================================

    /// Point the service at a media server. Both fields are required.
    pub async fn connect(&self, server_url: &str, token: &str) -> Result<(), PlaylistError> {
        let (server_url, token) = (server_url.trim(), token.trim());
        if server_url.is_empty() || token.is_empty() {
            let err = PlaylistError::MissingCredentials;
            self.notifier.error(err.to_string());
            return Err(err);
        }

        match self.api.connect(server_url, token).await {
            Ok(()) => {
                tracing::info!(target: "playlist::controller", "Connected to {}", server_url);
                self.notifier.success("Connected successfully!");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(target: "playlist::controller", "Connecting to {} failed: {}", server_url, err);
                self.notifier.error(err.user_message("connect"));
                Err(err.into())
            }
        }
    }

    /// Create an empty playlist. The name is trimmed and must not be blank.
    pub async fn create_playlist(&self, name: &str) -> Result<(), PlaylistError> {
        let name = name.trim();
        if name.is_empty() {
            let err = PlaylistError::EmptyPlaylistName;
            self.notifier.error(err.to_string());
            return Err(err);
        }

        match self.api.create_playlist(name).await {
            Ok(()) => {
                tracing::info!(target: "playlist::mutations", "Created playlist {:?}", name);
                self.notifier.success("Playlist created successfully!");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(target: "playlist::mutations", "Creating playlist {:?} failed: {}", name, err);
                self.notifier.error(err.user_message("create playlist"));
                Err(err.into())
            }
        }
    }

    /// Delete a playlist. Closes it first if it is the open one.
    pub async fn delete_playlist(&mut self, id: &PlaylistId) -> Result<(), PlaylistError> {
        match self.api.delete_playlist(id).await {
            Ok(()) => {
                tracing::info!(target: "playlist::mutations", "Deleted playlist {}", id);
                if self.is_open(id) {
                    self.close();
                }
                self.notifier.success("Playlist deleted successfully!");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(target: "playlist::mutations", "Deleting playlist {} failed: {}", id, err);
                self.notifier.error(err.user_message("delete playlist"));
                Err(err.into())
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn open_playlist_id(&self) -> Result<PlaylistId, PlaylistError> {
        self.playlist
            .as_ref()
            .map(|p| p.id.clone())
            .ok_or(PlaylistError::NoPlaylistOpen)
    }

    fn projection(&self) -> Projection<'_> {
        project(self.collection.entries(), &self.view)
    }

    /// Clamp the page and return the visible ids.
    fn normalize_page(&mut self) -> Vec<PlaylistItemId> {
        let (page, visible) = {
            let projection = self.projection();
            (projection.current_page, projection.visible_ids())
        };
        self.view.page = page;
        visible
    }

    /// After a view state change: selection pruned, anchor cleared.
    fn view_changed(&mut self) {
        let visible = self.normalize_page();
        self.selection.retain_visible(&visible);
        self.emit();
    }

    /// After the collection changed: selection pruned, anchor kept if still
    /// visible.
    fn collection_changed(&mut self) {
        let visible = self.normalize_page();
        self.selection.prune_to(&visible);
        self.emit();
    }

    fn emit(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let view = build_page_view(&self.collection, &self.view, &self.selection);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&view);
        }
    }
}
