//! Read-only commands: libraries, playlists, pages, entry details and
//! library search.

use tokio::runtime::Runtime;

use super::controller;
use crate::config::Config;
use crate::error::{Error, ResultExt};
use crate::model::{PlaylistId, PlaylistItemId, Rating, TrackEntry, format_duration};
use crate::playlist::{PageRow, PageSize, PageView, SortKey};

/// Filters and paging for `show`
pub struct ShowOptions<'a> {
    pub page: usize,
    pub page_size: Option<PageSize>,
    pub search: Option<&'a str>,
    /// Accepted star counts; empty accepts all
    pub stars: &'a [u8],
    pub sort_by_rating: bool,
}

/// List the media server's libraries
pub fn cmd_libraries(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    let controller = controller(config);
    let libraries = rt
        .block_on(controller.api().list_libraries())
        .map_err(Error::from)
        .with_context("Error loading libraries")?;

    if libraries.is_empty() {
        println!("No libraries found.");
        return Ok(());
    }

    for library in libraries {
        println!("{:>6}  {:<30} {}", library.id, library.title, library.kind_label());
    }
    Ok(())
}

/// List all playlists
pub fn cmd_playlists(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    let controller = controller(config);
    rt.block_on(async {
        let playlists = controller
            .api()
            .list_playlists()
            .await
            .map_err(Error::from)
            .with_context(format!("Failed to load playlists from {}", config.server.url))?;

        if playlists.is_empty() {
            println!("No playlists found.");
            return Ok(());
        }

        for playlist in playlists {
            let duration = playlist
                .duration
                .map(format_duration)
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:>8}  {:<40} {:>6} tracks  {:>8}",
                playlist.id, playlist.title, playlist.track_count, duration
            );
        }
        Ok(())
    })
}

/// Show one page of a playlist
pub fn cmd_show(
    rt: &Runtime,
    config: &Config,
    playlist: &str,
    options: &ShowOptions<'_>,
) -> anyhow::Result<()> {
    let mut controller = controller(config);
    let id = PlaylistId::new(playlist);

    rt.block_on(controller.open(&id))
        .with_context(format!("Failed to open playlist {}", id))?;

    if let Some(size) = options.page_size {
        controller.set_page_size(size);
    }
    if let Some(query) = options.search {
        controller.set_search_query(query);
    }
    if !options.stars.is_empty() {
        controller.set_rating_filter(options.stars.iter().filter_map(|s| Rating::from_stars(*s)));
    }
    if options.sort_by_rating {
        controller.set_sort(SortKey::RatingDescending);
    }
    controller.set_page(options.page);

    if let Some(summary) = controller.playlist() {
        println!("{} ({} tracks)", summary.title, controller.collection().len());
    }
    for line in render_page(&controller.page_view()) {
        println!("{}", line);
    }
    Ok(())
}

/// Print every detail of one playlist entry
pub fn cmd_details(rt: &Runtime, config: &Config, playlist: &str, item: &str) -> anyhow::Result<()> {
    let mut controller = controller(config);
    let id = PlaylistId::new(playlist);

    rt.block_on(controller.open(&id))
        .with_context(format!("Failed to open playlist {}", id))?;

    let entry = controller
        .collection()
        .find_by_playlist_item_id(&PlaylistItemId::new(item))
        .ok_or_else(|| anyhow::anyhow!("Entry {} is not in playlist {}", item, id))?;

    for line in render_details(entry) {
        println!("{}", line);
    }
    Ok(())
}

/// Search the library for tracks
pub fn cmd_search(rt: &Runtime, config: &Config, query: &str) -> anyhow::Result<()> {
    let query = query.trim();
    anyhow::ensure!(!query.is_empty(), "Please enter a search term");

    let controller = controller(config);
    rt.block_on(async {
        let tracks = controller
            .api()
            .search_tracks(query)
            .await
            .map_err(Error::from)
            .with_context("Search failed")?;

        if tracks.is_empty() {
            println!("No tracks found.");
            return Ok(());
        }

        for track in tracks {
            println!(
                "{:>8}  {} - {} - {}",
                track.track_id,
                track.title,
                track.artist.as_deref().unwrap_or("Unknown Artist"),
                track.album.as_deref().unwrap_or("Unknown Album")
            );
        }
        Ok(())
    })
}

// ============================================================================
// Rendering
// ============================================================================

fn render_page(view: &PageView<'_>) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.rows.len() + 2);
    lines.push(format!(
        "{}  (page {}/{}, {} selected)",
        view.range_label(),
        view.current_page,
        view.total_pages,
        view.selected_count
    ));
    lines.extend(view.rows.iter().map(render_row));
    if view.has_next {
        lines.push(format!("... more on page {}", view.current_page + 1));
    }
    lines
}

fn render_row(row: &PageRow<'_>) -> String {
    let entry = row.entry;
    let marker = if row.removing {
        '-'
    } else if row.selected {
        '*'
    } else {
        ' '
    };
    let duration = entry
        .duration
        .map(format_duration)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}{:>8}  {:<5}  {} - {} - {}  [{}]",
        marker,
        entry.playlist_item_id,
        stars_bar(entry.stars()),
        entry.title,
        entry.display_artist(),
        entry.display_album(),
        duration
    )
}

fn stars_bar(stars: u8) -> String {
    let filled = usize::from(stars.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn render_details(entry: &TrackEntry) -> Vec<String> {
    let mut lines = vec![
        format!("Title:     {}", entry.title),
        format!("Artist:    {}", entry.display_artist()),
        format!("Album:     {}", entry.display_album()),
        format!(
            "Duration:  {}",
            entry
                .duration
                .map(format_duration)
                .unwrap_or_else(|| "Unknown".to_string())
        ),
        format!("Rating:    {}", entry.rating_label()),
        format!("Track ID:  {}", entry.track_id),
        format!("Item ID:   {}", entry.playlist_item_id),
    ];
    if let Some(added) = entry.added_at() {
        lines.push(format!("Added:     {}", added.format("%Y-%m-%d")));
    }
    for (key, value) in &entry.metadata {
        lines.push(format!("{:<10} {}", format!("{key}:"), value));
    }
    lines
}
