//! Mutating commands: create and delete playlists; rate, add and remove
//! tracks.

use std::io::{self, BufRead, Write};

use tokio::runtime::Runtime;
use tracing::warn;

use super::controller;
use crate::config::Config;
use crate::error::{Error, ResultExt};
use crate::model::{LibraryTrack, PlaylistId, PlaylistItemId, PlaylistSummary, Rating, TrackId};
use crate::playlist::{PendingRemoval, RemoveOutcome};

/// Rate a track in the context of a playlist
pub fn cmd_rate(
    rt: &Runtime,
    config: &Config,
    playlist: &str,
    track: &str,
    stars: u8,
) -> anyhow::Result<()> {
    let rating = Rating::from_stars(stars)
        .ok_or_else(|| anyhow::anyhow!("Rating must be 0-5 stars, got {}", stars))?;
    let mut controller = controller(config);
    let id = PlaylistId::new(playlist);
    let track = TrackId::new(track);

    rt.block_on(async {
        controller
            .open(&id)
            .await
            .with_context(format!("Failed to open playlist {}", id))?;
        controller
            .rate_track(&track, rating)
            .await
            .with_context(format!("Failed to rate track {}", track))
    })?;
    Ok(())
}

/// Create an empty playlist
pub fn cmd_create(rt: &Runtime, config: &Config, name: &str) -> anyhow::Result<()> {
    let controller = controller(config);
    rt.block_on(controller.create_playlist(name))
        .with_context(format!("Failed to create playlist {:?}", name))?;
    Ok(())
}

/// Delete a playlist after confirmation
pub fn cmd_delete(rt: &Runtime, config: &Config, playlist: &str, yes: bool) -> anyhow::Result<()> {
    let mut controller = controller(config);
    let id = PlaylistId::new(playlist);
    let summary = find_playlist(rt, &controller, &id)?;

    if !yes && !confirm(&delete_prompt(&summary.title))? {
        println!("Cancelled.");
        return Ok(());
    }

    rt.block_on(controller.delete_playlist(&id))
        .with_context(format!("Failed to delete playlist {}", id))?;
    Ok(())
}

/// Add a track, then reload to pick up the new entry
pub fn cmd_add(rt: &Runtime, config: &Config, playlist: &str, track: &str) -> anyhow::Result<()> {
    let mut controller = controller(config);
    let id = PlaylistId::new(playlist);
    let summary = find_playlist(rt, &controller, &id)?;

    let results = rt
        .block_on(controller.api().search_tracks(track))
        .map_err(Error::from)
        .with_context("Search failed")?;
    let track = pick_track(track, results)?;

    rt.block_on(controller.add_track(&summary, &track))
        .with_context(format!("Failed to add track {} to playlist {}", track.track_id, id))?;
    rt.block_on(controller.open(&id))
        .with_context(format!("Failed to reload playlist {}", id))?;

    println!(
        "{} now has {} tracks",
        summary.title,
        controller.collection().len()
    );
    Ok(())
}

/// Remove one entry, or several after confirmation
pub fn cmd_remove(
    rt: &Runtime,
    config: &Config,
    playlist: &str,
    items: &[String],
    yes: bool,
) -> anyhow::Result<()> {
    let mut controller = controller(config);
    let id = PlaylistId::new(playlist);

    rt.block_on(controller.open(&id))
        .with_context(format!("Failed to open playlist {}", id))?;

    let (known, unknown): (Vec<_>, Vec<_>) = items
        .iter()
        .map(PlaylistItemId::new)
        .partition(|item| controller.collection().contains(item));
    for item in &unknown {
        warn!(target: "cli", "Entry {} is not in playlist {}, skipping", item, id);
    }

    if let [item] = known.as_slice() {
        let outcome = rt
            .block_on(controller.remove_track(item))
            .with_context(format!("Failed to remove entry {}", item))?;
        if outcome == RemoveOutcome::AlreadyAbsent {
            println!("Entry {} was already removed", item);
        }
        return Ok(());
    }

    let pending = PendingRemoval::new(known)
        .with_context(format!("Nothing to remove from playlist {}", id))?;
    if !yes && !confirm(&pending.prompt())? {
        println!("Cancelled.");
        return Ok(());
    }

    let summary = rt
        .block_on(controller.bulk_remove(pending.confirm()))
        .with_context("Bulk remove failed")?;
    anyhow::ensure!(
        summary.fail_count == 0,
        "{} of {} removals failed",
        summary.fail_count,
        summary.attempted()
    );
    Ok(())
}

/// Look up a playlist's metadata by id
fn find_playlist(
    rt: &Runtime,
    controller: &super::CliController,
    id: &PlaylistId,
) -> anyhow::Result<PlaylistSummary> {
    let playlists = rt
        .block_on(controller.api().list_playlists())
        .map_err(Error::from)
        .with_context("Failed to load playlists")?;
    anyhow::ensure!(
        !playlists.is_empty(),
        "No playlists available. Create a playlist first."
    );
    playlists
        .into_iter()
        .find(|p| &p.id == id)
        .ok_or_else(|| anyhow::anyhow!("Playlist {} not found", id))
}

/// Choose the track to add: a result whose id is `input`, else the only
/// result. With no results `input` is taken to be a track id.
fn pick_track(input: &str, mut results: Vec<LibraryTrack>) -> anyhow::Result<LibraryTrack> {
    if let Some(index) = results.iter().position(|t| t.track_id.as_str() == input) {
        return Ok(results.swap_remove(index));
    }
    match results.len() {
        0 => Ok(LibraryTrack {
            track_id: TrackId::new(input),
            title: input.to_string(),
            artist: None,
            album: None,
        }),
        1 => Ok(results.remove(0)),
        n => anyhow::bail!(
            "\"{}\" matches {} tracks; pass a track ID from `search {}`",
            input,
            n,
            input
        ),
    }
}

fn delete_prompt(title: &str) -> String {
    format!("Are you sure you want to delete \"{}\"?", title)
}

/// Ask a yes/no question on stdin; anything but y/yes is no
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
