//! CLI command definitions and dispatch.
//!
//! This module provides the command-line interface for Playlist Minder.
//! Each group of subcommands is implemented in its own submodule:
//! - `browse`: Listing playlists and libraries, showing pages and entry details, library search
//! - `edit`: Creating and deleting playlists; rating, adding and removing tracks
//! - `settings`: Connecting to a media server, showing and saving the configuration

mod browse;
mod edit;
mod settings;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

pub use browse::{ShowOptions, cmd_details, cmd_libraries, cmd_playlists, cmd_search, cmd_show};
pub use edit::{cmd_add, cmd_create, cmd_delete, cmd_rate, cmd_remove};
pub use settings::{cmd_config, cmd_connect};

use crate::config::{self, Config};
use crate::notify::ConsoleNotifier;
use crate::playlist::{ControllerOptions, PageSize, PlaylistController};
use crate::remote::PlaylistClient;

/// Playlist Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Media-library service URL (overrides the config file)
    #[arg(long, global = true, env = "PLAYLIST_MINDER_SERVER_URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Connect the service to a media server
    Connect {
        /// Media server URL, e.g. http://192.168.1.10:32400
        #[arg(long, env = "PLAYLIST_MINDER_MEDIA_URL")]
        media_url: String,
        /// Media server access token
        #[arg(long, env = "PLAYLIST_MINDER_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// List the media server's libraries
    Libraries,
    /// List all playlists
    Playlists,
    /// Create an empty playlist
    Create {
        /// Playlist name
        name: String,
    },
    /// Delete a playlist
    Delete {
        /// Playlist ID
        playlist: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one page of a playlist's tracks
    Show {
        /// Playlist ID
        playlist: String,
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Tracks per page: 50, 100, 250, 500, 1000, 2000, 5000 or 10000
        #[arg(long, value_parser = parse_page_size)]
        page_size: Option<PageSize>,
        /// Only show tracks whose title, artist or album contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Only show tracks with this many stars (repeatable)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=5))]
        rating: Vec<u8>,
        /// Sort by rating, highest first
        #[arg(long)]
        sort_by_rating: bool,
    },
    /// Show details of one playlist entry
    Details {
        /// Playlist ID
        playlist: String,
        /// Playlist item ID of the entry
        item: String,
    },
    /// Rate a track (0 stars clears the rating)
    Rate {
        /// Playlist ID
        playlist: String,
        /// Library track ID
        track: String,
        /// Stars, 0-5
        #[arg(value_parser = clap::value_parser!(u8).range(0..=5))]
        stars: u8,
    },
    /// Add a library track to a playlist
    Add {
        /// Playlist ID
        playlist: String,
        /// Library track ID, or search text matching exactly one track
        track: String,
    },
    /// Remove entries from a playlist
    Remove {
        /// Playlist ID
        playlist: String,
        /// Playlist item IDs to remove
        #[arg(required = true, num_args = 1..)]
        items: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Search the library for tracks
    Search {
        /// Text to search for
        query: String,
    },
    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = effective_config(cli);

    match &cli.command {
        Commands::Connect { media_url, token } => cmd_connect(&rt, &config, media_url, token),
        Commands::Libraries => cmd_libraries(&rt, &config),
        Commands::Playlists => cmd_playlists(&rt, &config),
        Commands::Create { name } => cmd_create(&rt, &config, name),
        Commands::Delete { playlist, yes } => cmd_delete(&rt, &config, playlist, *yes),
        Commands::Show {
            playlist,
            page,
            page_size,
            search,
            rating,
            sort_by_rating,
        } => {
            let options = ShowOptions {
                page: *page,
                page_size: *page_size,
                search: search.as_deref(),
                stars: rating,
                sort_by_rating: *sort_by_rating,
            };
            cmd_show(&rt, &config, playlist, &options)
        }
        Commands::Details { playlist, item } => cmd_details(&rt, &config, playlist, item),
        Commands::Rate {
            playlist,
            track,
            stars,
        } => cmd_rate(&rt, &config, playlist, track, *stars),
        Commands::Add { playlist, track } => cmd_add(&rt, &config, playlist, track),
        Commands::Remove {
            playlist,
            items,
            yes,
        } => cmd_remove(&rt, &config, playlist, items, *yes),
        Commands::Search { query } => cmd_search(&rt, &config, query),
        Commands::Config { save } => cmd_config(&config, *save),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Config file plus environment, with `--server` applied last.
fn effective_config(cli: &Cli) -> Config {
    let mut config = config::load();
    if let Some(server) = cli.server.as_deref().filter(|s| !s.trim().is_empty()) {
        config.server.url = server.trim().to_string();
    }
    config
}

pub(crate) type CliController = PlaylistController<PlaylistClient, ConsoleNotifier>;

/// Controller wired to the HTTP client and console notifications.
pub(crate) fn controller(config: &Config) -> CliController {
    PlaylistController::new(
        PlaylistClient::from_config(&config.server),
        ConsoleNotifier,
        ControllerOptions::from(config),
    )
}

fn parse_page_size(raw: &str) -> Result<PageSize, String> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("not a number: {raw}"))?;
    PageSize::try_from(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("250"), Ok(PageSize::S250));
        assert!(parse_page_size("300").is_err());
        assert!(parse_page_size("lots").is_err());
    }

    #[test]
    fn test_show_arguments() {
        let cli = Cli::try_parse_from([
            "playlist-minder",
            "show",
            "42",
            "--rating",
            "5",
            "--rating",
            "4",
            "--sort-by-rating",
            "--page-size",
            "50",
        ])
        .unwrap();

        match cli.command {
            Commands::Show {
                playlist,
                rating,
                sort_by_rating,
                page_size,
                page,
                ..
            } => {
                assert_eq!(playlist, "42");
                assert_eq!(rating, vec![5, 4]);
                assert!(sort_by_rating);
                assert_eq!(page_size, Some(PageSize::S50));
                assert_eq!(page, 1);
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_rate_rejects_out_of_range_stars() {
        assert!(Cli::try_parse_from(["playlist-minder", "rate", "1", "2", "6"]).is_err());
    }

    #[test]
    fn test_connect_arguments() {
        let cli = Cli::try_parse_from([
            "playlist-minder",
            "connect",
            "--media-url",
            "http://plex.local:32400",
            "--token",
            "abc123",
        ])
        .unwrap();

        match cli.command {
            Commands::Connect { media_url, token } => {
                assert_eq!(media_url, "http://plex.local:32400");
                assert_eq!(token, "abc123");
            }
            _ => panic!("expected connect"),
        }
    }

    #[test]
    fn test_delete_arguments() {
        let cli = Cli::try_parse_from(["playlist-minder", "delete", "42", "-y"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Delete { ref playlist, yes: true } if playlist == "42"
        ));
        assert!(Cli::try_parse_from(["playlist-minder", "create"]).is_err());
    }

    #[test]
    fn test_remove_requires_items() {
        assert!(Cli::try_parse_from(["playlist-minder", "remove", "1"]).is_err());
    }
}
