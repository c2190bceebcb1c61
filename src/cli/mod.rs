//! Command-line interface for playlist-minder.
//!
//! This module provides CLI commands for browsing playlists, rating tracks,
//! and adding or removing playlist entries on the media-library service.

mod commands;

pub use commands::{Cli, Commands, run_command};
