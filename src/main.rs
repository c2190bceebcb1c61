//! Playlist Minder - A playlist manager for a remote media-library service.
//!
//! This application browses playlists, rates tracks, and adds or removes
//! playlist entries from the command line. The track view logic lives in
//! [`playlist`]; [`remote`] talks to the service.

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod playlist;
pub mod remote;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; component targets ("playlist::mutations", ...) sit
    // outside the crate path so they get their own directives
    let mut filter = EnvFilter::from_default_env();
    for directive in ["playlist_minder=info", "playlist=info", "remote=info", "cli=info"] {
        filter = filter.add_directive(directive.parse()?);
    }
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run_command(&args)
}
