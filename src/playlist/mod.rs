//! Playlist track view: collection, view state, projection, selection and
//! the controller that orchestrates remote mutations over them.
//!
//! Everything except [`controller`] is synchronous and free of I/O. The
//! controller owns one instance of each piece and is the only thing that
//! mutates them.

pub mod collection;
pub mod controller;
pub mod debounce;
pub mod projection;
pub mod selection;
pub mod view_state;

pub use collection::TrackCollection;
pub use controller::{
    BulkRemoveSummary, ConfirmedRemoval, ControllerOptions, PageRow, PageView, PendingRemoval,
    PlaylistController, RemoveOutcome,
};
pub use projection::{Projection, project};
pub use selection::{SelectAllState, Selection};
pub use view_state::{PageSize, SortKey, ViewState};

use thiserror::Error;

use crate::model::TrackId;
use crate::remote::RemoteError;

/// Errors from playlist controller operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("No playlist is open")]
    NoPlaylistOpen,

    #[error("Track not found in playlist: {0}")]
    UnknownTrack(TrackId),

    #[error("No tracks selected")]
    NothingSelected,

    #[error("Please enter a playlist name")]
    EmptyPlaylistName,

    #[error("Please fill in all fields")]
    MissingCredentials,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
