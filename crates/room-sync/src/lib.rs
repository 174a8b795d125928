//! Polling client for the room chat service.
//!
//! The chat server has no push transport. A client presents a converging
//! view of a room by re-fetching on a fixed interval while the view is open:
//!
//! - [`spawn_room_poller`] ticks every three seconds by default and fetches
//!   one snapshot per tick. Fetches run independently, so a slow response
//!   never delays the next tick.
//! - [`SyncView`] numbers each dispatched fetch with a [`RequestTicket`] and
//!   discards any response older than one already applied.
//! - Dropping or closing the [`PollHandle`] stops the interval and aborts
//!   fetches still in flight.
//!
//! # Example
//!
//! ```no_run
//! use room_sync::{ChannelRef, HttpRoomFeed, PollTarget, PollerConfig, spawn_room_poller};
//!
//! # async fn run() -> Result<(), room_sync::SyncError> {
//! let base = "https://chat.example.test/".parse().expect("static URL");
//! let feed = HttpRoomFeed::new(base, "session-cookie-value")?;
//! let mut handle = spawn_room_poller(
//!     feed,
//!     PollTarget::Messages(ChannelRef::Global),
//!     PollerConfig::default(),
//! );
//! handle.changed().await;
//! if let Some(snapshot) = handle.latest() {
//!     println!("{} entries", snapshot.len());
//! }
//! handle.close();
//! # Ok(())
//! # }
//! ```

mod error;
mod feed;
mod poller;
mod view;

pub use error::SyncError;
pub use feed::{ChannelRef, HttpRoomFeed, MemberEntry, MessageEntry, RoomFeed};
pub use poller::{
    DEFAULT_POLL_INTERVAL, PollHandle, PollTarget, PollerConfig, Snapshot, spawn_room_poller,
};
pub use view::{ApplyOutcome, RequestTicket, SyncView};
