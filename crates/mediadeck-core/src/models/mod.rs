//! Data models shared by the registry, the move pipeline and the dashboard.
//!
//! Everything here is plain data: snapshots handed out to callers are
//! clones, never references into the registry.

mod disk;
mod item;
mod torrent;

pub use disk::*;
pub use item::*;
pub use torrent::*;
