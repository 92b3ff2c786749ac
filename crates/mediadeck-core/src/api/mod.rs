//! Server facade submodules.
//!
//! Each submodule contains `impl MoveServer` (or `impl Shared`) blocks for
//! one area. The struct definitions remain in `lib.rs` and [`state`].

mod builder;
mod moves;
mod queries;
mod refresh;
mod state;

pub use builder::MoveServerBuilder;
pub(crate) use state::{weak_job, Shared};
