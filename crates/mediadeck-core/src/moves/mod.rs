//! Move pipeline: validation, the bounded request queue, the worker pool
//! and the result sink that writes outcomes back into the registry.
//!
//! Producers never block on the queue. A full queue is reported as a
//! rejection so the registry lock is held only briefly.

mod mover;
mod queue;
mod sink;
mod validator;
mod worker;

pub use mover::{MoveOutcome, Mover, ShellMover};
pub use queue::{MoveQueue, MoveRequest, QueueDepth};
pub(crate) use queue::MoveReceiver;
pub(crate) use sink::record_result;
pub(crate) use validator::{request_move, validate};
pub(crate) use worker::spawn_workers;
