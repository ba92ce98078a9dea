//! Replays recorded actions through a conversation store.
//!
//! Each input line is one serialized action. Valid actions are dispatched in
//! order; outgoing chat payloads are printed as they are sent, and the final
//! conversation state is printed once the input is exhausted.

pub mod config;
pub mod error;
pub mod output;
pub mod replay;

pub use config::ReplayConfig;
pub use error::ReplayError;
pub use replay::{LineOutcome, Replay, ReplaySummary};
