//! Replay error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Cursor {cursor} out of range (sequence has {len} plies)")]
    OutOfRange { cursor: usize, len: usize },

    #[error("Move {uci} at ply {ply} rejected during replay")]
    EngineInvariant { ply: usize, uci: String },
}
