#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state for HexMage: the terrain map and the store
//! that owns every mob and team.

pub mod map;
pub mod mobs;

use hexmage_core::{HexCoord, TeamId};
use thiserror::Error;

pub use map::Map;
pub use mobs::{Mob, MobManager, MobSpec, Team};

/// Errors raised when callers hand the world invalid input.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// A mob referenced a team the manager never issued.
    #[error("team {} does not exist", .0.get())]
    UnknownTeam(TeamId),
    /// A coordinate fell outside the map.
    #[error("coordinate ({}, {}) lies outside the {size}x{size} map", .coord.q(), .coord.r())]
    OutOfBounds {
        /// Offending coordinate.
        coord: HexCoord,
        /// Edge length of the map.
        size: usize,
    },
    /// The manager ran out of mob identifiers.
    #[error("no mob identifiers left")]
    CapacityExceeded,
}
