#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the HexMage tactics engine.
//!
//! This crate defines hex geometry, dense cell storage and the message
//! surface that connects front ends with the simulation. Front ends submit
//! [`Command`] values describing the moves and ability uses a player asks for,
//! the game executes them through its `apply` entry point, and reports what
//! happened as [`Event`] values. Everything else a front end needs is exposed
//! as read-only queries.

pub mod hex;
pub mod matrix;

use serde::{Deserialize, Serialize};

pub use hex::{
    hex_distance, hex_distance_from_origin, CubeCoord, HexCoord, HexDirection, UNREACHABLE,
};
pub use matrix::Matrix;

/// Terrain stored in each map cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexType {
    /// Open ground.
    #[default]
    Empty,
    /// Cell marked as occupied by a player-controlled piece.
    Player,
    /// Structural obstacle that blocks movement.
    Wall,
}

/// Unique identifier assigned to a mob by its owning manager.
///
/// Identifiers double as stable handles: mobs are never removed, so the
/// numeric value is also the mob's slot in the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MobId(u32);

impl MobId {
    /// Creates a new mob identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a team. Teams are numbered from one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(u32);

impl TeamId {
    /// Creates a new team identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Display color associated with a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl TeamColor {
    /// Creates a new team color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Immutable description of something a mob can do to another mob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ability {
    d_hp: i32,
    d_ap: i32,
    cost: i32,
    range: u32,
}

impl Ability {
    /// Creates a new ability.
    ///
    /// `d_hp` and `d_ap` are subtracted from the target when the ability is
    /// used, so negative values heal or energise. `cost` is paid by the user.
    #[must_use]
    pub const fn new(d_hp: i32, d_ap: i32, cost: i32, range: u32) -> Self {
        Self {
            d_hp,
            d_ap,
            cost,
            range,
        }
    }

    /// Hit points removed from the target.
    #[must_use]
    pub const fn d_hp(&self) -> i32 {
        self.d_hp
    }

    /// Action points removed from the target.
    #[must_use]
    pub const fn d_ap(&self) -> i32 {
        self.d_ap
    }

    /// Action points the user spends.
    #[must_use]
    pub const fn cost(&self) -> i32 {
        self.cost
    }

    /// Maximum distance between user and target.
    #[must_use]
    pub const fn range(&self) -> u32 {
        self.range
    }
}

/// Commands that express all permissible mutations requested by a front end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Walks the active mob toward a reachable cell as far as its action
    /// points allow.
    MoveMob {
        /// Mob asked to move.
        mob: MobId,
        /// Destination cell.
        to: HexCoord,
    },
    /// Moves the active mob a single hex in the given direction.
    StepMob {
        /// Mob asked to move.
        mob: MobId,
        /// Direction of the step.
        direction: HexDirection,
    },
    /// Uses one of the source mob's abilities on a target mob.
    UseAbility {
        /// Mob using the ability.
        source: MobId,
        /// Mob receiving the effect.
        target: MobId,
        /// Position of the ability in the source mob's ability list.
        ability: usize,
    },
    /// Ends the active mob's turn.
    EndTurn,
    /// Starts a new round, refilling action points and rebuilding the turn
    /// order.
    StartRound,
}

/// Events reported by the game after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A new round began with the provided acting order.
    RoundStarted {
        /// One-based round counter.
        round: u32,
        /// Mobs in acting order.
        turn_order: Vec<MobId>,
    },
    /// A mob moved a single hex.
    MobMoved {
        /// Mob that moved.
        mob: MobId,
        /// Cell the mob left.
        from: HexCoord,
        /// Cell the mob entered.
        to: HexCoord,
    },
    /// A move request could not be carried out.
    MoveRejected {
        /// Mob that was asked to move.
        mob: MobId,
        /// Requested destination.
        to: HexCoord,
        /// Why the move failed.
        reason: MoveRejection,
    },
    /// An ability was applied.
    AbilityUsed {
        /// Mob that used the ability.
        source: MobId,
        /// Mob that received the effect.
        target: MobId,
        /// Ability that was applied.
        ability: Ability,
        /// Target hit points after the effect.
        target_hp: i32,
    },
    /// A mob's hit points dropped to zero or below.
    MobDied {
        /// Mob that died.
        mob: MobId,
    },
    /// The active mob finished acting.
    TurnEnded {
        /// Mob whose turn ended.
        mob: MobId,
    },
    /// Every living mob acted in the current round.
    RoundEnded {
        /// Round that ended.
        round: u32,
    },
    /// A team has no living mobs left.
    GameFinished {
        /// Only team with survivors, if exactly one remains.
        winner: Option<TeamId>,
    },
}

/// Reasons a move request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The mob has no action points left.
    NoActionPoints,
    /// The destination lies outside the map.
    OutOfBounds,
    /// The destination is a wall.
    Blocked,
    /// Another mob stands on the destination.
    Occupied,
    /// No path leads to the destination.
    Unreachable,
}

#[cfg(test)]
mod tests {
    use super::{Ability, Command, Event, HexCoord, HexDirection, MobId, MoveRejection, TeamId};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn ability_exposes_constructor_fields() {
        let ability = Ability::new(5, 1, 2, 3);
        assert_eq!(ability.d_hp(), 5);
        assert_eq!(ability.d_ap(), 1);
        assert_eq!(ability.cost(), 2);
        assert_eq!(ability.range(), 3);
    }

    #[test]
    fn commands_round_trip_through_bincode() {
        assert_round_trip(&Command::StepMob {
            mob: MobId::new(3),
            direction: HexDirection::NorthEast,
        });
        assert_round_trip(&Command::UseAbility {
            source: MobId::new(0),
            target: MobId::new(1),
            ability: 2,
        });
    }

    #[test]
    fn events_round_trip_through_bincode() {
        assert_round_trip(&Event::MoveRejected {
            mob: MobId::new(1),
            to: HexCoord::new(4, -1),
            reason: MoveRejection::Occupied,
        });
        assert_round_trip(&Event::GameFinished {
            winner: Some(TeamId::new(2)),
        });
    }
}
