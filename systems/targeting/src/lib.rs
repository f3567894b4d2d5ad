#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ability targeting and range queries.
//!
//! Range checks use the distance field of a [`Pathfinder`] that was run from
//! the acting mob's cell, so walls lengthen the effective distance to a
//! target for every query in this crate alike.

use hexmage_core::{Ability, MobId};
use hexmage_system_pathfinding::Pathfinder;
use hexmage_world::{Mob, MobManager};
use log::debug;

/// A mob that lies within reach of at least one ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    mob: MobId,
}

impl Target {
    /// Wraps the handle of the targeted mob.
    #[must_use]
    pub const fn new(mob: MobId) -> Self {
        Self { mob }
    }

    /// Handle of the targeted mob.
    #[must_use]
    pub const fn mob(&self) -> MobId {
        self.mob
    }
}

/// An ability the source can currently afford and reach the target with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UsableAbility {
    source: MobId,
    target: MobId,
    ability: Ability,
    index: usize,
}

impl UsableAbility {
    /// Mob that would use the ability.
    #[must_use]
    pub const fn source(&self) -> MobId {
        self.source
    }

    /// Mob that would receive the effect.
    #[must_use]
    pub const fn target(&self) -> MobId {
        self.target
    }

    /// The ability itself.
    #[must_use]
    pub const fn ability(&self) -> Ability {
        self.ability
    }

    /// Position of the ability in the source's ability list.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Uses the ability: damages the target and charges the source.
    pub fn apply(&self, mob_manager: &mut MobManager) {
        debug!(
            "mob {} uses ability {} on mob {}",
            self.source.get(),
            self.index,
            self.target.get()
        );
        mob_manager.apply_ability(self.source, self.target, self.ability);
    }
}

/// Abilities the mob can pay for right now, ignoring range and targets.
#[must_use]
pub fn affordable_abilities(mob: &Mob) -> Vec<Ability> {
    mob.abilities()
        .iter()
        .copied()
        .filter(|ability| ability.cost() <= mob.ap())
        .collect()
}

/// Longest range among the mob's abilities, zero when it has none.
#[must_use]
pub fn max_range(mob: &Mob) -> u32 {
    mob.abilities()
        .iter()
        .map(Ability::range)
        .max()
        .unwrap_or(0)
}

/// Abilities `mob` can afford whose range covers the path distance to
/// `target`.
///
/// `pathfinder` must hold a search run from `mob`'s cell.
#[must_use]
pub fn usable_abilities(
    mob: MobId,
    target: Target,
    mob_manager: &MobManager,
    pathfinder: &Pathfinder,
) -> Vec<UsableAbility> {
    let source = mob_manager.mob(mob);
    debug_assert_eq!(
        pathfinder.origin(),
        Some(source.coord()),
        "pathfinder was not run from the acting mob"
    );
    let distance = pathfinder.distance(mob_manager.mob(target.mob()).coord());

    source
        .abilities()
        .iter()
        .enumerate()
        .filter(|(_, ability)| ability.range() >= distance && ability.cost() <= source.ap())
        .map(|(index, ability)| UsableAbility {
            source: mob,
            target: target.mob(),
            ability: *ability,
            index,
        })
        .collect()
}

/// Every other mob whose path distance from `mob` is within the mob's
/// longest ability range.
///
/// `pathfinder` must hold a search run from `mob`'s cell.
#[must_use]
pub fn possible_targets(
    mob: MobId,
    mob_manager: &MobManager,
    pathfinder: &Pathfinder,
) -> Vec<Target> {
    let source = mob_manager.mob(mob);
    debug_assert_eq!(
        pathfinder.origin(),
        Some(source.coord()),
        "pathfinder was not run from the acting mob"
    );
    let range = max_range(source);

    mob_manager
        .mobs()
        .iter()
        .filter(|other| other.id() != mob)
        .filter(|other| pathfinder.distance(other.coord()) <= range)
        .map(|other| Target::new(other.id()))
        .collect()
}
