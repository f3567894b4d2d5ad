//! Authoritative mob and team storage.

use hexmage_core::{Ability, HexCoord, MobId, TeamColor, TeamId};
use log::debug;

use crate::WorldError;

const TEAM_COLORS: [TeamColor; 4] = [
    TeamColor::from_rgb(0x2f, 0x95, 0x32),
    TeamColor::from_rgb(0xc8, 0x2a, 0x36),
    TeamColor::from_rgb(0xff, 0xc1, 0x07),
    TeamColor::from_rgb(0x58, 0x47, 0xff),
];

/// Parameters describing a mob before it joins a [`MobManager`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MobSpec {
    max_hp: i32,
    max_ap: i32,
    abilities: Vec<Ability>,
    team: TeamId,
    coord: HexCoord,
}

impl MobSpec {
    /// Describes a mob with full hit and action points, no abilities and a
    /// starting position at the origin.
    #[must_use]
    pub fn new(max_hp: i32, max_ap: i32, team: TeamId) -> Self {
        Self {
            max_hp,
            max_ap,
            abilities: Vec::new(),
            team,
            coord: HexCoord::default(),
        }
    }

    /// Replaces the ability list.
    #[must_use]
    pub fn with_abilities(mut self, abilities: Vec<Ability>) -> Self {
        self.abilities = abilities;
        self
    }

    /// Sets the starting position.
    #[must_use]
    pub fn at(mut self, coord: HexCoord) -> Self {
        self.coord = coord;
        self
    }
}

/// A combatant on the map.
///
/// Two mobs are equal when they share an identifier. Mobs are never
/// removed; a mob with `hp <= 0` is dead.
#[derive(Clone, Debug)]
pub struct Mob {
    id: MobId,
    hp: i32,
    max_hp: i32,
    ap: i32,
    max_ap: i32,
    coord: HexCoord,
    abilities: Vec<Ability>,
    team: TeamId,
}

impl Mob {
    fn from_spec(id: MobId, spec: MobSpec) -> Self {
        Self {
            id,
            hp: spec.max_hp,
            max_hp: spec.max_hp,
            ap: spec.max_ap,
            max_ap: spec.max_ap,
            coord: spec.coord,
            abilities: spec.abilities,
            team: spec.team,
        }
    }

    /// Identifier allocated by the owning manager.
    #[must_use]
    pub const fn id(&self) -> MobId {
        self.id
    }

    /// Current hit points.
    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// Hit points the mob starts with.
    #[must_use]
    pub const fn max_hp(&self) -> i32 {
        self.max_hp
    }

    /// Action points left this round.
    #[must_use]
    pub const fn ap(&self) -> i32 {
        self.ap
    }

    /// Action points restored at the start of each round.
    #[must_use]
    pub const fn max_ap(&self) -> i32 {
        self.max_ap
    }

    /// Cell the mob stands on.
    #[must_use]
    pub const fn coord(&self) -> HexCoord {
        self.coord
    }

    /// Abilities the mob can use.
    #[must_use]
    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    /// Team the mob fights for.
    #[must_use]
    pub const fn team(&self) -> TeamId {
        self.team
    }

    /// Reports whether the mob still has hit points.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Overrides the current hit points.
    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp;
    }

    /// Overrides the current action points.
    pub fn set_ap(&mut self, ap: i32) {
        self.ap = ap;
    }
}

impl PartialEq for Mob {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Mob {}

/// A side in the battle.
///
/// Teams only hold handles to their mobs; the [`MobManager`] owns the mobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    id: TeamId,
    color: TeamColor,
    mobs: Vec<MobId>,
}

impl Team {
    fn new(id: TeamId, color: TeamColor) -> Self {
        Self {
            id,
            color,
            mobs: Vec::new(),
        }
    }

    /// Team number, starting at one.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Display color of the team.
    #[must_use]
    pub const fn color(&self) -> TeamColor {
        self.color
    }

    /// Handles of the team's mobs in the order they joined.
    #[must_use]
    pub fn mobs(&self) -> &[MobId] {
        &self.mobs
    }

    fn add_mob(&mut self, mob: MobId) {
        if !self.mobs.contains(&mob) {
            self.mobs.push(mob);
        }
    }
}

/// Sole owner of every mob and team in a session.
///
/// Handles returned by [`MobManager::add_mob`] and [`MobManager::add_team`]
/// stay valid for the lifetime of the manager because nothing is ever
/// removed. Identifiers are allocated by the manager itself, so two sessions
/// never share a counter.
#[derive(Clone, Debug, Default)]
pub struct MobManager {
    mobs: Vec<Mob>,
    teams: Vec<Team>,
}

impl MobManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new team and returns its handle.
    pub fn add_team(&mut self) -> TeamId {
        let number = u32::try_from(self.teams.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        let id = TeamId::new(number);
        let color = TEAM_COLORS[self.teams.len() % TEAM_COLORS.len()];
        self.teams.push(Team::new(id, color));
        debug!("added team {number}");
        id
    }

    /// Takes ownership of a new mob, registers it with its team and returns
    /// its handle.
    pub fn add_mob(&mut self, spec: MobSpec) -> Result<MobId, WorldError> {
        let team_index = self
            .team_index(spec.team)
            .ok_or(WorldError::UnknownTeam(spec.team))?;
        let raw_id = u32::try_from(self.mobs.len()).map_err(|_| WorldError::CapacityExceeded)?;
        let id = MobId::new(raw_id);

        debug!(
            "added mob {raw_id} to team {} at ({}, {})",
            spec.team.get(),
            spec.coord.q(),
            spec.coord.r()
        );
        self.mobs.push(Mob::from_spec(id, spec));
        self.teams[team_index].add_mob(id);
        Ok(id)
    }

    /// Every mob in identifier order.
    #[must_use]
    pub fn mobs(&self) -> &[Mob] {
        &self.mobs
    }

    /// Every team in identifier order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Mob behind a handle issued by this manager.
    ///
    /// # Panics
    ///
    /// Panics when the handle was not issued by this manager.
    #[must_use]
    pub fn mob(&self, id: MobId) -> &Mob {
        &self.mobs[slot(id)]
    }

    /// Mutable mob behind a handle issued by this manager.
    ///
    /// # Panics
    ///
    /// Panics when the handle was not issued by this manager.
    #[must_use]
    pub fn mob_mut(&mut self, id: MobId) -> &mut Mob {
        &mut self.mobs[slot(id)]
    }

    /// Mob behind `id`, or `None` for unknown handles.
    #[must_use]
    pub fn try_mob(&self, id: MobId) -> Option<&Mob> {
        self.mobs.get(slot(id))
    }

    /// Team behind `id`, or `None` for unknown handles.
    #[must_use]
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.team_index(id).map(|index| &self.teams[index])
    }

    /// Moves a mob to `to`, spending one action point.
    ///
    /// Fails without side effects when the mob has no action points left.
    /// Adjacency and occupancy are the caller's responsibility.
    pub fn move_mob(&mut self, id: MobId, to: HexCoord) -> bool {
        let mob = self.mob_mut(id);
        if mob.ap > 0 {
            mob.coord = to;
            mob.ap -= 1;
            true
        } else {
            false
        }
    }

    /// First mob standing on `coord`, if any.
    #[must_use]
    pub fn mob_at(&self, coord: HexCoord) -> Option<MobId> {
        self.mobs
            .iter()
            .find(|mob| mob.coord == coord)
            .map(Mob::id)
    }

    /// Living mob standing on `coord`, if any.
    ///
    /// Dead mobs stay on their last cell, so a living mob may share it.
    #[must_use]
    pub fn living_mob_at(&self, coord: HexCoord) -> Option<MobId> {
        self.mobs
            .iter()
            .find(|mob| mob.coord == coord && mob.is_alive())
            .map(Mob::id)
    }

    /// Reports whether the mob behind `id` is alive.
    #[must_use]
    pub fn is_alive(&self, id: MobId) -> bool {
        self.try_mob(id).is_some_and(Mob::is_alive)
    }

    /// Living members of `team`.
    pub fn living_mobs(&self, team: TeamId) -> impl Iterator<Item = &Mob> + '_ {
        self.mobs
            .iter()
            .filter(move |mob| mob.team == team && mob.is_alive())
    }

    /// Restores every living mob's action points to their maximum.
    pub fn refill_action_points(&mut self) {
        for mob in self.mobs.iter_mut().filter(|mob| mob.is_alive()) {
            mob.ap = mob.max_ap;
        }
    }

    /// Applies an ability's effects: the target loses `d_hp` hit points and
    /// `d_ap` action points (never dropping below zero), the source pays the
    /// ability's cost.
    pub fn apply_ability(&mut self, source: MobId, target: MobId, ability: Ability) {
        let target_mob = self.mob_mut(target);
        target_mob.hp -= ability.d_hp();
        target_mob.ap = (target_mob.ap - ability.d_ap()).max(0);

        self.mob_mut(source).ap -= ability.cost();
    }

    fn team_index(&self, id: TeamId) -> Option<usize> {
        self.teams.iter().position(|team| team.id == id)
    }
}

fn slot(id: MobId) -> usize {
    id.get() as usize
}
