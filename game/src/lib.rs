#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Composition root of the HexMage simulation.
//!
//! [`Game`] owns the map, the mob store, the pathfinder and the turn manager,
//! all sized to one grid. Front ends read state through its queries and
//! mutate it only by handing [`Command`] values to [`Game::apply`].

use std::borrow::Cow;

use hexmage_core::{Ability, Command, Event, HexCoord, HexDirection, MobId, MoveRejection, TeamId};
use hexmage_system_pathfinding::Pathfinder;
use hexmage_system_targeting::{affordable_abilities, possible_targets, usable_abilities};
use hexmage_system_turns::TurnManager;
use hexmage_world::{Map, MobManager, MobSpec, WorldError};
use log::debug;
use thiserror::Error;

pub use hexmage_system_targeting::{Target, UsableAbility};

/// Reasons a command is refused.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// The command named a mob that does not exist.
    #[error("mob {} does not exist", .0.get())]
    UnknownMob(MobId),
    /// The command named a mob whose turn it is not.
    #[error("mob {} is not the active mob", .0.get())]
    NotActive(MobId),
    /// No mob is acting because no round is in progress.
    #[error("no mob is acting")]
    NoActiveMob,
    /// The ability index does not exist in the mob's ability list.
    #[error("mob {} has no ability at index {index}", .mob.get())]
    UnknownAbility {
        /// Mob asked to use the ability.
        mob: MobId,
        /// Requested index.
        index: usize,
    },
    /// The ability is out of range or too expensive right now.
    #[error("mob {} cannot use ability {index} on mob {}", .user.get(), .target.get())]
    AbilityUnusable {
        /// Mob asked to use the ability.
        user: MobId,
        /// Intended target.
        target: MobId,
        /// Requested index.
        index: usize,
    },
    /// The world rejected the request.
    #[error(transparent)]
    World(#[from] WorldError),
}

/// A running battle.
#[derive(Clone, Debug)]
pub struct Game {
    size: usize,
    map: Map,
    mob_manager: MobManager,
    pathfinder: Pathfinder,
    turn_manager: TurnManager,
}

impl Game {
    /// Creates an empty battle on a `size` x `size` map.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            map: Map::new(size),
            mob_manager: MobManager::new(),
            pathfinder: Pathfinder::new(size),
            turn_manager: TurnManager::new(),
        }
    }

    /// Edge length of the map.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The terrain map.
    #[must_use]
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Mutable terrain map, used while setting up a battle.
    #[must_use]
    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    /// The mob and team store.
    #[must_use]
    pub fn mob_manager(&self) -> &MobManager {
        &self.mob_manager
    }

    /// Mutable mob and team store, used while setting up a battle.
    #[must_use]
    pub fn mob_manager_mut(&mut self) -> &mut MobManager {
        &mut self.mob_manager
    }

    /// Distance field computed for the acting mob.
    #[must_use]
    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    /// Turn sequencing state.
    #[must_use]
    pub fn turn_manager(&self) -> &TurnManager {
        &self.turn_manager
    }

    /// Registers a new team.
    pub fn add_team(&mut self) -> TeamId {
        self.mob_manager.add_team()
    }

    /// Adds a mob to the battle.
    pub fn add_mob(&mut self, spec: MobSpec) -> Result<MobId, GameError> {
        Ok(self.mob_manager.add_mob(spec)?)
    }

    /// Mob whose turn it is, if a round is in progress.
    #[must_use]
    pub fn current_mob(&self) -> Option<MobId> {
        self.turn_manager.try_current_mob()
    }

    /// Reruns pathfinding from the acting mob's cell.
    ///
    /// # Panics
    ///
    /// Panics when no mob is acting.
    pub fn refresh(&mut self) {
        let current = self.turn_manager.current_mob();
        let start = self.mob_manager.mob(current).coord();
        self.pathfinder
            .pathfind_from(start, &self.map, &self.mob_manager);
    }

    /// Starts a new round and prepares the first mob's distance field.
    pub fn start_next_turn(&mut self) {
        self.turn_manager.start_next_turn(&mut self.mob_manager);
        if !self.turn_manager.is_turn_done() {
            self.refresh();
        }
    }

    /// Passes the turn to the next living mob and reports whether the round
    /// is over.
    ///
    /// Mobs killed earlier in the round are skipped.
    pub fn end_turn(&mut self) -> bool {
        let mut done = self.turn_manager.move_next();
        while !done && !self.mob_manager.is_alive(self.turn_manager.current_mob()) {
            done = self.turn_manager.move_next();
        }
        if !done {
            self.refresh();
        }
        done
    }

    /// Abilities `mob` can afford, ignoring range.
    #[must_use]
    pub fn usable_abilities(&self, mob: MobId) -> Vec<Ability> {
        affordable_abilities(self.mob_manager.mob(mob))
    }

    /// Abilities `mob` can afford and reach `target` with.
    #[must_use]
    pub fn usable_abilities_against(&self, mob: MobId, target: Target) -> Vec<UsableAbility> {
        let field = self.field_for(mob);
        usable_abilities(mob, target, &self.mob_manager, &field)
    }

    /// Mobs within reach of `mob`'s longest ability.
    #[must_use]
    pub fn possible_targets(&self, mob: MobId) -> Vec<Target> {
        let field = self.field_for(mob);
        possible_targets(mob, &self.mob_manager, &field)
    }

    /// Reports whether some team has no living mob left.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.mob_manager.teams().iter().any(|team| {
            team.mobs()
                .iter()
                .all(|mob| !self.mob_manager.is_alive(*mob))
        })
    }

    /// The only team with living mobs, once the battle is finished.
    #[must_use]
    pub fn winner(&self) -> Option<TeamId> {
        if !self.is_finished() {
            return None;
        }

        let mut survivors = self
            .mob_manager
            .teams()
            .iter()
            .filter(|team| self.mob_manager.living_mobs(team.id()).next().is_some());
        match (survivors.next(), survivors.next()) {
            (Some(team), None) => Some(team.id()),
            _ => None,
        }
    }

    /// Applies `command`, appending what happened to `out_events`.
    ///
    /// Moves that cannot be carried out are reported as
    /// [`Event::MoveRejected`] rather than as errors; errors are reserved for
    /// commands that name the wrong mob or an impossible ability.
    pub fn apply(&mut self, command: Command, out_events: &mut Vec<Event>) -> Result<(), GameError> {
        debug!("applying {command:?}");
        match command {
            Command::MoveMob { mob, to } => self.move_mob(mob, to, out_events),
            Command::StepMob { mob, direction } => self.step_mob(mob, direction, out_events),
            Command::UseAbility {
                source,
                target,
                ability,
            } => self.use_ability(source, target, ability, out_events),
            Command::EndTurn => {
                let mob = self
                    .turn_manager
                    .try_current_mob()
                    .ok_or(GameError::NoActiveMob)?;
                let done = self.end_turn();
                out_events.push(Event::TurnEnded { mob });
                if done {
                    out_events.push(Event::RoundEnded {
                        round: self.turn_manager.round(),
                    });
                }
                Ok(())
            }
            Command::StartRound => {
                self.start_next_turn();
                out_events.push(Event::RoundStarted {
                    round: self.turn_manager.round(),
                    turn_order: self.turn_manager.turn_order().to_vec(),
                });
                Ok(())
            }
        }
    }

    fn move_mob(
        &mut self,
        mob: MobId,
        to: HexCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), GameError> {
        self.ensure_active(mob)?;
        let from = self.mob_manager.mob(mob).coord();
        if from == to {
            return Ok(());
        }

        let rejection = if !self.map.is_valid(to) {
            Some(MoveRejection::OutOfBounds)
        } else if !self.map.is_passable(to) {
            Some(MoveRejection::Blocked)
        } else if !self.pathfinder.reachable(to) {
            Some(MoveRejection::Unreachable)
        } else if self.mob_manager.mob(mob).ap() <= 0 {
            Some(MoveRejection::NoActionPoints)
        } else {
            None
        };
        if let Some(reason) = rejection {
            out_events.push(Event::MoveRejected { mob, to, reason });
            return Ok(());
        }

        let path = self.pathfinder.path_to(to);
        let entered = self
            .pathfinder
            .move_as_far_as_possible(&mut self.mob_manager, mob, &path);
        if entered.is_empty() {
            out_events.push(Event::MoveRejected {
                mob,
                to,
                reason: MoveRejection::Occupied,
            });
            return Ok(());
        }

        let mut previous = from;
        for cell in entered {
            out_events.push(Event::MobMoved {
                mob,
                from: previous,
                to: cell,
            });
            previous = cell;
        }
        self.refresh();
        Ok(())
    }

    fn step_mob(
        &mut self,
        mob: MobId,
        direction: HexDirection,
        out_events: &mut Vec<Event>,
    ) -> Result<(), GameError> {
        self.ensure_active(mob)?;
        let from = self.mob_manager.mob(mob).coord();
        let to = from.step(direction);

        let occupied = self
            .mob_manager
            .living_mob_at(to)
            .is_some_and(|other| other != mob);
        let rejection = if !self.map.is_valid(to) {
            Some(MoveRejection::OutOfBounds)
        } else if !self.map.is_passable(to) {
            Some(MoveRejection::Blocked)
        } else if occupied {
            Some(MoveRejection::Occupied)
        } else if !self.mob_manager.move_mob(mob, to) {
            Some(MoveRejection::NoActionPoints)
        } else {
            None
        };

        match rejection {
            Some(reason) => out_events.push(Event::MoveRejected { mob, to, reason }),
            None => {
                out_events.push(Event::MobMoved { mob, from, to });
                self.refresh();
            }
        }
        Ok(())
    }

    fn use_ability(
        &mut self,
        user: MobId,
        target: MobId,
        index: usize,
        out_events: &mut Vec<Event>,
    ) -> Result<(), GameError> {
        self.ensure_active(user)?;
        if self.mob_manager.try_mob(target).is_none() {
            return Err(GameError::UnknownMob(target));
        }
        if index >= self.mob_manager.mob(user).abilities().len() {
            return Err(GameError::UnknownAbility { mob: user, index });
        }

        let usable = self
            .usable_abilities_against(user, Target::new(target))
            .into_iter()
            .find(|usable| usable.index() == index)
            .ok_or(GameError::AbilityUnusable {
                user,
                target,
                index,
            })?;

        let was_alive = self.mob_manager.is_alive(target);
        usable.apply(&mut self.mob_manager);
        out_events.push(Event::AbilityUsed {
            source: user,
            target,
            ability: usable.ability(),
            target_hp: self.mob_manager.mob(target).hp(),
        });

        if was_alive && !self.mob_manager.is_alive(target) {
            out_events.push(Event::MobDied { mob: target });
            if self.is_finished() {
                out_events.push(Event::GameFinished {
                    winner: self.winner(),
                });
            }
        }
        self.refresh();
        Ok(())
    }

    fn ensure_active(&self, mob: MobId) -> Result<(), GameError> {
        if self.mob_manager.try_mob(mob).is_none() {
            return Err(GameError::UnknownMob(mob));
        }
        match self.turn_manager.try_current_mob() {
            Some(current) if current == mob => Ok(()),
            Some(_) => Err(GameError::NotActive(mob)),
            None => Err(GameError::NoActiveMob),
        }
    }

    fn field_for(&self, mob: MobId) -> Cow<'_, Pathfinder> {
        let coord = self.mob_manager.mob(mob).coord();
        if self.pathfinder.origin() == Some(coord) {
            Cow::Borrowed(&self.pathfinder)
        } else {
            let mut pathfinder = Pathfinder::new(self.size);
            pathfinder.pathfind_from(coord, &self.map, &self.mob_manager);
            Cow::Owned(pathfinder)
        }
    }
}
