use std::fmt;

use anyhow::{ensure, Result};
use hexmage_core::{hex_distance, Command, Event, HexCoord, MobId, UNREACHABLE};
use hexmage_game::{Game, UsableAbility};
use log::{debug, info};
use serde::Serialize;

use crate::generator;

/// Parameters of one auto-battle.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SkirmishConfig {
    /// Edge length of the square map.
    pub(crate) size: usize,
    /// Number of competing teams.
    pub(crate) teams: u32,
    /// Mobs generated for each team.
    pub(crate) mobs_per_team: u32,
    /// Seed for the battle generator.
    pub(crate) seed: u64,
    /// Chance that a free cell becomes a wall.
    pub(crate) wall_density: f64,
    /// Rounds played before the battle is called a draw.
    pub(crate) max_rounds: u32,
}

impl SkirmishConfig {
    fn validate(&self) -> Result<()> {
        ensure!(self.size > 0, "map size must be positive");
        ensure!(self.teams >= 2, "a skirmish needs at least two teams");
        ensure!(self.mobs_per_team > 0, "every team needs at least one mob");
        ensure!(
            (0.0..1.0).contains(&self.wall_density),
            "wall density {} must lie in [0, 1)",
            self.wall_density
        );
        let mobs = u64::from(self.teams) * u64::from(self.mobs_per_team);
        let cells = u64::try_from(self.size.saturating_mul(self.size)).unwrap_or(u64::MAX);
        ensure!(
            mobs <= cells,
            "{mobs} mobs do not fit on a {}x{} map",
            self.size,
            self.size
        );
        Ok(())
    }
}

/// Final state of a mob.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct MobReport {
    id: u32,
    team: u32,
    hp: i32,
    coord: HexCoord,
}

/// Outcome of an auto-battle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct Summary {
    seed: u64,
    size: usize,
    walls: usize,
    rounds: u32,
    finished: bool,
    winner: Option<u32>,
    steps: usize,
    abilities_used: usize,
    deaths: usize,
    survivors: Vec<MobReport>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "seed {} on a {}x{} map with {} walls",
            self.seed, self.size, self.size, self.walls
        )?;
        match (self.finished, self.winner) {
            (true, Some(team)) => writeln!(f, "team {team} wins after {} rounds", self.rounds)?,
            (true, None) => writeln!(f, "nobody wins after {} rounds", self.rounds)?,
            (false, _) => writeln!(f, "draw after {} rounds", self.rounds)?,
        }
        writeln!(
            f,
            "{} steps, {} abilities used, {} deaths",
            self.steps, self.abilities_used, self.deaths
        )?;
        for mob in &self.survivors {
            writeln!(
                f,
                "team {} mob {} at ({}, {}) with {} hp",
                mob.team,
                mob.id,
                mob.coord.q(),
                mob.coord.r(),
                mob.hp
            )?;
        }
        Ok(())
    }
}

/// Generates a battle from `config` and plays it out.
///
/// Every mob strikes the enemy its hardest usable ability hits, or walks
/// toward the nearest reachable enemy when nothing is in range.
pub(crate) fn run(config: &SkirmishConfig) -> Result<Summary> {
    config.validate()?;
    let mut game = generator::generate(config)?;
    let mut events = Vec::new();

    while !game.is_finished() && game.turn_manager().round() < config.max_rounds {
        game.apply(Command::StartRound, &mut events)?;
        while let Some(mob) = game.current_mob() {
            if game.is_finished() {
                break;
            }
            act(&mut game, mob, &mut events)?;
            game.apply(Command::EndTurn, &mut events)?;
        }

        let standing = game
            .mob_manager()
            .mobs()
            .iter()
            .filter(|mob| mob.is_alive())
            .count();
        info!(
            "round {} over, {standing} mobs standing",
            game.turn_manager().round()
        );
    }

    Ok(summarize(config, &game, &events))
}

fn act(game: &mut Game, mob: MobId, events: &mut Vec<Event>) -> Result<()> {
    loop {
        if game.is_finished() {
            return Ok(());
        }

        if let Some(usable) = strongest_attack(game, mob) {
            game.apply(
                Command::UseAbility {
                    source: mob,
                    target: usable.target(),
                    ability: usable.index(),
                },
                events,
            )?;
            continue;
        }

        let Some(goal) = nearest_enemy(game, mob) else {
            return Ok(());
        };
        if walk(game, mob, goal, events)? {
            continue;
        }
        let Some(detour) = detour_toward(game, mob, goal) else {
            return Ok(());
        };
        if !walk(game, mob, detour, events)? {
            return Ok(());
        }
    }
}

/// Issues a move and reports whether the mob took at least one step.
fn walk(game: &mut Game, mob: MobId, to: HexCoord, events: &mut Vec<Event>) -> Result<bool> {
    let before = events.len();
    game.apply(Command::MoveMob { mob, to }, events)?;
    Ok(events[before..]
        .iter()
        .any(|event| matches!(event, Event::MobMoved { .. })))
}

/// Cell within this turn's walking budget, reached along a path free of
/// other mobs, that ends no further from `goal` and as close to it as
/// possible. Used when the shortest path toward `goal` runs into a mob.
fn detour_toward(game: &Game, mob: MobId, goal: HexCoord) -> Option<HexCoord> {
    let mobs = game.mob_manager();
    let here = mobs.mob(mob).coord();
    let budget = u32::try_from(mobs.mob(mob).ap()).unwrap_or(0);
    let pathfinder = game.pathfinder();
    let is_free = |cell: &HexCoord| mobs.living_mob_at(*cell).map_or(true, |other| other == mob);

    pathfinder
        .reachable_within(budget)
        .into_iter()
        .filter(|cell| *cell != here && hex_distance(*cell, goal) <= hex_distance(here, goal))
        .filter(|cell| pathfinder.path_to(*cell).iter().all(is_free))
        .min_by_key(|cell| (hex_distance(*cell, goal), pathfinder.distance(*cell)))
}

fn is_enemy(game: &Game, mob: MobId, other: MobId) -> bool {
    let mobs = game.mob_manager();
    mobs.is_alive(other) && mobs.mob(other).team() != mobs.mob(mob).team()
}

fn strongest_attack(game: &Game, mob: MobId) -> Option<UsableAbility> {
    game.possible_targets(mob)
        .into_iter()
        .filter(|target| is_enemy(game, mob, target.mob()))
        .flat_map(|target| game.usable_abilities_against(mob, target))
        .filter(|usable| usable.ability().d_hp() > 0 || usable.ability().d_ap() > 0)
        .max_by_key(|usable| (usable.ability().d_hp(), usable.ability().d_ap()))
}

fn nearest_enemy(game: &Game, mob: MobId) -> Option<HexCoord> {
    let pathfinder = game.pathfinder();
    game.mob_manager()
        .mobs()
        .iter()
        .filter(|other| is_enemy(game, mob, other.id()))
        .map(|other| (pathfinder.distance(other.coord()), other.coord()))
        .filter(|(distance, _)| *distance != UNREACHABLE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, coord)| coord)
}

fn count(events: &[Event], wanted: fn(&Event) -> bool) -> usize {
    events.iter().filter(|event| wanted(event)).count()
}

fn summarize(config: &SkirmishConfig, game: &Game, events: &[Event]) -> Summary {
    let survivors = game
        .mob_manager()
        .mobs()
        .iter()
        .filter(|mob| mob.is_alive())
        .map(|mob| MobReport {
            id: mob.id().get(),
            team: mob.team().get(),
            hp: mob.hp(),
            coord: mob.coord(),
        })
        .collect();
    debug!("battle produced {} events", events.len());

    Summary {
        seed: config.seed,
        size: config.size,
        walls: game.map().walls().count(),
        rounds: game.turn_manager().round(),
        finished: game.is_finished(),
        winner: game.winner().map(|team| team.get()),
        steps: count(events, |event| matches!(event, Event::MobMoved { .. })),
        abilities_used: count(events, |event| matches!(event, Event::AbilityUsed { .. })),
        deaths: count(events, |event| matches!(event, Event::MobDied { .. })),
        survivors,
    }
}
