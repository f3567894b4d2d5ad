use anyhow::{Context, Result};
use hexmage_core::{Ability, HexCoord};
use hexmage_game::Game;
use hexmage_world::MobSpec;
use log::debug;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::skirmish::SkirmishConfig;

/// Stat block a generated mob is drawn from.
struct Archetype {
    max_hp: i32,
    max_ap: i32,
    abilities: &'static [Ability],
}

const ARCHETYPES: [Archetype; 3] = [
    // Brawler
    Archetype {
        max_hp: 14,
        max_ap: 3,
        abilities: &[Ability::new(4, 0, 1, 1)],
    },
    // Archer
    Archetype {
        max_hp: 9,
        max_ap: 4,
        abilities: &[Ability::new(1, 0, 1, 1), Ability::new(3, 0, 2, 4)],
    },
    // Hexer
    Archetype {
        max_hp: 10,
        max_ap: 3,
        abilities: &[Ability::new(2, 0, 1, 1), Ability::new(1, 2, 2, 3)],
    },
];

/// Builds a battle from `config`, drawing mob stats, start cells and walls
/// from a generator seeded with `config.seed`.
///
/// Start cells are picked before walls, so no mob ever starts inside a wall.
pub(crate) fn generate(config: &SkirmishConfig) -> Result<Game> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut game = Game::new(config.size);

    let mut cells: Vec<HexCoord> = game
        .map()
        .hexes()
        .iter_coords()
        .map(|(coord, _)| coord)
        .collect();
    cells.shuffle(&mut rng);
    let mut cells = cells.into_iter();

    for _ in 0..config.teams {
        let team = game.add_team();
        for _ in 0..config.mobs_per_team {
            let archetype = &ARCHETYPES[rng.gen_range(0..ARCHETYPES.len())];
            let coord = cells.next().context("map has no room left for mobs")?;
            let mob = game.add_mob(
                MobSpec::new(archetype.max_hp, archetype.max_ap, team)
                    .with_abilities(archetype.abilities.to_vec())
                    .at(coord),
            )?;
            debug!(
                "mob {} of team {} starts at ({}, {})",
                mob.get(),
                team.get(),
                coord.q(),
                coord.r()
            );
        }
    }

    for coord in cells {
        if rng.gen_bool(config.wall_density) {
            game.map_mut().set_wall(coord)?;
        }
    }

    Ok(game)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> SkirmishConfig {
        SkirmishConfig {
            size: 8,
            teams: 3,
            mobs_per_team: 2,
            seed,
            wall_density: 0.3,
            max_rounds: 10,
        }
    }

    #[test]
    fn mobs_never_start_inside_walls() {
        for seed in 0..16 {
            let game = generate(&config(seed)).expect("valid config");
            assert_eq!(game.mob_manager().mobs().len(), 6);
            assert_eq!(game.mob_manager().teams().len(), 3);
            for mob in game.mob_manager().mobs() {
                assert!(game.map().is_passable(mob.coord()));
            }
        }
    }

    #[test]
    fn same_seed_builds_the_same_battle() {
        let first = generate(&config(42)).expect("valid config");
        let second = generate(&config(42)).expect("valid config");

        let walls: Vec<HexCoord> = first.map().walls().collect();
        assert_eq!(walls, second.map().walls().collect::<Vec<_>>());
        let coords = |game: &Game| -> Vec<HexCoord> {
            game.mob_manager().mobs().iter().map(|mob| mob.coord()).collect()
        };
        assert_eq!(coords(&first), coords(&second));
    }

    #[test]
    fn crowded_maps_are_refused() {
        let mut config = config(1);
        config.size = 2;
        config.mobs_per_team = 2;
        assert!(generate(&config).is_err());
    }
}
