use hexmage_core::{Ability, Command, Event, HexCoord, HexDirection, MobId, MoveRejection};
use hexmage_game::{Game, GameError, Target};
use hexmage_world::MobSpec;

const STRIKE: Ability = Ability::new(5, 0, 1, 1);

fn duel() -> (Game, MobId, MobId) {
    let mut game = Game::new(5);
    let red = game.add_team();
    let blue = game.add_team();
    let attacker = game
        .add_mob(
            MobSpec::new(10, 2, red)
                .with_abilities(vec![STRIKE])
                .at(HexCoord::new(0, 0)),
        )
        .expect("team exists");
    let defender = game
        .add_mob(MobSpec::new(10, 3, blue).at(HexCoord::new(1, 0)))
        .expect("team exists");
    game.start_next_turn();
    (game, attacker, defender)
}

fn lone_walker(ap: i32) -> (Game, MobId) {
    let mut game = Game::new(5);
    let team = game.add_team();
    let mob = game
        .add_mob(MobSpec::new(10, ap, team).at(HexCoord::new(0, 0)))
        .expect("team exists");
    game.start_next_turn();
    (game, mob)
}

#[test]
fn strike_through_the_command_surface() {
    let (mut game, attacker, defender) = duel();
    assert_eq!(game.current_mob(), Some(attacker));
    assert!(game.usable_abilities(attacker).contains(&STRIKE));
    assert_eq!(
        game.possible_targets(attacker),
        vec![Target::new(defender)]
    );

    let mut events = Vec::new();
    game.apply(
        Command::UseAbility {
            source: attacker,
            target: defender,
            ability: 0,
        },
        &mut events,
    )
    .expect("strike is usable");

    assert_eq!(
        events,
        vec![Event::AbilityUsed {
            source: attacker,
            target: defender,
            ability: STRIKE,
            target_hp: 5,
        }]
    );
    assert_eq!(game.mob_manager().mob(defender).hp(), 5);
    assert_eq!(game.mob_manager().mob(attacker).ap(), 1);
}

#[test]
fn battle_finishes_when_a_team_is_wiped_out() {
    let (mut game, attacker, defender) = duel();
    let red = game.mob_manager().mob(attacker).team();
    assert!(!game.is_finished());
    assert_eq!(game.winner(), None);

    let mut events = Vec::new();
    for _ in 0..2 {
        game.apply(
            Command::UseAbility {
                source: attacker,
                target: defender,
                ability: 0,
            },
            &mut events,
        )
        .expect("strike is usable");
    }

    assert!(game.is_finished());
    assert_eq!(game.winner(), Some(red));
    assert_eq!(
        &events[events.len() - 2..],
        &[
            Event::MobDied { mob: defender },
            Event::GameFinished { winner: Some(red) },
        ]
    );
}

#[test]
fn spent_ability_is_refused() {
    let (mut game, attacker, defender) = duel();
    game.mob_manager_mut().mob_mut(attacker).set_ap(0);
    let mut events = Vec::new();

    let result = game.apply(
        Command::UseAbility {
            source: attacker,
            target: defender,
            ability: 0,
        },
        &mut events,
    );

    assert_eq!(
        result,
        Err(GameError::AbilityUnusable {
            user: attacker,
            target: defender,
            index: 0,
        })
    );
    let result = game.apply(
        Command::UseAbility {
            source: attacker,
            target: defender,
            ability: 3,
        },
        &mut events,
    );
    assert_eq!(
        result,
        Err(GameError::UnknownAbility {
            mob: attacker,
            index: 3,
        })
    );
    assert!(events.is_empty());
}

#[test]
fn only_the_active_mob_may_act() {
    let (mut game, _, defender) = duel();
    let mut events = Vec::new();

    let result = game.apply(
        Command::StepMob {
            mob: defender,
            direction: HexDirection::SouthEast,
        },
        &mut events,
    );

    assert_eq!(result, Err(GameError::NotActive(defender)));
    assert!(events.is_empty());
}

#[test]
fn move_walks_along_the_shortest_path() {
    let (mut game, mob) = lone_walker(3);
    assert_eq!(game.pathfinder().distance(HexCoord::new(2, 0)), 2);
    assert_eq!(
        game.pathfinder().path_to(HexCoord::new(2, 0)),
        vec![
            HexCoord::new(2, 0),
            HexCoord::new(1, 0),
            HexCoord::new(0, 0)
        ]
    );

    let mut events = Vec::new();
    game.apply(
        Command::MoveMob {
            mob,
            to: HexCoord::new(2, 0),
        },
        &mut events,
    )
    .expect("mob is active");

    assert_eq!(
        events,
        vec![
            Event::MobMoved {
                mob,
                from: HexCoord::new(0, 0),
                to: HexCoord::new(1, 0),
            },
            Event::MobMoved {
                mob,
                from: HexCoord::new(1, 0),
                to: HexCoord::new(2, 0),
            },
        ]
    );
    assert_eq!(game.mob_manager().mob(mob).ap(), 1);
    assert_eq!(game.pathfinder().origin(), Some(HexCoord::new(2, 0)));
}

#[test]
fn move_stops_when_action_points_run_out() {
    let (mut game, mob) = lone_walker(3);
    let mut events = Vec::new();

    game.apply(
        Command::MoveMob {
            mob,
            to: HexCoord::new(4, 0),
        },
        &mut events,
    )
    .expect("mob is active");
    assert_eq!(events.len(), 3);
    assert_eq!(game.mob_manager().mob(mob).coord(), HexCoord::new(3, 0));

    events.clear();
    game.apply(
        Command::MoveMob {
            mob,
            to: HexCoord::new(4, 0),
        },
        &mut events,
    )
    .expect("mob is active");
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            mob,
            to: HexCoord::new(4, 0),
            reason: MoveRejection::NoActionPoints,
        }]
    );
}

#[test]
fn moves_into_walls_or_off_the_map_are_rejected() {
    let (mut game, mob) = lone_walker(3);
    game.map_mut()
        .set_wall(HexCoord::new(1, 0))
        .expect("inside map");
    game.refresh();
    let mut events = Vec::new();

    for to in [HexCoord::new(1, 0), HexCoord::new(-1, 0)] {
        game.apply(Command::MoveMob { mob, to }, &mut events)
            .expect("mob is active");
    }
    game.apply(
        Command::StepMob {
            mob,
            direction: HexDirection::NorthWest,
        },
        &mut events,
    )
    .expect("mob is active");

    let reasons: Vec<MoveRejection> = events
        .iter()
        .filter_map(|event| match event {
            Event::MoveRejected { reason, .. } => Some(*reason),
            _ => None,
        })
        .collect();
    assert_eq!(
        reasons,
        vec![
            MoveRejection::Blocked,
            MoveRejection::OutOfBounds,
            MoveRejection::OutOfBounds,
        ]
    );
    assert_eq!(game.mob_manager().mob(mob).ap(), 3);
}

#[test]
fn stepping_onto_another_mob_is_rejected() {
    let (mut game, attacker, _) = duel();
    let mut events = Vec::new();

    game.apply(
        Command::StepMob {
            mob: attacker,
            direction: HexDirection::East,
        },
        &mut events,
    )
    .expect("mob is active");

    assert_eq!(
        events,
        vec![Event::MoveRejected {
            mob: attacker,
            to: HexCoord::new(1, 0),
            reason: MoveRejection::Occupied,
        }]
    );
    assert_eq!(game.mob_manager().mob(attacker).ap(), 2);
}

#[test]
fn ending_turns_skips_mobs_killed_this_round() {
    let mut game = Game::new(5);
    let red = game.add_team();
    let blue = game.add_team();
    let slayer = game
        .add_mob(
            MobSpec::new(10, 1, red)
                .with_abilities(vec![Ability::new(10, 0, 1, 1)])
                .at(HexCoord::new(0, 0)),
        )
        .expect("team exists");
    let survivor = game
        .add_mob(MobSpec::new(10, 3, blue).at(HexCoord::new(4, 4)))
        .expect("team exists");
    let victim = game
        .add_mob(MobSpec::new(10, 2, blue).at(HexCoord::new(1, 0)))
        .expect("team exists");

    let mut events = Vec::new();
    game.apply(Command::StartRound, &mut events)
        .expect("rounds can always start");
    assert_eq!(
        events,
        vec![Event::RoundStarted {
            round: 1,
            turn_order: vec![slayer, victim, survivor],
        }]
    );

    events.clear();
    game.apply(
        Command::UseAbility {
            source: slayer,
            target: victim,
            ability: 0,
        },
        &mut events,
    )
    .expect("victim is adjacent");
    assert!(events.contains(&Event::MobDied { mob: victim }));
    assert!(!game.is_finished());

    events.clear();
    game.apply(Command::EndTurn, &mut events)
        .expect("slayer is active");
    assert_eq!(events, vec![Event::TurnEnded { mob: slayer }]);
    assert_eq!(game.current_mob(), Some(survivor));
    assert_eq!(game.pathfinder().origin(), Some(HexCoord::new(4, 4)));

    events.clear();
    game.apply(Command::EndTurn, &mut events)
        .expect("survivor is active");
    assert_eq!(
        events,
        vec![
            Event::TurnEnded { mob: survivor },
            Event::RoundEnded { round: 1 },
        ]
    );
    assert_eq!(game.current_mob(), None);
}

#[test]
fn targets_of_an_idle_mob_use_its_own_position() {
    let (game, attacker, defender) = duel();
    assert_eq!(game.current_mob(), Some(attacker));

    assert_eq!(
        game.possible_targets(defender),
        Vec::<Target>::new(),
        "defender has no abilities"
    );
    assert_eq!(
        game.usable_abilities_against(attacker, Target::new(defender))
            .len(),
        1
    );
}
