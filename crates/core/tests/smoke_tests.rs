use fengate_core::{Config, Direction, Game, InputEvent, Phase, SimEvent};

const DIRECTIONS: [Direction; 4] =
    [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

/// Drive a run with a fixed wander script until it ends or the frame budget
/// runs out, asserting the safety properties every frame.
fn scripted_run(seed: u64, frames: u32) -> Game {
    let config = Config::default();
    let mut game = Game::new(config, seed);
    game.handle_event(InputEvent::Confirm);
    assert_eq!(game.phase(), Phase::Playing);

    for frame_index in 0..frames {
        if game.phase() != Phase::Playing {
            if game.phase() == Phase::Leveled {
                game.handle_event(InputEvent::Confirm);
            } else {
                break;
            }
        }

        let direction = DIRECTIONS[(frame_index % 4) as usize];
        game.handle_event(InputEvent::Move(direction));
        game.frame(16);

        let state = game.state();
        let config = game.config();
        assert!(
            (0..=config.max_health).contains(&state.player.health),
            "health out of range on frame {frame_index}"
        );
        assert!(
            (0..=config.max_air).contains(&state.player.air),
            "air out of range on frame {frame_index}"
        );
        assert!(state.mobs.len() <= config.max_mobs);

        // Positional invariants only hold mid-level; a level-up swaps the
        // key and world out from under the old positions.
        if game.phase() == Phase::Playing {
            assert!(
                state.world.is_traversable(
                    state.player.pos.x,
                    state.player.pos.y,
                    state.player.has_key
                ),
                "player stranded on an illegal tile on frame {frame_index}"
            );
            for mob in state.mobs.values() {
                assert!(
                    state.world.is_traversable(mob.pos.x, mob.pos.y, state.player.has_key),
                    "mob stranded on an illegal tile on frame {frame_index}"
                );
            }
        }
    }

    game
}

#[test]
fn long_run_keeps_every_meter_and_entity_in_bounds() {
    scripted_run(12_345, 5_000);
}

#[test]
fn long_runs_across_seeds_never_violate_invariants() {
    for seed in [1_u64, 7, 42, 99, 4_096] {
        scripted_run(seed, 1_500);
    }
}

#[test]
fn an_outcome_exists_exactly_when_the_run_is_over() {
    let game = scripted_run(2_024, 20_000);
    assert_eq!(game.outcome().is_some(), game.phase() == Phase::GameOver);
}

#[test]
fn sound_cues_only_use_configured_identifiers() {
    let config = Config::default();
    let known = [
        config.footstep_first.clone(),
        config.footstep_second.clone(),
        config.water_sound.clone(),
    ];

    let mut game = Game::new(config, 555);
    game.handle_event(InputEvent::Confirm);
    for frame_index in 0..2_000_u32 {
        if game.phase() != Phase::Playing {
            break;
        }
        game.handle_event(InputEvent::Move(DIRECTIONS[(frame_index % 4) as usize]));
        game.frame(16);
        for event in game.drain_events() {
            if let SimEvent::SoundCue { key } = event {
                assert!(known.contains(&key), "unexpected cue {key}");
            }
        }
    }
}
