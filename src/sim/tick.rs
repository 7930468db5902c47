//! Fixed-step simulation tick
//!
//! Core game loop that advances a session by one frame: input, player,
//! ghosts, contact checks, win check.

use super::actor::Direction;
use super::control::DirectionChooser;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Direction currently pressed, queued as the player's next turn
    pub direction: Option<Direction>,
    /// Attract mode - the player steers itself when nothing is pressed
    pub autopilot: bool,
    /// Start over after the session has ended
    pub restart: bool,
}

/// Advance the session by one step
///
/// Ghost decisions (and the autopilot) draw from `chooser`, so equal seeds
/// and equal inputs replay identically.
pub fn tick<C: DirectionChooser + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    chooser: &mut C,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.is_over() {
        if input.restart {
            state.restart();
            events.push(GameEvent::Restarted);
        }
        return events;
    }

    state.time_ticks += 1;

    let GameState {
        grid,
        pellets,
        player,
        ghosts,
        score,
        pellet_score,
        phase,
        ..
    } = state;

    if let Some(controller) = player.controller.as_player_mut() {
        if let Some(dir) = input.direction {
            controller.queue(dir, player.actor.speed);
        } else if input.autopilot {
            controller.autopilot(&player.actor, grid, pellets, chooser);
        }
    }

    player.step(grid, chooser);
    let cell = player.actor.cell;
    if pellets.remove(&cell) {
        *score += *pellet_score;
        log::debug!("Pellet at {:?}, score {}, {} left", cell, score, pellets.len());
        events.push(GameEvent::PelletEaten {
            cell,
            score: *score,
        });
    }

    for ghost in ghosts.iter_mut() {
        ghost.step(grid, chooser);
    }

    if let Some(ghost) = ghosts.iter().find(|g| g.actor.overlaps(&player.actor)) {
        *phase = GamePhase::GameOver;
        log::info!("Caught by ghost {} with score {}", ghost.id, score);
        events.push(GameEvent::PlayerCaught { ghost_id: ghost.id });
    } else if pellets.is_empty() {
        *phase = GamePhase::Won;
        log::info!("Maze cleared with score {}", score);
        events.push(GameEvent::MazeCleared { score: *score });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::control::{ScriptedChooser, SeededChooser};
    use crate::sim::grid::Cell;
    use glam::Vec2;

    fn corridor(layout: &[&str], player: (i32, i32), ghosts: &[(i32, i32)]) -> GameState {
        let settings = Settings {
            layout: Some(layout.iter().map(|row| row.to_string()).collect()),
            player_spawn: Some(player.into()),
            ghost_spawns: Some(ghosts.iter().map(|&g| g.into()).collect()),
            ..Default::default()
        };
        GameState::new(&settings).unwrap()
    }

    #[test]
    fn test_pellet_pickup_scores() {
        let mut state = corridor(&["#######", "#  ...#", "#######"], (2, 1), &[]);
        let mut chooser = ScriptedChooser::default();
        let input = TickInput {
            direction: Some(Direction::Right),
            ..Default::default()
        };

        let mut eaten = Vec::new();
        for _ in 0..120 {
            eaten.extend(tick(&mut state, &input, &mut chooser));
            if state.is_over() {
                break;
            }
        }

        assert_eq!(state.score, 30);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(eaten.contains(&GameEvent::PelletEaten {
            cell: Cell::new(3, 1),
            score: 10
        }));
        assert_eq!(eaten.last(), Some(&GameEvent::MazeCleared { score: 30 }));
    }

    #[test]
    fn test_ghost_catches_player() {
        // Ghost two cells away walks into the player; the far pellet keeps the maze uncleared
        let mut state = corridor(&["######", "#.  .#", "######"], (1, 1), &[(3, 1)]);
        let mut chooser = ScriptedChooser::new(vec![Direction::Left]);
        let input = TickInput::default();

        let mut caught = false;
        for _ in 0..60 {
            let events = tick(&mut state, &input, &mut chooser);
            if events.contains(&GameEvent::PlayerCaught { ghost_id: 1 }) {
                caught = true;
                break;
            }
        }
        assert!(caught);
        assert_eq!(state.phase, GamePhase::GameOver);
        // Pellet under the player was eaten first tick
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_ended_session_ignores_input_until_restart() {
        let mut state = corridor(&["#####", "#. .#", "#####"], (1, 1), &[]);
        state.phase = GamePhase::GameOver;
        let mut chooser = SeededChooser::new(3);

        let events = tick(
            &mut state,
            &TickInput {
                direction: Some(Direction::Right),
                ..Default::default()
            },
            &mut chooser,
        );
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.actor.vel, Vec2::ZERO);

        let events = tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
            &mut chooser,
        );
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.pellets_left(), 2);
    }

    #[test]
    fn test_player_wraps_through_tunnel() {
        // The only pellet sits where the left exit re-enters
        let mut state = corridor(&["######", "T   .T", "######"], (1, 1), &[]);
        let mut chooser = ScriptedChooser::default();
        let input = TickInput {
            direction: Some(Direction::Left),
            ..Default::default()
        };

        let mut events = Vec::new();
        for _ in 0..40 {
            events.extend(tick(&mut state, &input, &mut chooser));
            if state.is_over() {
                break;
            }
        }

        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.player.actor.cell, Cell::new(4, 1));
        assert_eq!(state.player.actor.vel, Vec2::new(-state.player.actor.speed, 0.0));
        assert_eq!(events.last(), Some(&GameEvent::MazeCleared { score: 10 }));
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs stay identical
        let settings = Settings::default();
        let mut state1 = GameState::new(&settings).unwrap();
        let mut state2 = GameState::new(&settings).unwrap();
        let mut chooser1 = SeededChooser::new(settings.seed);
        let mut chooser2 = SeededChooser::new(settings.seed);

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..600 {
            let a = tick(&mut state1, &input, &mut chooser1);
            let b = tick(&mut state2, &input, &mut chooser2);
            assert_eq!(a, b);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player, state2.player);
        assert_eq!(state1.ghosts, state2.ghosts);
    }

    #[test]
    fn test_autopilot_eats() {
        let settings = Settings {
            ghost_count: 0,
            ..Default::default()
        };
        let mut state = GameState::new(&settings).unwrap();
        let mut chooser = SeededChooser::new(42);
        let start = state.pellets_left();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input, &mut chooser);
        }
        assert!(state.pellets_left() < start);
        assert_eq!(state.phase, GamePhase::Playing);
    }
}
