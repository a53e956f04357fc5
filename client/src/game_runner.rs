use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use common::games::SessionRng;
use common::games::snake::{Direction, GamePhase, GameSettings, GameSnapshot, SnakeGame};

use crate::state::SharedState;

#[derive(Clone, Copy, Debug)]
pub enum GameCommand {
    Turn(Direction),
    PrimaryAction,
    Quit,
}

/// Owns the engine for one round. Ticks and inputs are serialized through
/// this single task, and the tick timer is armed only while the game runs,
/// so nothing fires after pause, game over or teardown. Returns the final
/// snapshot once the game ends or the channel closes.
pub async fn run_game(
    settings: GameSettings,
    seed: Option<u64>,
    shared: SharedState,
    mut commands: mpsc::UnboundedReceiver<GameCommand>,
) -> GameSnapshot {
    let mut rng = match seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    let mut game = SnakeGame::new(settings);
    let tick_interval = game.settings().tick_interval();
    shared.publish(game.snapshot());

    let mut next_tick_at = Instant::now() + tick_interval;
    let mut was_running = false;

    loop {
        let running = game.phase() == GamePhase::Running;
        if running && !was_running {
            // Re-arm the timer on every entry into Running.
            next_tick_at = Instant::now() + tick_interval;
        }
        was_running = running;

        if running {
            tokio::select! {
                _ = time::sleep_until(next_tick_at) => {
                    game.tick(&mut rng);
                    next_tick_at += tick_interval;
                    shared.publish(game.snapshot());
                    if game.phase() == GamePhase::Over {
                        break;
                    }
                }
                command = commands.recv() => {
                    if !apply_command(&mut game, &mut rng, &shared, command) {
                        break;
                    }
                }
            }
        } else {
            let command = commands.recv().await;
            if !apply_command(&mut game, &mut rng, &shared, command) {
                break;
            }
        }
    }

    game.snapshot()
}

fn apply_command(
    game: &mut SnakeGame,
    rng: &mut SessionRng,
    shared: &SharedState,
    command: Option<GameCommand>,
) -> bool {
    match command {
        Some(GameCommand::Turn(direction)) => {
            if game.set_direction(direction) {
                shared.publish(game.snapshot());
            }
            true
        }
        Some(GameCommand::PrimaryAction) => {
            game.primary_action(rng);
            shared.publish(game.snapshot());
            true
        }
        Some(GameCommand::Quit) | None => false,
    }
}
