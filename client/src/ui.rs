use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use tokio::sync::mpsc;

use common::games::snake::{Direction, GamePhase, GameSnapshot, Point};

use crate::config::Config;
use crate::game_runner::{GameCommand, run_game};
use crate::score_client::{DEFAULT_TOP_LIMIT, ScoreClient, ScoreRecord};
use crate::state::SharedState;

const RENDER_INTERVAL: Duration = Duration::from_millis(50);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Runs rounds until the player quits, taking the score-submission flow in
/// between. The submission outcome is carried into the next round as a
/// transient toast.
pub async fn run(
    config: &Config,
    score_client: &ScoreClient,
    seed: Option<u64>,
) -> Result<(), String> {
    let mut toast: Option<String> = None;

    loop {
        let final_state = play_round(config, seed, toast.take()).await?;
        if final_state.phase != GamePhase::Over {
            // The player quit mid-round.
            return Ok(());
        }

        let (play_again, message) = game_over_flow(score_client, final_state.score).await?;
        if !play_again {
            return Ok(());
        }
        toast = message;
    }
}

async fn play_round(
    config: &Config,
    seed: Option<u64>,
    toast: Option<String>,
) -> Result<GameSnapshot, String> {
    let shared = SharedState::new();
    if let Some(message) = toast {
        shared.set_notice(message, NOTICE_TTL);
    }

    let (commands, command_rx) = mpsc::unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));

    terminal::enable_raw_mode().map_err(|e| format!("Failed to enter raw mode: {}", e))?;
    execute!(io::stdout(), Hide).map_err(|e| format!("Failed to set up terminal: {}", e))?;

    let input_pump = spawn_input_pump(commands, stop.clone());
    let mut runner = tokio::spawn(run_game(
        config.game.clone(),
        seed,
        shared.clone(),
        command_rx,
    ));

    let grid_size = config.game.grid_size;
    let mut render_timer = tokio::time::interval(RENDER_INTERVAL);
    let round_result = loop {
        tokio::select! {
            result = &mut runner => {
                break result.map_err(|e| format!("Game task failed: {}", e));
            }
            _ = render_timer.tick() => {
                if let Some(snapshot) = shared.snapshot() {
                    let notice = shared.notice();
                    if let Err(e) = draw_board(&snapshot, grid_size, notice.as_deref()) {
                        break Err(format!("Failed to draw board: {}", e));
                    }
                }
            }
        }
    };

    stop.store(true, Ordering::Relaxed);
    let _ = input_pump.await;

    execute!(io::stdout(), Show).map_err(|e| format!("Failed to restore terminal: {}", e))?;
    terminal::disable_raw_mode().map_err(|e| format!("Failed to leave raw mode: {}", e))?;

    let final_state = round_result?;
    draw_final_board(&final_state, grid_size)
        .map_err(|e| format!("Failed to draw board: {}", e))?;
    Ok(final_state)
}

fn spawn_input_pump(
    commands: mpsc::UnboundedSender<GameCommand>,
    stop: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !stop.load(Ordering::Relaxed) {
            if !event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                continue;
            }
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let command = match key.code {
                KeyCode::Up => GameCommand::Turn(Direction::Up),
                KeyCode::Down => GameCommand::Turn(Direction::Down),
                KeyCode::Left => GameCommand::Turn(Direction::Left),
                KeyCode::Right => GameCommand::Turn(Direction::Right),
                KeyCode::Char(' ') | KeyCode::Enter => GameCommand::PrimaryAction,
                KeyCode::Char('q') | KeyCode::Esc => GameCommand::Quit,
                _ => continue,
            };
            let quit = matches!(command, GameCommand::Quit);
            if commands.send(command).is_err() || quit {
                break;
            }
        }
    })
}

fn draw_board(
    snapshot: &GameSnapshot,
    grid_size: usize,
    notice: Option<&str>,
) -> io::Result<()> {
    let mut stdout = io::stdout();
    let occupied: HashSet<Point> = snapshot.snake.iter().copied().collect();
    let head = snapshot.snake[0];
    let border: String = "#".repeat(grid_size + 2);

    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0), Print(&border))?;

    for y in 0..grid_size as i32 {
        let mut row = String::with_capacity(grid_size + 2);
        row.push('#');
        for x in 0..grid_size as i32 {
            let cell = Point::new(x, y);
            row.push(if cell == head {
                'O'
            } else if occupied.contains(&cell) {
                'o'
            } else if cell == snapshot.food {
                '*'
            } else {
                ' '
            });
        }
        row.push('#');
        queue!(stdout, MoveTo(0, y as u16 + 1), Print(&row))?;
    }

    let status = match snapshot.phase {
        GamePhase::Idle => "Press Space or Enter to start",
        GamePhase::Running => "Arrow keys to steer, Space to pause, q to quit",
        GamePhase::Paused => "Paused - Space to resume",
        GamePhase::Over => "Game over",
    };

    queue!(
        stdout,
        MoveTo(0, grid_size as u16 + 1),
        Print(&border),
        MoveTo(0, grid_size as u16 + 2),
        Print(format!("Score: {}", snapshot.score)),
        MoveTo(0, grid_size as u16 + 3),
        Print(status),
    )?;

    if let Some(notice) = notice {
        queue!(stdout, MoveTo(0, grid_size as u16 + 4), Print(notice))?;
    }

    stdout.flush()
}

fn draw_final_board(snapshot: &GameSnapshot, grid_size: usize) -> io::Result<()> {
    draw_board(snapshot, grid_size, None)?;
    let mut stdout = io::stdout();
    execute!(stdout, MoveTo(0, grid_size as u16 + 4))?;
    println!();
    stdout.flush()
}

/// Cooked-mode game-over dialogue: optional score submission, optional
/// scoreboard view, play-again decision. Returns whether to start another
/// round and the message to toast over it.
async fn game_over_flow(
    score_client: &ScoreClient,
    score: u32,
) -> Result<(bool, Option<String>), String> {
    println!("Game over! Final score: {}", score);

    let name = prompt("Enter your name to submit your score (blank to skip): ")?;
    let mut toast = None;
    if !name.trim().is_empty() {
        let message = match score_client.submit(&name, score).await {
            Ok(record) => format!(
                "Score for {} ({}) submitted!",
                record.player_name, record.score
            ),
            Err(message) => message,
        };
        println!("{}", message);
        toast = Some(message);
    }

    loop {
        let answer = prompt("Play again? [y/n, s = scoreboard]: ")?;
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok((true, toast)),
            "s" => match score_client.fetch_top(DEFAULT_TOP_LIMIT).await {
                Ok(records) => print_scoreboard(&records),
                Err(message) => println!("{}", message),
            },
            _ => return Ok((false, None)),
        }
    }
}

fn prompt(message: &str) -> Result<String, String> {
    print!("{}", message);
    io::stdout()
        .flush()
        .map_err(|e| format!("Failed to flush stdout: {}", e))?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| format!("Failed to read input: {}", e))?;
    Ok(line)
}

pub fn print_scoreboard(records: &[ScoreRecord]) {
    if records.is_empty() {
        println!("No scores yet. Be the first!");
        return;
    }
    println!("{:>4}  {:<15}  {:>8}", "Rank", "Player", "Score");
    for (index, record) in records.iter().enumerate() {
        println!(
            "{:>4}  {:<15}  {:>8}",
            index + 1,
            record.player_name,
            record.score
        );
    }
}
