use super::settings::GameSettings;
use super::snake::Snake;
use super::types::{Direction, GamePhase, Point};
use crate::games::SessionRng;

const INITIAL_DIRECTION: Direction = Direction::Right;

/// Single-player snake state machine. All mutation goes through `start`,
/// `tick` and the input operations; a tick outside `Running` is a no-op.
#[derive(Clone, Debug)]
pub struct SnakeGame {
    snake: Snake,
    food: Point,
    direction: Direction,
    score: u32,
    phase: GamePhase,
    settings: GameSettings,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub snake: Vec<Point>,
    pub food: Point,
    pub direction: Direction,
    pub score: u32,
    pub phase: GamePhase,
}

impl SnakeGame {
    pub fn new(settings: GameSettings) -> Self {
        let snake = Self::initial_snake(&settings);
        // Fixed pre-start layout shown on the idle board; start() randomizes.
        let food_offset = (settings.grid_size * 3 / 4) as i32;
        Self {
            snake,
            food: Point::new(food_offset, food_offset),
            direction: INITIAL_DIRECTION,
            score: 0,
            phase: GamePhase::Idle,
            settings,
        }
    }

    fn initial_snake(settings: &GameSettings) -> Snake {
        let center = (settings.grid_size / 2) as i32;
        Snake::new(
            Point::new(center, center),
            INITIAL_DIRECTION,
            settings.initial_snake_len,
        )
    }

    pub fn start(&mut self, rng: &mut SessionRng) {
        self.snake = Self::initial_snake(&self.settings);
        self.direction = INITIAL_DIRECTION;
        self.score = 0;
        match self.random_free_cell(rng) {
            Some(food) => {
                self.food = food;
                self.phase = GamePhase::Running;
            }
            // The grid cannot hold the snake and a food cell at once.
            None => self.phase = GamePhase::Over,
        }
    }

    pub fn tick(&mut self, rng: &mut SessionRng) {
        if self.phase != GamePhase::Running {
            return;
        }

        let next_head = self.snake.head().step(self.direction);

        // The full current body counts, tail included: stepping onto the
        // cell the tail is about to vacate still ends the run.
        if !self.in_bounds(next_head) || self.snake.contains(next_head) {
            self.phase = GamePhase::Over;
            return;
        }

        self.snake.push_head(next_head);

        if next_head == self.food {
            self.score += self.settings.food_reward;
            match self.random_free_cell(rng) {
                Some(food) => self.food = food,
                None => self.phase = GamePhase::Over,
            }
        } else {
            self.snake.pop_tail();
        }
    }

    /// Accepts only perpendicular turns, and only while the game runs.
    /// Returns whether the heading changed.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        if direction.same_axis(&self.direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
        }
    }

    /// One input covering start, pause and resume. Ignored once the game is
    /// over; restarting from there is an explicit action.
    pub fn primary_action(&mut self, rng: &mut SessionRng) {
        match self.phase {
            GamePhase::Idle => self.start(rng),
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::Over => {}
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Point {
        self.food
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            direction: self.direction,
            score: self.score,
            phase: self.phase,
        }
    }

    fn in_bounds(&self, point: Point) -> bool {
        let size = self.settings.grid_size as i32;
        (0..size).contains(&point.x) && (0..size).contains(&point.y)
    }

    /// Rejection sampling over the grid. Returns None only when the snake
    /// occupies every cell.
    fn random_free_cell(&self, rng: &mut SessionRng) -> Option<Point> {
        if self.snake.len() >= self.settings.grid_size * self.settings.grid_size {
            return None;
        }
        let size = self.settings.grid_size as i32;
        loop {
            let candidate = Point::new(rng.random_range(0..size), rng.random_range(0..size));
            if !self.snake.contains(candidate) {
                return Some(candidate);
            }
        }
    }
}

#[cfg(test)]
impl SnakeGame {
    pub(crate) fn with_layout(
        settings: GameSettings,
        cells: &[Point],
        direction: Direction,
        food: Point,
    ) -> Self {
        Self {
            snake: Snake::from_segments(cells.iter().copied()),
            food,
            direction,
            score: 0,
            phase: GamePhase::Running,
            settings,
        }
    }

    pub(crate) fn set_food(&mut self, food: Point) {
        self.food = food;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_game() -> SnakeGame {
        SnakeGame::with_layout(
            GameSettings::default(),
            &[Point::new(10, 10), Point::new(9, 10), Point::new(8, 10)],
            Direction::Right,
            Point::new(15, 15),
        )
    }

    fn tiny_settings(grid_size: usize) -> GameSettings {
        GameSettings {
            grid_size,
            ..GameSettings::default()
        }
    }

    #[test]
    fn test_five_ticks_move_head_five_cells_right() {
        let mut game = straight_game();
        let mut rng = SessionRng::new(1);

        for step in 1..=5 {
            game.tick(&mut rng);
            assert_eq!(game.snake().head(), Point::new(10 + step, 10));
            assert_eq!(game.snake().len(), 3);
        }

        assert_eq!(game.snake().head(), Point::new(15, 10));
        assert_eq!(game.score(), 0);
        assert_eq!(game.phase(), GamePhase::Running);
    }

    #[test]
    fn test_eating_food_grows_snake_and_scores() {
        let mut game = straight_game();
        let mut rng = SessionRng::new(1);
        game.set_food(Point::new(11, 10));

        game.tick(&mut rng);

        assert_eq!(game.snake().len(), 4);
        assert_eq!(game.score(), 10);
        assert_ne!(game.food(), Point::new(11, 10));
        for segment in game.snapshot().snake {
            assert_ne!(game.food(), segment);
        }
    }

    #[test]
    fn test_three_foods_score_triple_reward() {
        let mut game = straight_game();
        let mut rng = SessionRng::new(1);

        for _ in 0..3 {
            let target = game.snake().head().step(Direction::Right);
            game.set_food(target);
            game.tick(&mut rng);
        }

        assert_eq!(game.score(), 30);
        assert_eq!(game.snake().len(), 6);
    }

    #[test]
    fn test_wall_collision_ends_run_and_leaves_snake_unchanged() {
        let mut game = SnakeGame::with_layout(
            GameSettings::default(),
            &[Point::new(19, 10), Point::new(18, 10), Point::new(17, 10)],
            Direction::Right,
            Point::new(0, 0),
        );
        let mut rng = SessionRng::new(1);
        let before = game.snapshot().snake;

        game.tick(&mut rng);

        assert_eq!(game.phase(), GamePhase::Over);
        assert_eq!(game.snapshot().snake, before);
    }

    #[test]
    fn test_self_collision_ends_run_and_leaves_snake_unchanged() {
        // Head at (11,11) about to move up into its own body at (11,10).
        let mut game = SnakeGame::with_layout(
            GameSettings::default(),
            &[
                Point::new(11, 11),
                Point::new(12, 11),
                Point::new(12, 10),
                Point::new(11, 10),
                Point::new(10, 10),
            ],
            Direction::Up,
            Point::new(0, 0),
        );
        let mut rng = SessionRng::new(1);
        let before = game.snapshot().snake;

        game.tick(&mut rng);

        assert_eq!(game.phase(), GamePhase::Over);
        assert_eq!(game.snapshot().snake, before);
    }

    #[test]
    fn test_stepping_onto_vacating_tail_is_a_collision() {
        // A 2x2 loop: the head would land exactly on the tail cell that this
        // same tick would vacate.
        let mut game = SnakeGame::with_layout(
            GameSettings::default(),
            &[
                Point::new(5, 5),
                Point::new(6, 5),
                Point::new(6, 6),
                Point::new(5, 6),
            ],
            Direction::Down,
            Point::new(0, 0),
        );
        let mut rng = SessionRng::new(1);

        game.tick(&mut rng);

        assert_eq!(game.phase(), GamePhase::Over);
        assert_eq!(game.snake().len(), 4);
    }

    #[test]
    fn test_reversal_and_colinear_turns_are_rejected() {
        let mut game = straight_game();

        assert!(!game.set_direction(Direction::Left));
        assert_eq!(game.direction(), Direction::Right);

        assert!(!game.set_direction(Direction::Right));
        assert_eq!(game.direction(), Direction::Right);
    }

    #[test]
    fn test_perpendicular_turns_are_accepted() {
        let mut game = straight_game();

        assert!(game.set_direction(Direction::Down));
        assert_eq!(game.direction(), Direction::Down);

        assert!(game.set_direction(Direction::Left));
        assert_eq!(game.direction(), Direction::Left);
    }

    #[test]
    fn test_direction_input_ignored_unless_running() {
        let mut game = SnakeGame::new(GameSettings::default());
        assert!(!game.set_direction(Direction::Down));

        let mut rng = SessionRng::new(1);
        game.start(&mut rng);
        game.pause();
        assert!(!game.set_direction(Direction::Down));
        assert_eq!(game.direction(), Direction::Right);
    }

    #[test]
    fn test_pause_and_resume_are_idempotent() {
        let mut game = SnakeGame::new(GameSettings::default());
        let mut rng = SessionRng::new(1);
        game.start(&mut rng);

        game.pause();
        game.pause();
        assert_eq!(game.phase(), GamePhase::Paused);

        game.resume();
        game.resume();
        assert_eq!(game.phase(), GamePhase::Running);
    }

    #[test]
    fn test_primary_action_cycles_phases_and_ignores_over() {
        let mut game = SnakeGame::new(GameSettings::default());
        let mut rng = SessionRng::new(1);

        assert_eq!(game.phase(), GamePhase::Idle);
        game.primary_action(&mut rng);
        assert_eq!(game.phase(), GamePhase::Running);
        game.primary_action(&mut rng);
        assert_eq!(game.phase(), GamePhase::Paused);
        game.primary_action(&mut rng);
        assert_eq!(game.phase(), GamePhase::Running);

        // Drive into the wall, then confirm the primary action is inert.
        while game.phase() == GamePhase::Running {
            game.tick(&mut rng);
        }
        assert_eq!(game.phase(), GamePhase::Over);
        game.primary_action(&mut rng);
        assert_eq!(game.phase(), GamePhase::Over);
    }

    #[test]
    fn test_tick_is_noop_outside_running() {
        let mut game = SnakeGame::new(GameSettings::default());
        let mut rng = SessionRng::new(1);
        let before = game.snapshot();

        game.tick(&mut rng);
        assert_eq!(game.snapshot(), before);

        game.start(&mut rng);
        game.pause();
        let paused = game.snapshot();
        game.tick(&mut rng);
        assert_eq!(game.snapshot(), paused);
    }

    #[test]
    fn test_food_relocates_to_the_only_free_cell() {
        // 2x2 grid with one free cell left after eating: rejection sampling
        // must land there.
        let mut game = SnakeGame::with_layout(
            tiny_settings(2),
            &[Point::new(0, 0), Point::new(1, 0)],
            Direction::Down,
            Point::new(0, 1),
        );
        let mut rng = SessionRng::new(1);

        game.tick(&mut rng);

        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.snake().len(), 3);
        assert_eq!(game.food(), Point::new(1, 1));
    }

    #[test]
    fn test_filling_the_board_ends_the_run() {
        let mut game = SnakeGame::with_layout(
            tiny_settings(2),
            &[Point::new(0, 0), Point::new(1, 0), Point::new(1, 1)],
            Direction::Down,
            Point::new(0, 1),
        );
        let mut rng = SessionRng::new(1);

        game.tick(&mut rng);

        assert_eq!(game.phase(), GamePhase::Over);
        assert_eq!(game.snake().len(), 4);
        assert_eq!(game.score(), 10);
    }

    #[test]
    fn test_start_resets_state_after_game_over() {
        let mut game = SnakeGame::new(GameSettings::default());
        let mut rng = SessionRng::new(9);

        game.start(&mut rng);
        let target = game.snake().head().step(Direction::Right);
        game.set_food(target);
        game.tick(&mut rng);
        assert_eq!(game.score(), 10);

        while game.phase() == GamePhase::Running {
            game.tick(&mut rng);
        }
        assert_eq!(game.phase(), GamePhase::Over);

        game.start(&mut rng);
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.snake().len(), 3);
        assert_eq!(game.snake().head(), Point::new(10, 10));
        assert!(!game.snake().contains(game.food()));
    }

    #[test]
    fn test_start_never_places_food_on_snake() {
        for seed in 0..50 {
            let mut game = SnakeGame::new(tiny_settings(5));
            let mut rng = SessionRng::new(seed);
            game.start(&mut rng);
            assert!(!game.snake().contains(game.food()));
        }
    }
}
