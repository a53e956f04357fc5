mod game_state;
mod settings;
mod snake;
mod types;

pub use game_state::{GameSnapshot, SnakeGame};
pub use settings::GameSettings;
pub use snake::Snake;
pub use types::{Direction, GamePhase, Point};
