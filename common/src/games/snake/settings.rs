use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub grid_size: usize,
    pub tick_interval_ms: u64,
    pub food_reward: u32,
    pub initial_snake_len: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid_size: 20,
            tick_interval_ms: 200,
            food_reward: 10,
            initial_snake_len: 3,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size < 5 || self.grid_size > 100 {
            return Err("Grid size must be between 5 and 100".to_string());
        }
        if self.tick_interval_ms < 50 || self.tick_interval_ms > 5000 {
            return Err("Tick interval must be between 50ms and 5000ms".to_string());
        }
        if self.food_reward < 1 || self.food_reward > 1000 {
            return Err("Food reward must be between 1 and 1000".to_string());
        }
        if self.initial_snake_len < 1 || self.initial_snake_len > self.grid_size / 2 {
            return Err("Initial snake length must fit within half the grid".to_string());
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
