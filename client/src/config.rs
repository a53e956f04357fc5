use common::games::snake::GameSettings;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "snake_arcade_config.yaml";

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("Server base URL must start with http:// or https://".to_string());
        }
        if self.request_timeout_ms < 100 || self.request_timeout_ms > 60_000 {
            return Err("Request timeout must be between 100ms and 60000ms".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub game: GameSettings,
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.game.validate()?;
        Ok(())
    }
}

fn default_config_path() -> String {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME).to_string_lossy().into_owned();
    }
    CONFIG_FILE_NAME.to_string()
}

/// Loads the YAML config, falling back to defaults when the file is absent.
pub fn load(path: Option<&str>) -> Result<Config, String> {
    let path = path.map(str::to_string).unwrap_or_else(default_config_path);
    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let config: Config = serde_yaml_ng::from_str(&content)
                .map_err(|e| format!("Failed to parse config {}: {}", path, e))?;
            config
                .validate()
                .map_err(|e| format!("Config validation error: {}", e))?;
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(format!("Failed to read config {}: {}", path, e)),
    }
}
