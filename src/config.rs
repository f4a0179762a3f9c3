use std::path::PathBuf;

const DEFAULT_DB_NAME: &str = "streakwell.db";
const DEFAULT_USER: &str = "local";
const DEFAULT_LOG_FILTER: &str = "warn";

pub const DB_ENV: &str = "STREAKWELL_DB";
pub const USER_ENV: &str = "STREAKWELL_USER";
pub const LOG_ENV: &str = "STREAKWELL_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub user: String,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            db_path: db_path(),
            user: env_or(USER_ENV, DEFAULT_USER),
            log_filter: env_or(LOG_ENV, DEFAULT_LOG_FILTER),
        }
    }

    pub fn with_user(mut self, user: Option<String>) -> Self {
        if let Some(user) = user.filter(|u| !u.trim().is_empty()) {
            self.user = user;
        }
        self
    }

    /// Log file used while the terminal UI owns the screen.
    pub fn log_path(&self) -> PathBuf {
        self.db_path.with_extension("log")
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn db_path() -> PathBuf {
    if let Ok(path) = std::env::var(DB_ENV) {
        return PathBuf::from(path);
    }

    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("streakwell");

    std::fs::create_dir_all(&config_dir).ok();
    config_dir.join(DEFAULT_DB_NAME)
}
