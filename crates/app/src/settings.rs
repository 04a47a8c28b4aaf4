//! Application settings, read from `settings.toml`.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    /// In-memory database, lost on shutdown. For local experiments only.
    Memory,
    /// SQLite file at the given path, created on first run.
    Sqlite(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    /// Log level filter (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
