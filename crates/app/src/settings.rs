//! Application settings, read from `settings.toml` plus `HOMELEDGER__*`
//! environment overrides. Everything has a default, so the binary starts
//! with no configuration at all (in-memory store, port 3000).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

/// Storage backing the record store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "path")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 3000)?
            .set_default("server.database.kind", "memory")?
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("HOMELEDGER").separator("__"))
            .build()?
            .try_deserialize()
    }
}
