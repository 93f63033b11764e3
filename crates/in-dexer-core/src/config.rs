use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

pub const DEFAULT_DB_PATH: &str = "file_index.db";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite file holding `indexed_folders` and `files`.
    pub db_path: String,
    /// Roots registered before every refresh, in addition to those already stored.
    pub root_paths: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            root_paths: Vec::new(),
        }
    }
}

/// Defaults, then `Config.toml` if present, then `IN_DEXER_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("db_path", DEFAULT_DB_PATH)?
        .set_default("root_paths", Vec::<String>::new())?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("IN_DEXER"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
