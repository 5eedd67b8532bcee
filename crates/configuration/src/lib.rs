use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{Config, DatabaseSettings, LogLevel, LoggingSettings};

/// The file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tracker.toml";

const ENV_PREFIX: &str = "TRACKER";

/// Loads the tracker configuration.
///
/// Sources are layered in this order, later ones winning:
/// 1. built-in defaults,
/// 2. the TOML file at `path` (required), or `tracker.toml` if present,
/// 3. `TRACKER__*` environment variables (e.g. `TRACKER__DATABASE__URL`),
/// 4. `DATABASE_URL`, which may also come from a `.env` file.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();

    let mut config = read_config(path, environment())?;
    apply_database_url(&mut config, std::env::var("DATABASE_URL").ok());

    config.validate()?;
    Ok(config)
}

/// The `TRACKER__*` environment source, e.g. `TRACKER__LOGGING__LEVEL=debug`.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).separator("__")
}

fn read_config(path: Option<&Path>, env: config::Environment) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => {
            config::File::new(&path.to_string_lossy(), config::FileFormat::Toml).required(true)
        }
        None => config::File::new(DEFAULT_CONFIG_FILE, config::FileFormat::Toml).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    Ok(config)
}

fn apply_database_url(config: &mut Config, database_url: Option<String>) {
    if let Some(url) = database_url.filter(|url| !url.is_empty()) {
        config.database.url = url;
    }
}
