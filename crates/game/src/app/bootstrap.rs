use std::fs;
use std::path::{Path, PathBuf};

use scroller_engine::{ConfigError, WorldConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub(crate) const CONFIG_ENV_VAR: &str = "SCROLLER_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct DemoConfig {
    pub(crate) gravity: f32,
    pub(crate) player_walk_speed: f32,
    pub(crate) stomp_damage: i32,
    pub(crate) summary_interval_frames: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            player_walk_speed: 2.0,
            stomp_damage: 1,
            summary_interval_frames: 120,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct GameConfig {
    pub(crate) world: WorldConfig,
    pub(crate) demo: DemoConfig,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error("failed to read config file {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path} at {location}: {source}")]
    ParseConfig {
        path: PathBuf,
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

pub(crate) struct AppWiring {
    pub(crate) config: GameConfig,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Scroller Startup ===");

    let path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    let config = resolve_config(path.as_deref())?;
    Ok(AppWiring { config })
}

fn resolve_config(path: Option<&Path>) -> Result<GameConfig, BootstrapError> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => {
            info!(env_var = CONFIG_ENV_VAR, "config_defaults");
            GameConfig::default()
        }
    };
    config.world.validate()?;
    Ok(config)
}

pub(crate) fn load_config(path: &Path) -> Result<GameConfig, BootstrapError> {
    let raw = fs::read_to_string(path).map_err(|source| BootstrapError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&raw).map_err(|err| BootstrapError::ParseConfig {
        path: path.to_path_buf(),
        location: err.path().to_string(),
        source: err.into_inner(),
    })?;
    info!(path = %path.display(), "config_loaded");
    Ok(config)
}

fn parse_config(raw: &str) -> Result<GameConfig, serde_path_to_error::Error<serde_json::Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
