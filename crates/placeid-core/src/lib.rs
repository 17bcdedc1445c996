use thiserror::Error;

pub mod config;
pub mod record;

pub use config::{load_resolver_config, load_resolver_config_from_env, ResolverConfig};
pub use record::{BusinessRecord, Coordinates};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
