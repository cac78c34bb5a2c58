use thiserror::Error;

/// Errors raised while preparing Flotilla to serve: loading and checking config.
#[derive(Error, Debug)]
pub enum FlotillaError {
    #[error("Config error: {0}")]
    Config(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
