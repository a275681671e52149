use bytering_core::RelayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("relay failed: {0}")]
    Relay(#[from] RelayError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl CliError {
    // 0: success
    // 11: config error
    // 20: stream / IO error
    // 50: internal
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 11,
            CliError::Relay(re) => match re {
                RelayError::Ring(e) if !e.is_endpoint() => 50,
                RelayError::Join(_) => 50,
                _ => 20,
            },
            CliError::Io(_) => 20,
            CliError::Logging(_) => 11,
        }
    }
}
