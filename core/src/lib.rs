//! Fixed-capacity circular byte buffer for staging data between a byte
//! stream and application code.

pub mod config;
pub mod error;
pub mod relay;
pub mod ring;

pub use error::{RelayError, RingError};
pub use ring::RingBuffer;
