pub mod api;
pub mod backup;
pub mod config;
pub mod constants;
pub mod error;
pub mod lifecycle;
pub mod retention;

pub use error::{KeeperError, Result};
