//! Station label resolution.

mod directory;
mod error;

pub use directory::{DirectoryConfig, StationDirectory};
pub use error::StationError;
