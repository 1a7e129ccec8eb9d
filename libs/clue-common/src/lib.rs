pub mod archive;
pub mod config;
pub mod error;
pub mod solution;
pub mod types;

pub use error::{ErrorKind, HarnessError};
