pub mod cli;
pub mod config;
pub mod error;
pub mod persistence;

pub use error::{EavError, Result};
