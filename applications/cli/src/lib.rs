//! Timbre command-line front end
//!
//! The binary is a thin shell over these modules so the same steps can be
//! driven from tests.

pub mod commands;
pub mod config;
pub mod error;

pub use crate::commands::{analyze, process, resample_file, ProcessReport};
pub use crate::config::{OutputSettings, TimbreConfig};
pub use crate::error::{CliError, Result};
