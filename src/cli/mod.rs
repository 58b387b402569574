//! Command-line interface

pub mod commands;
pub mod display;
pub mod model;
pub mod payload;

pub use commands::{CliArgs, Commands};
