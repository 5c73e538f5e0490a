//! Command-line front end for the ToDoLite data layer.

pub mod args;
pub mod commands;

pub use crate::args::Cli;
pub use crate::commands::{run, settings};
