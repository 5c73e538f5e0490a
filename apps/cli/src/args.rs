//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use todolite::domain::config::AdapterKind;

/// Command-line interface of the `todolite` binary.
#[derive(Debug, Parser)]
#[command(name = "todolite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Inspect and edit the ToDoLite local document store")]
pub struct Cli {
    /// Configuration file (TOML, JSON or YAML); `todolite.*` is used when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Document-store adapter, overriding the configuration (memory, file)
    #[arg(long, global = true)]
    pub adapter: Option<AdapterKind>,

    /// Root directory of file-backed databases, overriding the configuration
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage user profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// Create a profile from `key=value` pairs
    Create {
        /// Property assignment; values are parsed as JSON and fall back to plain strings
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, Value)>,
    },
    /// List every profile
    List {},
    /// Show one profile
    Get { id: String },
    /// Delete one profile
    Delete { id: String },
}

/// Parses `key=value`, reading the value as JSON when possible.
///
/// # Errors
/// Returns a message when there is no `=` or the key is empty.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw.split_once('=').ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}
