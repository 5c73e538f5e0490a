//! Command handlers. Results are written as pretty JSON to the given writer.

use crate::args::{Cli, Commands, ProfileAction};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::io::Write;
use todolite::domain::config::{AdapterKind, AppConfig};
use todolite::domain::constants::{ID_KEY, PROFILE_MODEL};
use todolite::model::Properties;
use todolite::{BoundCollection, Todolite};

/// Loads the configuration and applies command-line overrides.
///
/// # Errors
/// Fails if the configuration file is missing or malformed.
pub fn settings(cli: &Cli) -> Result<AppConfig> {
    let mut config = Todolite::load_config(cli.config.as_deref())?;
    if let Some(adapter) = cli.adapter {
        config.database.adapter = adapter;
    }
    if let Some(root) = &cli.root {
        config.database.root.clone_from(root);
    }
    Ok(config)
}

/// Executes one command against a freshly initialized data layer.
///
/// # Errors
/// Propagates data-layer failures and reports missing documents.
pub async fn run(command: Commands, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    if config.database.adapter == AdapterKind::Memory {
        tracing::warn!(
            "Memory adapter in use: documents are discarded when this command exits \
             (pass --adapter file or set database.adapter to keep them)"
        );
    }
    let app = Todolite::init(config).await.context("Failed to open the data layer")?;

    match command {
        Commands::Profile { action } => {
            let profiles = app.collection(PROFILE_MODEL)?;
            profile(profiles, action, out).await
        },
    }
}

async fn profile(
    profiles: BoundCollection<'_>,
    action: ProfileAction,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        ProfileAction::Create { set } => {
            let properties: Properties = set.into_iter().collect();
            let created = profiles.create(properties).await?;
            tracing::info!(id = created.id(), "Profile created");
            emit(out, &created.to_json())
        },
        ProfileAction::List {} => {
            let all = profiles.fetch().await?;
            emit(out, &Value::Array(all.iter().map(|p| p.to_json()).collect()))
        },
        ProfileAction::Get { id } => match profiles.get(&id).await? {
            Some(found) => emit(out, &found.to_json()),
            None => bail!("Profile '{id}' not found"),
        },
        ProfileAction::Delete { id } => {
            profiles.remove(&id).await?;
            emit(out, &serde_json::json!({ ID_KEY: id, "deleted": true }))
        },
    }
}

fn emit(out: &mut impl Write, value: &Value) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
