//! Form Composer - form composition engine with a scriptable replay host
//!
//! Replays a JSON script of authoring commands against the composer and
//! prints every host event as one JSON line on stdout.

mod composer;
mod config;
mod script;
mod state;

use anyhow::{Context, Result};
use config::ComposerConfig;
use script::{Script, ScriptRunner};
use std::io::{self, Write};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "form_composer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = ComposerConfig::load().context("failed to load configuration")?;
    let pretty = config.pretty_output_or_default();

    let script = match std::env::args().nth(1).filter(|arg| arg != "-") {
        Some(path) => Script::from_path(Path::new(&path))
            .with_context(|| format!("failed to load script {path}"))?,
        None => Script::from_reader(io::stdin().lock())?,
    };
    tracing::info!(commands = script.commands.len(), "replaying script");

    let events = ScriptRunner::new(config).run(script)?;

    let mut out = io::stdout().lock();
    for event in &events {
        let line = if pretty {
            serde_json::to_string_pretty(event)?
        } else {
            serde_json::to_string(event)?
        };
        writeln!(out, "{line}")?;
    }

    Ok(())
}
