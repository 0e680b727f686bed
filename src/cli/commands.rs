//! Command dispatch

use std::io;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{AssemblyScenario, DialogScenario, GalleryScenario};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::IconFactory;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Composite) => _composite(),
        Some(Commands::Flyweight { keys }) => _flyweight(cli, keys),
        Some(Commands::Proxy { count }) => _proxy(cli, *count),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| CliError::Usage(e.to_string()))?;
            Ok(())
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    Ok(Settings::load(cli.config.as_deref())?)
}

#[instrument]
fn _composite() -> CliResult<()> {
    let report = AssemblyScenario::new().run()?;
    output::header("Composite: equipment assembly");
    output::trace(&report.lines);
    output::success(&format!(
        "net price {} ({} nodes destroyed)",
        report.net_price,
        report.destroyed.len()
    ));
    Ok(())
}

#[instrument(skip(cli))]
fn _flyweight(cli: &Cli, keys: &[String]) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let catalog = settings.icon_catalog();
    for key in keys {
        if !catalog.contains(key) {
            output::warning(&format!("unknown icon '{}', drawn as 0x0", key));
        }
    }

    let scenario = DialogScenario::new(Arc::new(IconFactory::with_catalog(catalog)));
    let report = if keys.is_empty() {
        scenario.run()
    } else {
        scenario.run_custom(keys, settings.dialog_x_increment)
    };
    debug!("flyweight: active keys {:?}", report.active_keys);

    output::header("Flyweight: shared icons");
    output::trace(&report.lines);
    Ok(())
}

#[instrument(skip(cli))]
fn _proxy(cli: &Cli, count: Option<usize>) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let count = count.unwrap_or(settings.gallery_size);
    if count == 0 {
        return Err(CliError::InvalidArgs(
            "proxy count must be at least 1".to_string(),
        ));
    }

    let report = GalleryScenario::new(settings.image_session()).run(count);
    output::header("Proxy: lazily loaded images");
    output::trace(&report.lines);
    output::success(&format!(
        "{} proxies, {} loads, {} live after drop",
        report.ids.len(),
        report.loads,
        report.live_after_drop
    ));
    Ok(())
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match cli.config.as_deref().map(crate::config::expand_path) {
            Some(path) => output::info(&path.display()),
            None => match global_config_path() {
                Some(path) => output::info(&path.display()),
                None => output::warning("no config directory available on this platform"),
            },
        },
        ConfigCommands::Init => output::info(&Settings::template()),
    }
    Ok(())
}
