//! pokewrap - look up PokeAPI resources from the command line
//!
//! Thin wrapper over the library: parses arguments, sets up logging and
//! prints what the cache-backed client resolves.

use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use pokewrap::api::{ApiClient, NameOrId, Pokemon, RESOURCE_TYPES};
use pokewrap::cli::{Cli, Command, StartupConfig};
use pokewrap::logging;

/// Runs one CLI command against the client, writing results to `out`
fn run(cli: &Cli, config: &StartupConfig, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    let client = || ApiClient::from_config(&config.client);

    match &cli.command {
        Command::Types => {
            for resource_type in RESOURCE_TYPES {
                writeln!(out, "{}", resource_type)?;
            }
        }
        Command::Get {
            resource_type,
            name_or_id,
        } => {
            let name_or_id: NameOrId = name_or_id.parse()?;
            let resource = client()?.resolve(resource_type, name_or_id)?;
            eprintln!("{}", resource.describe());
            match resource.data() {
                Some(data) => writeln!(out, "{}", serde_json::to_string_pretty(data)?)?,
                None => writeln!(out, "null")?,
            }
        }
        Command::List { resource_type, .. } => {
            let page = cli.command.page().unwrap_or_default();
            let list = client()?.list(resource_type, page)?;
            eprintln!("{} of {} {} resources", list.results().len(), list.count(), resource_type);
            for entry in &list {
                writeln!(out, "{}\t{}", entry.name, entry.url)?;
            }
        }
        Command::Pokemon { name_or_id } => {
            let name_or_id: NameOrId = name_or_id.parse()?;
            let pokemon = Pokemon::fetch(&client()?, name_or_id)?;
            writeln!(out, "{}", pokemon.describe())?;
            if pokemon.data().is_none() {
                writeln!(out, "(no data available)")?;
                return Ok(());
            }
            writeln!(out, "types:     {}", pokemon.types.join(", "))?;
            writeln!(out, "abilities: {}", pokemon.abilities.join(", "))?;
            if let (Some(height), Some(weight)) = (pokemon.height, pokemon.weight) {
                writeln!(out, "height:    {:.1} m", f64::from(height) / 10.0)?;
                writeln!(out, "weight:    {:.1} kg", f64::from(weight) / 10.0)?;
            }
            for (stat, value) in &pokemon.stats {
                writeln!(out, "{:<16} {}", stat, value)?;
            }
        }
    }

    Ok(())
}

/// Parses arguments, sets up logging and runs the selected command
fn try_main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = StartupConfig::from_cli(&cli)?;

    logging::init(config.log_level)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli, &config, &mut out)
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
