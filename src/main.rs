// Copyright (c) 2024 PostFinance AG
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use std::process::exit;

use clap::Parser;
use log::{debug, info};

use crate::cli::{CliArgs, Command, SelectProviderArgs};
use crate::config::{read_config, Config};
use crate::password::generate_policy_password;
use crate::provider::{is_admin_available, is_alt_available, select_provider};

mod accounts;
mod cli;
mod config;
mod credentials;
mod error;
mod isolated;
mod password;
mod provider;

fn main() {
    env_logger::init();

    let args: CliArgs = CliArgs::parse();
    debug!("Parsed CLI arguments: {:?}", args);

    if let Err(err) = run(args.command) {
        eprintln!("🛑 {}", err);
        exit(1)
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::SelectProvider(select_args) => {
            let config: Config = read_config(select_args.base.config_path.clone())?;
            print_selected_provider(&config, &select_args)?
        }
        Command::CheckAdmin(base) => {
            let config: Config = read_config(base.config_path)?;
            let available = is_admin_available(&config)?;
            println!("Admin credentials available: {}", yes_no(available))
        }
        Command::CheckAlt(base) => {
            let config: Config = read_config(base.config_path)?;
            let available = is_alt_available(&config)?;
            println!("Alt credentials available: {}", yes_no(available))
        }
        Command::GeneratePassword(base) => {
            let config: Config = read_config(base.config_path)?;
            info!("Generating password from identity policy");
            println!("{}", generate_policy_password(&config.identity.password_policy()))
        }
    }

    Ok(())
}

fn print_selected_provider(
    config: &Config,
    select_args: &SelectProviderArgs,
) -> Result<(), serde_json::Error> {
    let provider = select_provider(
        config,
        &select_args.name,
        select_args.network_resources,
        select_args.force_tenant_isolation,
        select_args.identity_version,
    );

    if select_args.json {
        println!("{}", serde_json::to_string(&provider)?);
    } else {
        println!("Selected credential provider: {provider}");
    }

    Ok(())
}

fn yes_no(available: bool) -> &'static str {
    if available {
        "yes"
    } else {
        "no"
    }
}
