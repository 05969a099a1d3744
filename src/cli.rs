// Copyright (c) 2024 PostFinance AG
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use clap::{Parser, Subcommand};

use crate::credentials::IdentityVersion;
use crate::isolated::NetworkResources;

/// provisioner - Credential provisioning for integration tests.
///
/// This tool selects how a test obtains its credentials, reports which credentials are available for skip checks, and generates policy compliant passwords.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))] // Require at least one subcommand
#[command(propagate_version = true)] // Display version in subcommand help
pub(crate) struct CliArgs {
    #[clap(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Select the credential provider for a test.
    ///
    /// Tenant isolation wins over a test accounts file, which wins over statically configured credentials.
    SelectProvider(SelectProviderArgs),

    /// Check whether admin credentials are available.
    CheckAdmin(BaseArgs),

    /// Check whether alternative credentials are available.
    CheckAlt(BaseArgs),

    /// Generate a password satisfying the configured identity policy.
    GeneratePassword(BaseArgs),
}

/// Base arguments for subcommands that share common parameters.
#[derive(Parser, Debug)]
pub(crate) struct BaseArgs {
    /// Path to the configuration file (default: config.yml).
    #[clap(short, long, default_value = "config.yml")]
    pub(crate) config_path: std::path::PathBuf,
}

/// Arguments specific to the `select-provider` subcommand.
#[derive(Parser, Debug)]
pub(crate) struct SelectProviderArgs {
    #[clap(flatten)] // Inherit arguments from BaseArgs
    pub(crate) base: BaseArgs,

    /// Name of the test requesting credentials
    #[clap(short, long)]
    pub(crate) name: String,

    /// Request a freshly isolated tenant regardless of the configuration
    #[clap(long)]
    pub(crate) force_tenant_isolation: bool,

    /// Identity API version, defaults to the configured auth version
    #[clap(long)]
    pub(crate) identity_version: Option<IdentityVersion>,

    /// Comma separated network resources to create for an isolated tenant
    #[clap(long)]
    pub(crate) network_resources: Option<NetworkResources>,

    /// Print the selected provider as JSON
    #[clap(long)]
    pub(crate) json: bool,
}
