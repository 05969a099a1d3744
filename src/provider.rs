// Copyright (c) 2024 PostFinance AG
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::accounts::{CredentialPool, LockingAccounts, NotLockingAccounts};
use crate::config::Config;
use crate::credentials::{get_configured_credentials, CredentialRole, IdentityVersion};
use crate::error::CredentialsError;
use crate::isolated::{IsolatedCreds, NetworkResources};

const CHECK_ADMIN: &str = "check_admin";
const CHECK_ALT: &str = "check_alt";

/// The credential sourcing strategy a test uses for its whole lifetime.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub(crate) enum CredentialProvider {
    Isolated(IsolatedCreds),
    Locking(LockingAccounts),
    NotLocking(NotLockingAccounts),
}

impl CredentialProvider {
    pub(crate) fn name(&self) -> &str {
        match self {
            CredentialProvider::Isolated(creds) => &creds.name,
            CredentialProvider::Locking(accounts) => &accounts.name,
            CredentialProvider::NotLocking(accounts) => &accounts.name,
        }
    }

    pub(crate) fn identity_version(&self) -> IdentityVersion {
        match self {
            CredentialProvider::Isolated(creds) => creds.identity_version,
            CredentialProvider::Locking(accounts) => accounts.identity_version,
            CredentialProvider::NotLocking(accounts) => accounts.identity_version,
        }
    }
}

impl std::fmt::Display for CredentialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strategy = match self {
            CredentialProvider::Isolated(_) => "isolated",
            CredentialProvider::Locking(_) => "locking",
            CredentialProvider::NotLocking(_) => "not_locking",
        };
        write!(
            f,
            "{strategy} (name: {}, identity version: {})",
            self.name(),
            self.identity_version()
        )
    }
}

/// Outcome of a capability query against a credential collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Capability {
    Available,
    Unavailable,
    Misconfigured,
}

impl Capability {
    /// Classifies a collaborator answer. Errors other than invalid configuration are returned.
    pub(crate) fn classify(
        result: Result<bool, CredentialsError>,
    ) -> Result<Self, CredentialsError> {
        match result {
            Ok(true) => Ok(Capability::Available),
            Ok(false) => Ok(Capability::Unavailable),
            Err(CredentialsError::InvalidConfiguration(reason)) => {
                debug!("Capability misconfigured: {reason}");
                Ok(Capability::Misconfigured)
            }
            Err(err) => Err(err),
        }
    }

    pub(crate) fn is_available(self) -> bool {
        match self {
            Capability::Available => true,
            Capability::Unavailable | Capability::Misconfigured => false,
        }
    }
}

/// Picks the credential provider for a test.
///
/// Tenant isolation, whether configured or forced by the caller, wins over any accounts file. An
/// accounts file that exists on disk selects the locking pool, anything else falls back to the
/// non-locking pool.
pub(crate) fn select_provider(
    config: &Config,
    name: &str,
    network_resources: Option<NetworkResources>,
    force_tenant_isolation: bool,
    identity_version: Option<IdentityVersion>,
) -> CredentialProvider {
    let identity_version = identity_version.unwrap_or(config.identity.auth_version);

    let provider = if config.auth.allow_tenant_isolation || force_tenant_isolation {
        CredentialProvider::Isolated(IsolatedCreds::new(
            name,
            network_resources,
            identity_version,
        ))
    } else if let Some(accounts_file) = config.auth.existing_accounts_file() {
        CredentialProvider::Locking(LockingAccounts::new(
            name,
            identity_version,
            accounts_file,
            &config.identity.admin_role,
        ))
    } else {
        CredentialProvider::NotLocking(NotLockingAccounts::new(
            name,
            identity_version,
            &config.identity,
        ))
    };

    debug!("Selected credential provider: {provider}");
    provider
}

/// Builds the short-lived pool used to answer a capability question.
fn probe_pool(
    config: &Config,
    accounts_file: Option<&Path>,
    name: &str,
) -> Box<dyn CredentialPool> {
    let identity_version = config.identity.auth_version;

    match accounts_file {
        Some(accounts_file) => Box::new(LockingAccounts::new(
            name,
            identity_version,
            accounts_file,
            &config.identity.admin_role,
        )),
        None => Box::new(NotLockingAccounts::new(
            name,
            identity_version,
            &config.identity,
        )),
    }
}

pub(crate) fn is_admin_available(config: &Config) -> Result<bool, CredentialsError> {
    if config.auth.allow_tenant_isolation {
        return Ok(true);
    }

    let capability = if let Some(accounts_file) = config.auth.existing_accounts_file() {
        let probe = probe_pool(config, Some(accounts_file), CHECK_ADMIN);
        Capability::classify(probe.admin_available())?
    } else {
        let resolved = get_configured_credentials(
            &config.identity,
            CredentialRole::IdentityAdmin,
            false,
        )
        .map(|_| true);
        Capability::classify(resolved)?
    };

    debug!("Admin credentials capability: {capability:?}");
    Ok(capability.is_available())
}

pub(crate) fn is_alt_available(config: &Config) -> Result<bool, CredentialsError> {
    if config.auth.allow_tenant_isolation {
        return Ok(true);
    }

    let accounts_file = config.auth.existing_accounts_file();
    let capability =
        Capability::classify(probe_pool(config, accounts_file, CHECK_ALT).is_multi_user())?;

    debug!("Alt credentials capability: {capability:?}");
    Ok(capability.is_available())
}
