// Copyright (c) 2024 PostFinance AG
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use log::trace;
use serde::{Deserialize, Serialize};

use crate::config::{IdentityConfig, StaticCredentialsConfig};
use crate::error::CredentialsError;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum IdentityVersion {
    #[default]
    V2,
    V3,
}

impl std::str::FromStr for IdentityVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v2" => Ok(IdentityVersion::V2),
            "v3" => Ok(IdentityVersion::V3),
            _ => Err(format!("unknown identity version: {}", s)),
        }
    }
}

impl std::fmt::Display for IdentityVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityVersion::V2 => write!(f, "v2"),
            IdentityVersion::V3 => write!(f, "v3"),
        }
    }
}

/// Role of a statically configured credential set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CredentialRole {
    Primary,
    Alt,
    IdentityAdmin,
}

impl std::str::FromStr for CredentialRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(CredentialRole::Primary),
            "alt_user" => Ok(CredentialRole::Alt),
            "identity_admin" => Ok(CredentialRole::IdentityAdmin),
            _ => Err(format!("unknown credential role: {}", s)),
        }
    }
}

impl std::fmt::Display for CredentialRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialRole::Primary => write!(f, "user"),
            CredentialRole::Alt => write!(f, "alt_user"),
            CredentialRole::IdentityAdmin => write!(f, "identity_admin"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Credentials {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) tenant_name: Option<String>,
    pub(crate) domain_name: Option<String>,
}

// Keeps the password out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("tenant_name", &self.tenant_name)
            .field("domain_name", &self.domain_name)
            .finish()
    }
}

/// Resolves the statically configured credential set for `role`.
///
/// With `fill_in` unset the set is only validated: every attribute required by the configured
/// identity version must be present. With `fill_in` set, a missing v3 domain is completed from
/// `identity.default_domain_name`.
pub(crate) fn get_configured_credentials(
    identity: &IdentityConfig,
    role: CredentialRole,
    fill_in: bool,
) -> Result<Credentials, CredentialsError> {
    trace!("Resolving configured '{role}' credentials (fill_in: {fill_in})");

    let configured: &StaticCredentialsConfig = match role {
        CredentialRole::Primary => identity.primary.as_ref(),
        CredentialRole::Alt => identity.alt.as_ref(),
        CredentialRole::IdentityAdmin => identity.admin.as_ref(),
    }
    .ok_or_else(|| {
        CredentialsError::invalid_configuration(format!("no '{role}' credentials configured"))
    })?;

    let username = required(configured.username.as_ref(), role, "username")?;
    let password = required(configured.password.as_ref(), role, "password")?;

    let domain_name = match (identity.auth_version, &configured.domain_name) {
        (IdentityVersion::V3, None) if fill_in => Some(identity.default_domain_name.clone()),
        (IdentityVersion::V3, None) => {
            return Err(CredentialsError::invalid_configuration(format!(
                "'{role}' credentials are missing 'domain_name' required by identity v3"
            )))
        }
        (_, domain_name) => domain_name.clone(),
    };

    Ok(Credentials {
        username,
        password,
        tenant_name: configured.tenant_name.clone(),
        domain_name,
    })
}

fn required(
    value: Option<&String>,
    role: CredentialRole,
    attribute: &str,
) -> Result<String, CredentialsError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(CredentialsError::invalid_configuration(format!(
            "'{role}' credentials are missing '{attribute}'"
        ))),
    }
}
