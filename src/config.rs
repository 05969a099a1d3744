// Copyright (c) 2024 PostFinance AG
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use log::debug;
use serde::Deserialize;
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crate::credentials::IdentityVersion;
use crate::error::ConfigError;
use crate::password::PasswordPolicy;

#[derive(Clone, Default, Deserialize, Debug)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) auth: AuthConfig,
    pub(crate) identity: IdentityConfig,
}

#[derive(Clone, Default, Deserialize, Debug)]
#[serde(default)]
pub(crate) struct AuthConfig {
    pub(crate) allow_tenant_isolation: bool,
    pub(crate) test_accounts_file: Option<PathBuf>,
}

impl AuthConfig {
    /// The accounts file, if one is configured and present on disk.
    pub(crate) fn existing_accounts_file(&self) -> Option<&Path> {
        self.test_accounts_file
            .as_deref()
            .filter(|path| path.is_file())
    }
}

#[derive(Clone, Deserialize, Debug)]
#[serde(default)]
pub(crate) struct IdentityConfig {
    pub(crate) auth_version: IdentityVersion,
    pub(crate) admin_role: String,
    pub(crate) default_domain_name: String,
    pub(crate) primary: Option<StaticCredentialsConfig>,
    pub(crate) alt: Option<StaticCredentialsConfig>,
    pub(crate) admin: Option<StaticCredentialsConfig>,
    pub(crate) policy_min_length: usize,
    pub(crate) policy_num_uppercase: usize,
    pub(crate) policy_num_lowercase: usize,
    pub(crate) policy_num_numeric: usize,
    pub(crate) policy_num_specialchars: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        IdentityConfig {
            auth_version: IdentityVersion::V2,
            admin_role: String::from("admin"),
            default_domain_name: String::from("Default"),
            primary: None,
            alt: None,
            admin: None,
            policy_min_length: 0,
            policy_num_uppercase: 0,
            policy_num_lowercase: 0,
            policy_num_numeric: 0,
            policy_num_specialchars: 0,
        }
    }
}

impl IdentityConfig {
    pub(crate) fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy {
            min_length: self.policy_min_length,
            num_uppercase: self.policy_num_uppercase,
            num_lowercase: self.policy_num_lowercase,
            num_numeric: self.policy_num_numeric,
            num_specialchars: self.policy_num_specialchars,
        }
    }
}

/// A statically configured credential set. Fields are optional so that an incomplete set can be
/// reported as invalid configuration instead of failing the whole file.
#[derive(Clone, Default, Deserialize, Debug)]
pub(crate) struct StaticCredentialsConfig {
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) tenant_name: Option<String>,
    pub(crate) domain_name: Option<String>,
}

pub(crate) fn read_config(config_path: PathBuf) -> Result<Config, ConfigError> {
    debug!("Reading config at: {}", config_path.display());

    let mut config_data: String = String::new();
    File::open(&config_path)
        .and_then(|mut config_file| config_file.read_to_string(&mut config_data))
        .map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;

    serde_yaml::from_str(&config_data).map_err(|source| ConfigError::Parse {
        path: config_path,
        source,
    })
}
