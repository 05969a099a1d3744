// Copyright (c) 2024 PostFinance AG
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use std::path::PathBuf;

/// Errors raised while resolving credentials or probing a credential pool.
///
/// Only [`CredentialsError::InvalidConfiguration`] means "this capability is absent". Every other
/// variant points at a broken environment and is propagated by the availability probes.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CredentialsError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to read accounts file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse accounts file '{}': {source}", .path.display())]
    AccountsFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl CredentialsError {
    pub(crate) fn invalid_configuration(message: impl Into<String>) -> Self {
        CredentialsError::InvalidConfiguration(message.into())
    }
}

/// Errors raised while loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("Failed to read configuration file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
