// Copyright (c) 2024 PostFinance AG
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::IdentityConfig;
use crate::credentials::{get_configured_credentials, CredentialRole, IdentityVersion};
use crate::error::CredentialsError;

const ADMIN_TYPE: &str = "admin";

/// Capability queries shared by both account pools.
pub(crate) trait CredentialPool {
    fn admin_available(&self) -> Result<bool, CredentialsError>;
    fn is_multi_user(&self) -> Result<bool, CredentialsError>;
}

/// One entry of the pre-created accounts file.
#[derive(Clone, Deserialize, Debug)]
pub(crate) struct Account {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) tenant_name: Option<String>,
    pub(crate) domain_name: Option<String>,
    #[serde(default)]
    pub(crate) roles: Vec<String>,
    #[serde(default)]
    pub(crate) types: Vec<String>,
}

impl Account {
    fn is_admin(&self, admin_role: &str) -> bool {
        self.types.iter().any(|t| t == ADMIN_TYPE) || self.roles.iter().any(|r| r == admin_role)
    }
}

pub(crate) fn read_accounts(path: &Path) -> Result<Vec<Account>, CredentialsError> {
    debug!("Reading accounts file at: {}", path.display());

    let content = read_to_string(path).map_err(|source| CredentialsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_yaml::from_str(&content).map_err(|source| CredentialsError::AccountsFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Pool of pre-created accounts, locked per test while in use.
///
/// Construction does no I/O; every query reads the accounts file again.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub(crate) struct LockingAccounts {
    pub(crate) name: String,
    pub(crate) identity_version: IdentityVersion,
    pub(crate) accounts_file: PathBuf,
    #[serde(skip)]
    admin_role: String,
}

impl LockingAccounts {
    pub(crate) fn new(
        name: &str,
        identity_version: IdentityVersion,
        accounts_file: &Path,
        admin_role: &str,
    ) -> Self {
        LockingAccounts {
            name: name.to_string(),
            identity_version,
            accounts_file: accounts_file.to_path_buf(),
            admin_role: admin_role.to_string(),
        }
    }

    fn accounts(&self) -> Result<Vec<Account>, CredentialsError> {
        let accounts = read_accounts(&self.accounts_file)?;
        if accounts.is_empty() {
            return Err(CredentialsError::invalid_configuration(format!(
                "no accounts defined in '{}'",
                self.accounts_file.display()
            )));
        }
        Ok(accounts)
    }
}

impl CredentialPool for LockingAccounts {
    fn admin_available(&self) -> Result<bool, CredentialsError> {
        let admin_available = self
            .accounts()?
            .iter()
            .any(|account| account.is_admin(&self.admin_role));

        trace!("[{}] admin account available: {admin_available}", self.name);
        Ok(admin_available)
    }

    fn is_multi_user(&self) -> Result<bool, CredentialsError> {
        let accounts = self.accounts()?;
        let distinct: HashSet<(&str, Option<&str>, Option<&str>)> = accounts
            .iter()
            .map(|account| {
                (
                    account.username.as_str(),
                    account.tenant_name.as_deref(),
                    account.domain_name.as_deref(),
                )
            })
            .collect();

        trace!("[{}] {} distinct accounts", self.name, distinct.len());
        Ok(distinct.len() > 1)
    }
}

/// Statically configured credentials shared by every test, without locking.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct NotLockingAccounts {
    pub(crate) name: String,
    pub(crate) identity_version: IdentityVersion,
    #[serde(skip)]
    identity: IdentityConfig,
}

impl NotLockingAccounts {
    pub(crate) fn new(
        name: &str,
        identity_version: IdentityVersion,
        identity: &IdentityConfig,
    ) -> Self {
        NotLockingAccounts {
            name: name.to_string(),
            identity_version,
            identity: IdentityConfig {
                auth_version: identity_version,
                ..identity.clone()
            },
        }
    }
}

impl CredentialPool for NotLockingAccounts {
    fn admin_available(&self) -> Result<bool, CredentialsError> {
        match get_configured_credentials(&self.identity, CredentialRole::IdentityAdmin, false) {
            Ok(_) => Ok(true),
            Err(CredentialsError::InvalidConfiguration(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn is_multi_user(&self) -> Result<bool, CredentialsError> {
        let primary = get_configured_credentials(&self.identity, CredentialRole::Primary, false);
        let alt = get_configured_credentials(&self.identity, CredentialRole::Alt, false);

        match (primary, alt) {
            (Ok(primary), Ok(alt)) => Ok(primary.username != alt.username),
            (Err(err), _) | (_, Err(err)) => Err(CredentialsError::invalid_configuration(format!(
                "at least one of the configured credentials is not valid: {err}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticCredentialsConfig;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn accounts_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create tmp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write into tmp file");
        file
    }

    fn locking(file: &NamedTempFile) -> LockingAccounts {
        LockingAccounts::new("test", IdentityVersion::V2, file.path(), "admin")
    }

    fn static_credentials(username: &str) -> Option<StaticCredentialsConfig> {
        Some(StaticCredentialsConfig {
            username: Some(username.to_string()),
            password: Some("password".to_string()),
            tenant_name: Some(username.to_string()),
            domain_name: None,
        })
    }

    #[test]
    fn read_accounts_file() {
        let accounts = read_accounts(Path::new("tests/resources/accounts/multi_user.yaml")).unwrap();

        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].username, "user_1");
        assert_eq!(accounts[0].types, vec!["admin".to_string()]);
        assert!(accounts[1].types.is_empty());
    }

    #[test]
    fn read_missing_accounts_file_is_io_error() {
        let error = read_accounts(Path::new("tests/resources/accounts/non_existing.yaml"))
            .unwrap_err();

        assert!(matches!(error, CredentialsError::Io { .. }));
    }

    #[test]
    fn malformed_accounts_file_is_not_invalid_configuration() {
        let file = accounts_file("- username: [unclosed");

        let error = locking(&file).is_multi_user().unwrap_err();

        assert!(matches!(error, CredentialsError::AccountsFile { .. }));
    }

    #[test]
    fn empty_accounts_file_is_invalid_configuration() {
        let file = accounts_file("");

        assert!(matches!(
            locking(&file).is_multi_user(),
            Err(CredentialsError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            locking(&file).admin_available(),
            Err(CredentialsError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn locking_admin_available_by_type() {
        let file = accounts_file(
            "- username: admin\n  password: secret\n  types: [admin]\n- username: demo\n  password: secret\n",
        );

        assert!(locking(&file).admin_available().unwrap());
    }

    #[test]
    fn locking_admin_available_by_role() {
        let file = accounts_file(
            "- username: operator\n  password: secret\n  roles: [cloud_admin]\n",
        );

        let pool = LockingAccounts::new("test", IdentityVersion::V2, file.path(), "cloud_admin");

        assert!(pool.admin_available().unwrap());
        assert!(!locking(&file).admin_available().unwrap());
    }

    #[test]
    fn locking_single_user_is_not_multi_user() {
        let file = accounts_file("- username: demo\n  password: secret\n  tenant_name: demo\n");

        assert!(!locking(&file).is_multi_user().unwrap());
    }

    #[test]
    fn locking_duplicate_accounts_count_once() {
        let file = accounts_file(
            "- username: demo\n  password: one\n  tenant_name: demo\n- username: demo\n  password: two\n  tenant_name: demo\n",
        );

        assert!(!locking(&file).is_multi_user().unwrap());
    }

    #[test]
    fn locking_multi_user() {
        let pool = LockingAccounts::new(
            "test",
            IdentityVersion::V2,
            Path::new("tests/resources/accounts/multi_user.yaml"),
            "admin",
        );

        assert!(pool.is_multi_user().unwrap());
        assert!(pool.admin_available().unwrap());
    }

    #[test]
    fn not_locking_multi_user_with_distinct_usernames() {
        let identity = IdentityConfig {
            primary: static_credentials("demo"),
            alt: static_credentials("alt_demo"),
            ..IdentityConfig::default()
        };

        let pool = NotLockingAccounts::new("test", IdentityVersion::V2, &identity);

        assert!(pool.is_multi_user().unwrap());
    }

    #[test]
    fn not_locking_same_username_is_not_multi_user() {
        let identity = IdentityConfig {
            primary: static_credentials("demo"),
            alt: static_credentials("demo"),
            ..IdentityConfig::default()
        };

        let pool = NotLockingAccounts::new("test", IdentityVersion::V2, &identity);

        assert!(!pool.is_multi_user().unwrap());
    }

    #[test]
    fn not_locking_missing_alt_is_invalid_configuration() {
        let identity = IdentityConfig {
            primary: static_credentials("demo"),
            ..IdentityConfig::default()
        };

        let error = NotLockingAccounts::new("test", IdentityVersion::V2, &identity)
            .is_multi_user()
            .unwrap_err();

        assert!(error
            .to_string()
            .contains("at least one of the configured credentials is not valid"));
    }

    #[test]
    fn not_locking_uses_requested_identity_version() {
        let identity = IdentityConfig {
            primary: static_credentials("demo"),
            alt: static_credentials("alt_demo"),
            ..IdentityConfig::default()
        };

        // v3 needs a domain which the static credentials above do not carry.
        let pool = NotLockingAccounts::new("test", IdentityVersion::V3, &identity);

        assert!(matches!(
            pool.is_multi_user(),
            Err(CredentialsError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn not_locking_admin_available() {
        let with_admin = IdentityConfig {
            admin: static_credentials("admin"),
            ..IdentityConfig::default()
        };

        assert!(NotLockingAccounts::new("test", IdentityVersion::V2, &with_admin)
            .admin_available()
            .unwrap());
        assert!(
            !NotLockingAccounts::new("test", IdentityVersion::V2, &IdentityConfig::default())
                .admin_available()
                .unwrap()
        );
    }
}
