// Copyright (c) 2024 PostFinance AG
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use serde::Serialize;

use crate::credentials::IdentityVersion;

/// Network resources created alongside an isolated tenant.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub(crate) struct NetworkResources {
    pub(crate) network: bool,
    pub(crate) router: bool,
    pub(crate) subnet: bool,
    pub(crate) dhcp: bool,
}

impl Default for NetworkResources {
    fn default() -> Self {
        NetworkResources {
            network: true,
            router: true,
            subnet: true,
            dhcp: true,
        }
    }
}

impl NetworkResources {
    pub(crate) fn none() -> Self {
        NetworkResources {
            network: false,
            router: false,
            subnet: false,
            dhcp: false,
        }
    }
}

impl std::str::FromStr for NetworkResources {
    type Err = String;

    /// Parses a comma separated list of the resources to create, e.g. `network,subnet`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut resources = NetworkResources::none();

        for resource in s.split(',').map(str::trim).filter(|r| !r.is_empty()) {
            match resource {
                "network" => resources.network = true,
                "router" => resources.router = true,
                "subnet" => resources.subnet = true,
                "dhcp" => resources.dhcp = true,
                _ => return Err(format!("unknown network resource: {}", resource)),
            }
        }

        Ok(resources)
    }
}

/// Credentials minted per test in a freshly created tenant.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub(crate) struct IsolatedCreds {
    pub(crate) name: String,
    pub(crate) network_resources: Option<NetworkResources>,
    pub(crate) identity_version: IdentityVersion,
}

impl IsolatedCreds {
    pub(crate) fn new(
        name: &str,
        network_resources: Option<NetworkResources>,
        identity_version: IdentityVersion,
    ) -> Self {
        IsolatedCreds {
            name: name.to_string(),
            network_resources,
            identity_version,
        }
    }
}
