//! Registry of supported Cronos networks.
//!
//! A [`NetworkProfile`] bundles everything that varies per network: the
//! EIP-155 chain id, the RPC and explorer endpoints, the USDC deployment
//! used as the payment asset, and the EIP-712 domain parameters of that
//! deployment. A profile is selected once at startup and stays immutable
//! for the process lifetime.

use alloy_primitives::{Address, address};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use url::Url;

/// A Cronos network supported by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Cronos EVM mainnet (eip155:25).
    CronosMainnet,
    /// Cronos EVM testnet (eip155:338).
    CronosTestnet,
}

impl Network {
    /// The protocol-level network identifier carried in payment requirements
    /// and in the signed payment envelope.
    pub fn id(&self) -> &'static str {
        match self {
            Network::CronosMainnet => "cronos-mainnet",
            Network::CronosTestnet => "cronos-testnet",
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Error returned when parsing an unknown network selector.
#[derive(Debug, thiserror::Error)]
#[error("unknown network {0:?}, expected \"mainnet\" or \"testnet\"")]
pub struct UnknownNetwork(String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" | "cronos-mainnet" => Ok(Network::CronosMainnet),
            "testnet" | "cronos-testnet" => Ok(Network::CronosTestnet),
            other => Err(UnknownNetwork(other.to_string())),
        }
    }
}

/// EIP-712 domain parameters of the payment asset contract.
///
/// These must match the values the verifying contract was deployed with,
/// byte for byte. A mismatch still produces a syntactically valid signature;
/// it is only rejected when the facilitator verifies it, with no way to
/// detect the problem locally. The Cronos USDC deployments use
/// `name = "Bridged USDC (Stargate)"`, `version = "1"` — not the
/// `"USD Coin"`/`"2"` pair used by native Circle deployments elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eip712DomainConfig {
    /// The token name as specified in the EIP-712 domain.
    pub name: String,
    /// The token version as specified in the EIP-712 domain.
    pub version: String,
}

impl Eip712DomainConfig {
    fn stargate_usdc() -> Self {
        Self {
            name: "Bridged USDC (Stargate)".into(),
            version: "1".into(),
        }
    }
}

/// Immutable per-network configuration bundle.
///
/// Constructed once at startup via [`NetworkProfile::mainnet`],
/// [`NetworkProfile::testnet`], or [`NetworkProfile::for_network`], then
/// passed by reference into the payment client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    /// Which network this profile describes.
    pub network: Network,
    /// The numeric EIP-155 chain id, part of the signing domain.
    pub chain_id: u64,
    /// JSON-RPC endpoint of the network.
    pub rpc_url: Url,
    /// Block explorer base URL.
    pub explorer_url: Url,
    /// The USDC contract used as the payment asset on this network.
    pub asset: Address,
    /// EIP-712 domain parameters of the asset contract.
    pub eip712: Eip712DomainConfig,
}

impl NetworkProfile {
    /// Profile for Cronos mainnet (eip155:25), paying with Stargate-bridged
    /// USDC.e.
    pub fn mainnet() -> Self {
        Self {
            network: Network::CronosMainnet,
            chain_id: 25,
            rpc_url: static_url("https://evm.cronos.org"),
            explorer_url: static_url("https://explorer.cronos.org"),
            asset: address!("0xf951eC28187D9E5Ca673Da8FE6757E6f0Be5F77C"),
            eip712: Eip712DomainConfig::stargate_usdc(),
        }
    }

    /// Profile for Cronos testnet (eip155:338), paying with devUSDC.e.
    pub fn testnet() -> Self {
        Self {
            network: Network::CronosTestnet,
            chain_id: 338,
            rpc_url: static_url("https://evm-t3.cronos.org"),
            explorer_url: static_url("https://explorer.cronos.org/testnet"),
            asset: address!("0xc01efAaF7C5C61bEbFAeb358E1161b537b8bC0e0"),
            eip712: Eip712DomainConfig::stargate_usdc(),
        }
    }

    /// Returns the profile for the given network selector.
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::CronosMainnet => Self::mainnet(),
            Network::CronosTestnet => Self::testnet(),
        }
    }

    /// Replaces the EIP-712 domain parameters.
    ///
    /// The domain values are tied to a specific contract deployment, not to
    /// this client: a contract migration changes them without changing
    /// anything else here, so they are carried as configuration.
    pub fn with_eip712(mut self, eip712: Eip712DomainConfig) -> Self {
        self.eip712 = eip712;
        self
    }
}

fn static_url(s: &str) -> Url {
    Url::parse(s).expect("static URL is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_network_selectors() {
        assert_eq!(
            "mainnet".parse::<Network>().unwrap(),
            Network::CronosMainnet
        );
        assert_eq!(
            "cronos-testnet".parse::<Network>().unwrap(),
            Network::CronosTestnet
        );
        assert!("base-sepolia".parse::<Network>().is_err());
    }

    #[test]
    fn profiles_carry_expected_chain_ids() {
        assert_eq!(NetworkProfile::mainnet().chain_id, 25);
        assert_eq!(NetworkProfile::testnet().chain_id, 338);
    }

    #[test]
    fn default_domain_is_stargate_usdc() {
        let profile = NetworkProfile::testnet();
        assert_eq!(profile.eip712.name, "Bridged USDC (Stargate)");
        assert_eq!(profile.eip712.version, "1");
    }

    #[test]
    fn eip712_override_replaces_domain() {
        let profile = NetworkProfile::testnet().with_eip712(Eip712DomainConfig {
            name: "Migrated USDC".into(),
            version: "2".into(),
        });
        assert_eq!(profile.eip712.name, "Migrated USDC");
        assert_eq!(profile.eip712.version, "2");
    }
}
