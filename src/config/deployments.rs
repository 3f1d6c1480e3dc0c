//! Network identifiers and the static deployment registry.
//!
//! Each supported network maps to the address of the link registry contract
//! deployed there. Localhost and devnet carry no static deployment; callers
//! on those networks must configure the address explicitly.

use alloy::primitives::{address, Address};
use std::fmt;
use std::str::FromStr;

use crate::error::LinkError;

const MAINNET_LINK_REGISTRY: Address = address!("0x8f5B2b7608e3E3a3Dc0426C3396420FbF1849454");
const TESTNET_LINK_REGISTRY: Address = address!("0xD16C2F1D1858585133317B9cBdC32D1f8f8a1d27");

/// Networks this SDK knows deployments for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Localhost,
}

impl Network {
    /// Chain id used for EIP-155 replay protection on this network.
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 2151,
            Network::Testnet => 2019,
            Network::Devnet => 24_680,
            Network::Localhost => 31_337,
        }
    }

    /// Resolve a network from a numeric chain id.
    pub fn from_chain_id(chain_id: u64) -> Result<Self, LinkError> {
        match chain_id {
            2151 => Ok(Network::Mainnet),
            2019 => Ok(Network::Testnet),
            24_680 => Ok(Network::Devnet),
            31_337 => Ok(Network::Localhost),
            other => Err(LinkError::UnsupportedNetwork(other.to_string())),
        }
    }

    /// Link registry address deployed on this network, if any.
    pub fn link_address(&self) -> Option<Address> {
        match self {
            Network::Mainnet => Some(MAINNET_LINK_REGISTRY),
            Network::Testnet => Some(TESTNET_LINK_REGISTRY),
            Network::Devnet | Network::Localhost => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localhost => "localhost",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localhost" => Ok(Network::Localhost),
            other => Err(LinkError::UnsupportedNetwork(other.to_string())),
        }
    }
}
