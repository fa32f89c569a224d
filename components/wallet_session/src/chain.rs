use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex-encoded chain identifier, e.g. `0x279f`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Target network descriptor, in the shape wallets expect when asked to
/// add an unrecognized chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProfile {
    pub chain_id: ChainId,
    pub name: String,
    pub rpc_urls: Vec<String>,
    pub currency: NativeCurrency,
    pub explorer_urls: Vec<String>,
}

impl ChainProfile {
    /// The network playlist NFTs are minted on
    pub fn monad_testnet() -> Self {
        Self {
            chain_id: ChainId::new("0x279F"),
            name: "Monad Testnet".to_string(),
            rpc_urls: vec!["https://testnet-rpc.monad.xyz".to_string()],
            currency: NativeCurrency {
                name: "MON".to_string(),
                symbol: "MON".to_string(),
                decimals: 18,
            },
            explorer_urls: vec!["https://testnet-explorer.monad.xyz".to_string()],
        }
    }
}

/// Deployed playlist contract to mint against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintContract {
    pub address: String,
}

impl MintContract {
    pub const DEFAULT_ADDRESS: &'static str = "0x231B66aDB7A9E83a409C522eDf029CCA0E53Fb62";
    pub const ADDRESS_ENV: &'static str = "PODS_CONTRACT_ADDRESS";

    /// Contract address from the environment, falling back to the
    /// deployed default
    pub fn from_env() -> Self {
        let address = std::env::var(Self::ADDRESS_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_ADDRESS.to_string());
        Self { address }
    }
}

impl Default for MintContract {
    fn default() -> Self {
        Self {
            address: Self::DEFAULT_ADDRESS.to_string(),
        }
    }
}
