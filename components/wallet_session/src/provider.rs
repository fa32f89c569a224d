use crate::chain::{ChainId, ChainProfile, MintContract};
use async_trait::async_trait;
use playlist_primitives::{StorageUri, TxHash, SONGS_PER_PLAYLIST};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Wallet account address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display, e.g. `0x231B…Fb62`
    pub fn short(&self) -> String {
        if self.0.len() > 10 {
            format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One element of the fixed-size song array the mint function takes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongEntry {
    pub title: String,
    pub storage_uri: StorageUri,
}

/// Error reported by the injected provider, classified by the
/// provider-supplied code where one is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("request rejected by the user")]
    Rejected,

    #[error("a wallet request is already pending")]
    RequestPending,

    #[error("wallet internal error")]
    Internal,

    #[error("the requested chain is not known to the wallet")]
    UnknownChain,

    #[error("transaction reverted: {0}")]
    Reverted(String),

    #[error("provider transport error: {0}")]
    Transport(String),

    #[error("provider error {code}: {message}")]
    Other { code: i64, message: String },
}

impl ProviderError {
    pub const CODE_REJECTED: i64 = 4001;
    pub const CODE_UNKNOWN_CHAIN: i64 = 4902;
    pub const CODE_REQUEST_PENDING: i64 = -32002;
    pub const CODE_INTERNAL: i64 = -32603;

    /// Map a raw provider error code to the classified variant
    pub fn from_code(code: i64, message: impl Into<String>) -> Self {
        match code {
            Self::CODE_REJECTED => ProviderError::Rejected,
            Self::CODE_REQUEST_PENDING => ProviderError::RequestPending,
            Self::CODE_INTERNAL => ProviderError::Internal,
            Self::CODE_UNKNOWN_CHAIN => ProviderError::UnknownChain,
            code => ProviderError::Other {
                code,
                message: message.into(),
            },
        }
    }
}

/// Capability surface of an injected browser wallet.
///
/// The host shell adapts the real injected object to this trait; tests
/// substitute a stub. Absence of a wallet is represented by constructing
/// the session without a provider, not by a failing implementation.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the user has already authorized, without prompting
    async fn authorized_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Prompt the user for account access
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Ask the wallet to switch to the given chain
    async fn switch_chain(&self, chain_id: &ChainId) -> Result<(), ProviderError>;

    /// Ask the wallet to add a chain it does not know yet
    async fn add_chain(&self, profile: &ChainProfile) -> Result<(), ProviderError>;

    /// Quote the fixed mint price, in native base units
    async fn mint_price(&self, contract: &MintContract) -> Result<u128, ProviderError>;

    /// Submit the payable mint transaction with the quoted value
    /// attached and await its confirmation, returning the transaction
    /// reference.
    async fn submit_mint(
        &self,
        contract: &MintContract,
        songs: &[SongEntry; SONGS_PER_PLAYLIST],
        metadata_uri: &str,
        value: u128,
    ) -> Result<TxHash, ProviderError>;
}
