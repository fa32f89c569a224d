mod chain;
mod error;
mod provider;
mod session;

pub use chain::{ChainId, ChainProfile, MintContract, NativeCurrency};
pub use error::WalletError;
pub use provider::{Address, ProviderError, SongEntry, WalletProvider};
pub use session::{WalletSession, WalletStatus};
