use crate::provider::ProviderError;
use thiserror::Error;

/// User-facing wallet failure, surfaced as status text.
///
/// Every failure is terminal for the current operation; nothing here is
/// retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("no wallet detected; please install a browser wallet to continue")]
    ProviderMissing,

    #[error("user rejected the request")]
    Rejected,

    #[error("a wallet request is already pending; check your wallet popup")]
    RequestPending,

    #[error("wallet internal error; please refresh and try again")]
    Internal,

    #[error("no accounts returned from wallet")]
    NoAccounts,

    #[error("wallet not connected")]
    NotConnected,

    #[error("a mint is already in progress")]
    MintInProgress,

    #[error("exactly 12 songs required, got {actual}")]
    WrongSongCount { actual: usize },

    #[error("{0}")]
    Provider(String),
}

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected => WalletError::Rejected,
            ProviderError::RequestPending => WalletError::RequestPending,
            ProviderError::Internal => WalletError::Internal,
            // No classified code applies: surface the provider's own
            // message verbatim.
            ProviderError::Reverted(reason) => WalletError::Provider(reason),
            other => WalletError::Provider(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classified_codes_map_to_user_messages() {
        assert_eq!(
            WalletError::from(ProviderError::Rejected),
            WalletError::Rejected
        );
        assert_eq!(
            WalletError::from(ProviderError::RequestPending),
            WalletError::RequestPending
        );
        assert_eq!(
            WalletError::from(ProviderError::Internal),
            WalletError::Internal
        );
    }

    #[test]
    fn unclassified_errors_surface_verbatim() {
        let err = WalletError::from(ProviderError::Reverted("price changed".to_string()));
        assert_eq!(err.to_string(), "price changed");
    }

    #[test]
    fn wrong_song_count_message_names_both_numbers() {
        let err = WalletError::WrongSongCount { actual: 7 };
        assert_eq!(err.to_string(), "exactly 12 songs required, got 7");
    }

    #[test]
    fn missing_provider_mentions_installation() {
        assert!(WalletError::ProviderMissing.to_string().contains("install"));
    }
}
