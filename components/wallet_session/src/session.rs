use crate::chain::{ChainId, ChainProfile, MintContract};
use crate::error::WalletError;
use crate::provider::{Address, ProviderError, SongEntry, WalletProvider};
use parking_lot::RwLock;
use playlist_primitives::{TxHash, SONGS_PER_PLAYLIST};
use std::sync::Arc;

/// Connection lifecycle of the wallet session.
///
/// `Connecting` and `Minting` are transient phases; operations that do
/// not match their expected source phase are rejected (or ignored, for
/// the duplicate-connect case) rather than queued.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Disconnected,
    Connecting,
    Connected(Address),
    Minting(Address),
}

struct SessionState {
    phase: Phase,
    last_error: Option<WalletError>,
}

/// Snapshot of the session state for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletStatus {
    pub connected: bool,
    pub account: Option<Address>,
    pub connecting: bool,
    pub minting: bool,
    pub last_error: Option<String>,
}

/// Per-tab wallet connection state machine.
///
/// Wraps an injected [`WalletProvider`] capability; a missing wallet
/// extension is a handled error state, never a crash. The phase flags
/// are UI-level re-entrancy guards against repeated user interaction,
/// not locks: they reject duplicate in-flight operations but make no
/// guarantee against adversarial concurrent callers.
pub struct WalletSession {
    provider: Option<Arc<dyn WalletProvider>>,
    chain: ChainProfile,
    contract: MintContract,
    state: RwLock<SessionState>,
}

impl WalletSession {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        chain: ChainProfile,
        contract: MintContract,
    ) -> Self {
        Self::build(Some(provider), chain, contract)
    }

    /// Session for an environment without a wallet extension
    pub fn without_provider(chain: ChainProfile, contract: MintContract) -> Self {
        Self::build(None, chain, contract)
    }

    fn build(
        provider: Option<Arc<dyn WalletProvider>>,
        chain: ChainProfile,
        contract: MintContract,
    ) -> Self {
        Self {
            provider,
            chain,
            contract,
            state: RwLock::new(SessionState {
                phase: Phase::Disconnected,
                last_error: None,
            }),
        }
    }

    pub fn chain(&self) -> &ChainProfile {
        &self.chain
    }

    pub fn contract(&self) -> &MintContract {
        &self.contract
    }

    pub fn status(&self) -> WalletStatus {
        let st = self.state.read();
        let (connected, account, connecting, minting) = match &st.phase {
            Phase::Disconnected => (false, None, false, false),
            Phase::Connecting => (false, None, true, false),
            Phase::Connected(account) => (true, Some(account.clone()), false, false),
            Phase::Minting(account) => (true, Some(account.clone()), false, true),
        };
        WalletStatus {
            connected,
            account,
            connecting,
            minting,
            last_error: st.last_error.as_ref().map(|e| e.to_string()),
        }
    }

    /// Startup probe: adopt an already-authorized account without
    /// prompting the user. Query failures are logged and leave the
    /// session disconnected.
    pub async fn check_connection(&self) -> WalletStatus {
        if let Some(provider) = self.provider.clone() {
            let disconnected = matches!(self.state.read().phase, Phase::Disconnected);
            if disconnected {
                match provider.authorized_accounts().await {
                    Ok(accounts) => {
                        if let Some(account) = accounts.first() {
                            tracing::info!(account = %account, "restored existing wallet authorization");
                            self.state.write().phase = Phase::Connected(account.clone());
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to query authorized accounts");
                    }
                }
            }
        }
        self.status()
    }

    /// Connect the wallet, prompting for permission when needed.
    ///
    /// A duplicate call while a connection attempt is in flight is a
    /// no-op. The best-effort switch to the target network cannot fail
    /// the connection itself.
    pub async fn connect(&self) -> Result<(), WalletError> {
        let Some(provider) = self.provider.clone() else {
            return self.record_err(WalletError::ProviderMissing);
        };

        {
            let mut st = self.state.write();
            if matches!(st.phase, Phase::Connecting | Phase::Minting(_)) {
                tracing::debug!("wallet operation already in progress, ignoring connect");
                return Ok(());
            }
            st.phase = Phase::Connecting;
            st.last_error = None;
        }

        match self.establish(&provider).await {
            Ok(account) => {
                tracing::info!(account = %account, "wallet connected");
                self.state.write().phase = Phase::Connected(account);
                Ok(())
            }
            Err(err) => {
                let mut st = self.state.write();
                st.phase = Phase::Disconnected;
                st.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    async fn establish(&self, provider: &Arc<dyn WalletProvider>) -> Result<Address, WalletError> {
        // Short-circuit on an existing authorization before prompting
        let existing = provider.authorized_accounts().await?;
        if let Some(account) = existing.first() {
            tracing::debug!(account = %account, "account already authorized");
            self.ensure_target_chain(provider).await;
            return Ok(account.clone());
        }

        let accounts = provider.request_accounts().await?;
        let account = accounts.first().cloned().ok_or(WalletError::NoAccounts)?;
        self.ensure_target_chain(provider).await;
        Ok(account)
    }

    /// External account change notification from the provider
    pub fn accounts_changed(&self, accounts: &[Address]) {
        let mut st = self.state.write();
        match accounts.first() {
            None => {
                tracing::info!("wallet disconnected externally");
                st.phase = Phase::Disconnected;
            }
            Some(account) => {
                tracing::info!(account = %account, "active account changed");
                st.phase = Phase::Connected(account.clone());
            }
        }
    }

    /// External network change notification from the provider.
    ///
    /// Re-asserts the target network on a spawned task so the event
    /// handler itself never blocks.
    pub fn chain_changed(self: &Arc<Self>, chain_id: ChainId) {
        if chain_id == self.chain.chain_id {
            return;
        }
        tracing::info!(chain = %chain_id, "wallet switched networks, re-asserting target chain");
        let session = Arc::clone(self);
        tokio::spawn(async move {
            if let Some(provider) = session.provider.clone() {
                session.ensure_target_chain(&provider).await;
            }
        });
    }

    /// Mint a playlist NFT with the fixed 12-entry song array.
    ///
    /// Preconditions (connected; exactly 12 entries) fail fast before
    /// any provider call. The session transitions through `Minting` and
    /// always returns to `Connected`, success or failure.
    pub async fn mint_playlist_nft(
        &self,
        songs: Vec<SongEntry>,
        metadata_uri: &str,
    ) -> Result<TxHash, WalletError> {
        let phase = self.state.read().phase.clone();
        let account = match phase {
            Phase::Connected(account) => account,
            Phase::Minting(_) => return self.record_err(WalletError::MintInProgress),
            _ => return self.record_err(WalletError::NotConnected),
        };

        if songs.len() != SONGS_PER_PLAYLIST {
            return self.record_err(WalletError::WrongSongCount {
                actual: songs.len(),
            });
        }
        let songs: [SongEntry; SONGS_PER_PLAYLIST] = match songs.try_into() {
            Ok(songs) => songs,
            Err(rest) => {
                return self.record_err(WalletError::WrongSongCount { actual: rest.len() })
            }
        };

        let Some(provider) = self.provider.clone() else {
            return self.record_err(WalletError::ProviderMissing);
        };

        {
            let mut st = self.state.write();
            // Re-check under the lock; another caller may have won
            if matches!(st.phase, Phase::Minting(_)) {
                drop(st);
                return self.record_err(WalletError::MintInProgress);
            }
            st.phase = Phase::Minting(account.clone());
            st.last_error = None;
        }

        let result = async {
            let price = provider.mint_price(&self.contract).await?;
            tracing::debug!(%price, "mint price quoted");
            provider
                .submit_mint(&self.contract, &songs, metadata_uri, price)
                .await
        }
        .await;

        // Whatever happened, the session is never left stuck in Minting
        self.state.write().phase = Phase::Connected(account);

        match result {
            Ok(tx) => {
                tracing::info!(tx = %tx, "playlist minted");
                Ok(tx)
            }
            Err(e) => {
                let err = WalletError::from(e);
                self.state.write().last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Best-effort switch to the target network; failure is logged and
    /// never propagated.
    async fn ensure_target_chain(&self, provider: &Arc<dyn WalletProvider>) {
        if let Err(e) = self.assert_chain(provider).await {
            tracing::warn!(
                error = %e,
                chain = %self.chain.chain_id,
                "failed to switch wallet to target network"
            );
        }
    }

    async fn assert_chain(&self, provider: &Arc<dyn WalletProvider>) -> Result<(), ProviderError> {
        match provider.switch_chain(&self.chain.chain_id).await {
            Ok(()) => Ok(()),
            // An unrecognized chain has to be added first, then
            // switched to again.
            Err(ProviderError::UnknownChain) | Err(ProviderError::Internal) => {
                provider.add_chain(&self.chain).await?;
                provider.switch_chain(&self.chain.chain_id).await
            }
            Err(other) => Err(other),
        }
    }

    fn record_err<T>(&self, err: WalletError) -> Result<T, WalletError> {
        self.state.write().last_error = Some(err.clone());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use playlist_primitives::StorageUri;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const PRICE: u128 = 120_000_000_000_000_000; // 0.12 in 18-decimal units

    struct ProviderStub {
        authorized: Mutex<Vec<Address>>,
        request_response: Mutex<Result<Vec<Address>, ProviderError>>,
        request_delay: Option<Duration>,
        switch_responses: Mutex<VecDeque<Result<(), ProviderError>>>,
        add_response: Mutex<Result<(), ProviderError>>,
        mint_response: Mutex<Result<TxHash, ProviderError>>,
        mint_delay: Option<Duration>,
        request_calls: AtomicUsize,
        switch_calls: AtomicUsize,
        add_calls: AtomicUsize,
        price_calls: AtomicUsize,
        mint_calls: AtomicUsize,
        last_mint_value: Mutex<Option<u128>>,
    }

    impl Default for ProviderStub {
        fn default() -> Self {
            Self {
                authorized: Mutex::new(Vec::new()),
                request_response: Mutex::new(Ok(vec![account()])),
                request_delay: None,
                switch_responses: Mutex::new(VecDeque::new()),
                add_response: Mutex::new(Ok(())),
                mint_response: Mutex::new(Ok(TxHash("0xdeadbeef00".to_string()))),
                mint_delay: None,
                request_calls: AtomicUsize::new(0),
                switch_calls: AtomicUsize::new(0),
                add_calls: AtomicUsize::new(0),
                price_calls: AtomicUsize::new(0),
                mint_calls: AtomicUsize::new(0),
                last_mint_value: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl WalletProvider for ProviderStub {
        async fn authorized_accounts(&self) -> Result<Vec<Address>, ProviderError> {
            Ok(self.authorized.lock().clone())
        }

        async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
            self.request_calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.request_delay;
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.request_response.lock().clone()
        }

        async fn switch_chain(&self, _chain_id: &ChainId) -> Result<(), ProviderError> {
            self.switch_calls.fetch_add(1, Ordering::SeqCst);
            self.switch_responses.lock().pop_front().unwrap_or(Ok(()))
        }

        async fn add_chain(&self, _profile: &ChainProfile) -> Result<(), ProviderError> {
            self.add_calls.fetch_add(1, Ordering::SeqCst);
            self.add_response.lock().clone()
        }

        async fn mint_price(&self, _contract: &MintContract) -> Result<u128, ProviderError> {
            self.price_calls.fetch_add(1, Ordering::SeqCst);
            Ok(PRICE)
        }

        async fn submit_mint(
            &self,
            _contract: &MintContract,
            _songs: &[SongEntry; SONGS_PER_PLAYLIST],
            _metadata_uri: &str,
            value: u128,
        ) -> Result<TxHash, ProviderError> {
            self.mint_calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.mint_delay;
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            *self.last_mint_value.lock() = Some(value);
            self.mint_response.lock().clone()
        }
    }

    fn account() -> Address {
        Address::new("0x231B66aDB7A9E83a409C522eDf029CCA0E53Fb62")
    }

    fn session_with(stub: ProviderStub) -> (Arc<WalletSession>, Arc<ProviderStub>) {
        let provider = Arc::new(stub);
        let session = Arc::new(WalletSession::new(
            provider.clone(),
            ChainProfile::monad_testnet(),
            MintContract::default(),
        ));
        (session, provider)
    }

    fn entries(count: usize) -> Vec<SongEntry> {
        (0..count)
            .map(|i| SongEntry {
                title: format!("Track {i}"),
                storage_uri: StorageUri::from_hash(format!("hash{i}")),
            })
            .collect()
    }

    #[tokio::test]
    async fn check_connection_adopts_authorized_account_without_prompt() {
        let stub = ProviderStub::default();
        *stub.authorized.lock() = vec![account()];
        let (session, provider) = session_with(stub);

        let status = session.check_connection().await;

        assert!(status.connected);
        assert_eq!(status.account, Some(account()));
        assert_eq!(provider.request_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn check_connection_without_authorization_stays_disconnected() {
        let (session, provider) = session_with(ProviderStub::default());

        let status = session.check_connection().await;

        assert!(!status.connected);
        assert_eq!(status.account, None);
        assert_eq!(provider.request_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_provider_is_a_handled_error() {
        let session = WalletSession::without_provider(
            ChainProfile::monad_testnet(),
            MintContract::default(),
        );

        let result = session.connect().await;

        assert_matches!(result, Err(WalletError::ProviderMissing));
        let status = session.status();
        assert!(!status.connected);
        assert_eq!(status.account, None);
        assert!(status.last_error.unwrap().contains("install"));
    }

    #[tokio::test]
    async fn connect_prompts_and_switches_network() {
        let (session, provider) = session_with(ProviderStub::default());

        session.connect().await.unwrap();

        let status = session.status();
        assert!(status.connected);
        assert!(!status.connecting);
        assert_eq!(status.account, Some(account()));
        assert_eq!(provider.request_calls.load(Ordering::SeqCst), 1);
        assert!(provider.switch_calls.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn connect_short_circuits_on_existing_authorization() {
        let stub = ProviderStub::default();
        *stub.authorized.lock() = vec![account()];
        let (session, provider) = session_with(stub);

        session.connect().await.unwrap();

        assert!(session.status().connected);
        assert_eq!(provider.request_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_connect_issues_one_permission_request() {
        let stub = ProviderStub {
            request_delay: Some(Duration::from_millis(50)),
            ..ProviderStub::default()
        };
        let (session, provider) = session_with(stub);

        let (a, b) = tokio::join!(session.connect(), session.connect());

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(provider.request_calls.load(Ordering::SeqCst), 1);
        assert!(session.status().connected);
    }

    #[tokio::test]
    async fn rejected_connection_returns_to_disconnected() {
        let stub = ProviderStub {
            request_response: Mutex::new(Err(ProviderError::Rejected)),
            ..ProviderStub::default()
        };
        let (session, _) = session_with(stub);

        let result = session.connect().await;

        assert_matches!(result, Err(WalletError::Rejected));
        let status = session.status();
        assert!(!status.connected && !status.connecting);
        assert_eq!(status.last_error.as_deref(), Some("user rejected the request"));
    }

    #[tokio::test]
    async fn empty_account_list_is_an_error() {
        let stub = ProviderStub {
            request_response: Mutex::new(Ok(Vec::new())),
            ..ProviderStub::default()
        };
        let (session, _) = session_with(stub);

        assert_matches!(session.connect().await, Err(WalletError::NoAccounts));
        assert!(!session.status().connected);
    }

    #[tokio::test]
    async fn unknown_chain_is_added_then_switched() {
        let stub = ProviderStub::default();
        stub.switch_responses
            .lock()
            .push_back(Err(ProviderError::UnknownChain));
        let (session, provider) = session_with(stub);

        session.connect().await.unwrap();

        assert_eq!(provider.add_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.switch_calls.load(Ordering::SeqCst), 2);
        assert!(session.status().connected);
    }

    #[tokio::test]
    async fn chain_switch_failure_does_not_fail_the_connection() {
        let stub = ProviderStub {
            add_response: Mutex::new(Err(ProviderError::Rejected)),
            ..ProviderStub::default()
        };
        stub.switch_responses
            .lock()
            .push_back(Err(ProviderError::UnknownChain));
        let (session, _) = session_with(stub);

        session.connect().await.unwrap();

        let status = session.status();
        assert!(status.connected);
        assert_eq!(status.last_error, None);
    }

    #[tokio::test]
    async fn mint_rejects_wrong_song_count_before_any_call() {
        let (session, provider) = session_with(ProviderStub::default());
        session.connect().await.unwrap();

        let result = session.mint_playlist_nft(entries(7), "data:...").await;

        assert_matches!(result, Err(WalletError::WrongSongCount { actual: 7 }));
        assert_eq!(provider.price_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.mint_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn mint_requires_a_connected_wallet() {
        let (session, provider) = session_with(ProviderStub::default());

        let result = session.mint_playlist_nft(entries(12), "data:...").await;

        assert_matches!(result, Err(WalletError::NotConnected));
        assert_eq!(provider.price_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn mint_attaches_the_quoted_price() {
        let (session, provider) = session_with(ProviderStub::default());
        session.connect().await.unwrap();

        let tx = session
            .mint_playlist_nft(entries(12), "data:...")
            .await
            .unwrap();

        assert_eq!(tx, TxHash("0xdeadbeef00".to_string()));
        assert_eq!(*provider.last_mint_value.lock(), Some(PRICE));
        let status = session.status();
        assert!(status.connected && !status.minting);
    }

    #[tokio::test]
    async fn rejected_mint_returns_to_connected() {
        let stub = ProviderStub {
            mint_response: Mutex::new(Err(ProviderError::Rejected)),
            ..ProviderStub::default()
        };
        let (session, _) = session_with(stub);
        session.connect().await.unwrap();

        let result = session.mint_playlist_nft(entries(12), "data:...").await;

        assert_matches!(result, Err(WalletError::Rejected));
        let status = session.status();
        assert!(!status.minting);
        assert!(status.connected);
        assert!(status.last_error.unwrap().contains("rejected"));
    }

    #[tokio::test]
    async fn reverted_mint_surfaces_the_reason_verbatim() {
        let stub = ProviderStub {
            mint_response: Mutex::new(Err(ProviderError::Reverted(
                "insufficient payment".to_string(),
            ))),
            ..ProviderStub::default()
        };
        let (session, _) = session_with(stub);
        session.connect().await.unwrap();

        let result = session.mint_playlist_nft(entries(12), "data:...").await;

        assert_matches!(result, Err(WalletError::Provider(reason)) if reason == "insufficient payment");
        assert!(session.status().connected);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_mint_is_rejected_while_one_is_in_flight() {
        let stub = ProviderStub {
            mint_delay: Some(Duration::from_millis(50)),
            ..ProviderStub::default()
        };
        let (session, provider) = session_with(stub);
        session.connect().await.unwrap();

        let (a, b) = tokio::join!(
            session.mint_playlist_nft(entries(12), "data:..."),
            session.mint_playlist_nft(entries(12), "data:...")
        );

        let results = [a, b];
        assert!(results.iter().any(|r| r.is_ok()));
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(WalletError::MintInProgress))));
        assert_eq!(provider.mint_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn external_account_changes_update_the_session() {
        let (session, _) = session_with(ProviderStub::default());
        session.connect().await.unwrap();

        let other = Address::new("0x0000000000000000000000000000000000000001");
        session.accounts_changed(&[other.clone()]);
        assert_eq!(session.status().account, Some(other));

        session.accounts_changed(&[]);
        let status = session.status();
        assert!(!status.connected);
        assert_eq!(status.account, None);
    }

    #[tokio::test(start_paused = true)]
    async fn chain_change_reasserts_target_network_in_background() {
        let (session, provider) = session_with(ProviderStub::default());

        session.chain_changed(ChainId::new("0x1"));
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(provider.switch_calls.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn chain_change_to_the_target_network_is_ignored() {
        let (session, provider) = session_with(ProviderStub::default());

        session.chain_changed(ChainId::new("0x279F"));
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(provider.switch_calls.load(Ordering::SeqCst), 0);
    }
}
