//! Session ownership.
//!
//! One [`SessionProvider`] owns the session; everything else holds a
//! [`SessionReader`] and can only observe it.

use tokio::sync::watch;
use tracing::{info, instrument, warn};

use rns_core::error::{Result, RnsError};
use rns_core::traits::WalletProvider;
use rns_core::types::{Address, WalletAccount, WalletSession};

/// Owns the wallet session for its lifetime.
///
/// The session starts disconnected. Dropping the provider tears it down:
/// readers observe a disconnected session afterwards.
pub struct SessionProvider<P: WalletProvider> {
    provider: P,
    sender: watch::Sender<WalletSession>,
}

impl<P: WalletProvider> SessionProvider<P> {
    /// Wraps `provider` with a fresh, disconnected session.
    pub fn new(provider: P) -> Self {
        let (sender, _) = watch::channel(WalletSession::default());
        Self { provider, sender }
    }

    /// Name of the underlying wallet.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Read-only view of the session.
    pub fn reader(&self) -> SessionReader {
        SessionReader {
            receiver: self.sender.subscribe(),
        }
    }

    /// Current session.
    pub fn session(&self) -> WalletSession {
        self.sender.borrow().clone()
    }

    /// Asks the wallet for an account.
    ///
    /// On failure the session is left disconnected with the error recorded,
    /// and the error is returned.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn connect(&self) -> Result<WalletAccount> {
        match self.provider.connect().await {
            Ok(account) => {
                info!(address = %account.address, chain_id = ?account.chain_id, "Wallet connected");
                self.sender.send_replace(WalletSession::connected(account));
                Ok(account)
            }
            Err(e) => {
                warn!(error = %e, "Wallet connection failed");
                self.sender.send_replace(WalletSession::failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Releases the account and clears the session.
    ///
    /// The session is cleared even if the wallet reports an error.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn disconnect(&self) -> Result<()> {
        self.sender.send_replace(WalletSession::default());
        info!("Wallet disconnected");
        self.provider.disconnect().await
    }
}

impl<P: WalletProvider> Drop for SessionProvider<P> {
    fn drop(&mut self) {
        self.sender.send_replace(WalletSession::default());
    }
}

/// Read-only handle to a session.
#[derive(Clone, Debug)]
pub struct SessionReader {
    receiver: watch::Receiver<WalletSession>,
}

impl SessionReader {
    /// A reader fixed to `session`, with no provider behind it.
    pub fn detached(session: WalletSession) -> Self {
        let (_, receiver) = watch::channel(session);
        Self { receiver }
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> WalletSession {
        self.receiver.borrow().clone()
    }

    /// Whether an account is connected.
    pub fn is_connected(&self) -> bool {
        self.receiver.borrow().is_connected
    }

    /// Connected account, if any.
    pub fn address(&self) -> Option<Address> {
        let session = self.receiver.borrow();
        session.address.filter(|_| session.is_connected)
    }

    /// Chain of the connected wallet, if known.
    pub fn chain_id(&self) -> Option<u64> {
        let session = self.receiver.borrow();
        session.chain_id.filter(|_| session.is_connected)
    }

    /// The connected account, or `SessionMissing`.
    pub fn require_address(&self) -> Result<Address> {
        self.address().ok_or_else(|| {
            RnsError::SessionMissing("no wallet account is connected".into())
        })
    }

    /// Waits for the next session change.
    ///
    /// Fails once the owning provider is gone and no change is pending.
    pub async fn changed(&mut self) -> Result<()> {
        self.receiver
            .changed()
            .await
            .map_err(|_| RnsError::SessionMissing("session provider was dropped".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedWallet(Option<WalletAccount>);

    #[async_trait]
    impl WalletProvider for FixedWallet {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn connect(&self) -> Result<WalletAccount> {
            self.0
                .ok_or_else(|| RnsError::WalletError("user rejected the request".into()))
        }

        async fn disconnect(&self) -> Result<()> {
            Ok(())
        }
    }

    fn account() -> WalletAccount {
        WalletAccount {
            address: Address::from_array([0xab; 20]),
            chain_id: Some(31337),
        }
    }

    #[tokio::test]
    async fn test_starts_disconnected() {
        let provider = SessionProvider::new(FixedWallet(Some(account())));
        let reader = provider.reader();

        assert!(!reader.is_connected());
        assert!(reader.address().is_none());
        assert!(matches!(
            reader.require_address(),
            Err(RnsError::SessionMissing(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_updates_readers() {
        let provider = SessionProvider::new(FixedWallet(Some(account())));
        let reader = provider.reader();

        provider.connect().await.unwrap();

        assert!(reader.is_connected());
        assert_eq!(reader.address(), Some(account().address));
        assert_eq!(reader.chain_id(), Some(31337));
        assert_eq!(reader.require_address().unwrap(), account().address);
    }

    #[tokio::test]
    async fn test_connect_failure_records_error() {
        let provider = SessionProvider::new(FixedWallet(None));
        let reader = provider.reader();

        let err = provider.connect().await.unwrap_err();

        assert!(matches!(err, RnsError::WalletError(_)));
        let session = reader.snapshot();
        assert!(!session.is_connected);
        assert!(session.error.unwrap().contains("rejected"));
    }

    #[tokio::test]
    async fn test_disconnect_clears_session() {
        let provider = SessionProvider::new(FixedWallet(Some(account())));
        let reader = provider.reader();
        provider.connect().await.unwrap();

        provider.disconnect().await.unwrap();

        assert_eq!(reader.snapshot(), WalletSession::default());
    }

    #[tokio::test]
    async fn test_drop_tears_down_session() {
        let provider = SessionProvider::new(FixedWallet(Some(account())));
        let mut reader = provider.reader();
        provider.connect().await.unwrap();
        reader.changed().await.unwrap();

        drop(provider);

        assert!(!reader.is_connected());
        reader.changed().await.unwrap();
        assert!(reader.changed().await.is_err());
    }

    #[tokio::test]
    async fn test_changed_wakes_on_connect() {
        let provider = SessionProvider::new(FixedWallet(Some(account())));
        let mut reader = provider.reader();

        let waiter = tokio::spawn(async move {
            reader.changed().await.unwrap();
            reader.address()
        });
        provider.connect().await.unwrap();

        assert_eq!(waiter.await.unwrap(), Some(account().address));
    }

    #[test]
    fn test_detached_reader() {
        let reader = SessionReader::detached(WalletSession::connected(account()));
        assert_eq!(reader.address(), Some(account().address));

        let empty = SessionReader::detached(WalletSession::default());
        assert!(empty.require_address().is_err());
    }
}
