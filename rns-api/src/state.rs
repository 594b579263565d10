//! App state: resolver, optional watch-only session, config.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use rns_core::error::Result;
use rns_resolver::{ResolverConfig, RnsResolver};
use rns_wallet::{SessionProvider, WatchOnlyWallet};
use tracing::warn;

#[derive(Clone, Debug, Default)]
pub struct ApiConfig {
    pub resolver: ResolverConfig,
    pub watch_address: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            resolver: ResolverConfig::from_env(),
            watch_address: std::env::var("RNS_WATCH_ADDRESS").ok(),
        }
    }
}

pub struct AppState {
    pub config: ApiConfig,
    pub resolver: RnsResolver,
    pub wallet: Option<SessionProvider<WatchOnlyWallet>>,
    started_at: OnceLock<Instant>,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let wallet = match &config.watch_address {
            Some(address) => Some(SessionProvider::new(WatchOnlyWallet::parse(
                address,
                Some(config.resolver.chain_id),
            )?)),
            None => None,
        };
        let session = wallet.as_ref().map(|w| w.reader());
        let resolver = RnsResolver::with_session(config.resolver.clone(), session)?;

        Ok(Self::from_parts(config, resolver, wallet))
    }

    pub fn from_parts(
        config: ApiConfig,
        resolver: RnsResolver,
        wallet: Option<SessionProvider<WatchOnlyWallet>>,
    ) -> Self {
        Self {
            config,
            resolver,
            wallet,
            started_at: OnceLock::new(),
        }
    }

    /// Starts the uptime clock. Later calls keep the first instant.
    pub fn mark_started(&self) {
        self.started_at.get_or_init(Instant::now);
    }

    /// Time since [`mark_started`](Self::mark_started); zero before it.
    pub fn uptime(&self) -> Duration {
        self.started_at
            .get()
            .map(Instant::elapsed)
            .unwrap_or_default()
    }

    /// Connects the configured watch-only account, if any.
    pub async fn connect_wallet(&self) {
        if let Some(wallet) = &self.wallet {
            if let Err(e) = wallet.connect().await {
                warn!(error = %e, "Watch-only wallet not connected");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptime_counts_from_start() {
        let state = AppState::new(ApiConfig::default()).unwrap();
        assert_eq!(state.uptime(), Duration::ZERO);

        state.mark_started();
        std::thread::sleep(Duration::from_millis(20));
        let first = state.uptime();
        state.mark_started();

        assert!(first >= Duration::from_millis(20));
        assert!(state.uptime() >= first);
    }
}
