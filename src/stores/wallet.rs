//! Wallet store
//!
//! Placeholder for the TON Connect integration. Connecting only records the
//! address handed in and payments return a synthetic identifier; nothing is
//! signed or broadcast.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq)]
pub struct WalletConnection {
    pub address: String,
    pub connected_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct WalletState {
    wallet: Option<WalletConnection>,
    user_friendly_address: String,
}

#[derive(Debug, Default)]
pub struct WalletStore {
    state: RwLock<WalletState>,
}

impl WalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.state.read().wallet.is_some()
    }

    pub fn wallet(&self) -> Option<WalletConnection> {
        self.state.read().wallet.clone()
    }

    /// Empty while disconnected
    pub fn user_friendly_address(&self) -> String {
        self.state.read().user_friendly_address.clone()
    }

    pub async fn connect(&self, address: &str) -> ClientResult<()> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ClientError::InvalidInput("wallet address is empty".to_string()));
        }
        info!("Connecting wallet {}", address);

        let mut state = self.state.write();
        state.wallet = Some(WalletConnection {
            address: address.to_string(),
            connected_at: Utc::now(),
        });
        state.user_friendly_address = address.to_string();
        Ok(())
    }

    pub async fn disconnect(&self) {
        let mut state = self.state.write();
        state.wallet = None;
        state.user_friendly_address.clear();
    }

    /// Returns the transaction hash to pass to the join call
    pub async fn send_payment(&self, amount_ton: f64, memo: &str) -> ClientResult<String> {
        if !self.is_connected() {
            return Err(ClientError::WalletNotConnected);
        }
        if !amount_ton.is_finite() || amount_ton <= 0.0 {
            return Err(ClientError::InvalidInput(format!("invalid payment amount: {}", amount_ton)));
        }

        warn!("Payment of {} TON ({}) not broadcast: wallet integration is a stub", amount_ton, memo);
        Ok(format!("tx_hash_{}", Utc::now().timestamp_millis()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_payment_requires_connection() {
        let wallet = WalletStore::new();
        assert!(!wallet.is_connected());
        assert!(matches!(
            wallet.send_payment(1.0, "raffle:1").await,
            Err(ClientError::WalletNotConnected)
        ));
    }

    #[tokio::test]
    async fn test_connect_pay_disconnect() {
        let wallet = WalletStore::new();
        wallet.connect("  UQBvW8Z5huBkMJYdnfAEM5JqTNkuWX3diqYENkWsIL0XggGG ").await.unwrap();
        assert!(wallet.is_connected());
        assert_eq!(wallet.user_friendly_address(), "UQBvW8Z5huBkMJYdnfAEM5JqTNkuWX3diqYENkWsIL0XggGG");

        let tx_hash = wallet.send_payment(2.0, "raffle:2").await.unwrap();
        let millis = tx_hash.strip_prefix("tx_hash_").unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);

        assert!(matches!(wallet.send_payment(0.0, "raffle:2").await, Err(ClientError::InvalidInput(_))));
        assert!(matches!(wallet.send_payment(f64::NAN, "raffle:2").await, Err(ClientError::InvalidInput(_))));

        wallet.disconnect().await;
        assert!(!wallet.is_connected());
        assert!(wallet.user_friendly_address().is_empty());
        assert!(wallet.wallet().is_none());
    }

    #[tokio::test]
    async fn test_empty_address_rejected() {
        let wallet = WalletStore::new();
        assert!(matches!(wallet.connect("   ").await, Err(ClientError::InvalidInput(_))));
        assert!(!wallet.is_connected());
    }
}
