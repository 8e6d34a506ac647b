//! Payer wallet connection

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    #[error("No wallet configured")]
    NotConfigured,

    #[error("Malformed wallet address '{address}': expected 0x followed by 40 hex digits")]
    MalformedAddress { address: String },
}

/// A checked EVM address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(address: &str) -> Result<Self, WalletError> {
        let address = address.trim();
        let valid = address
            .strip_prefix("0x")
            .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()));
        if valid {
            Ok(Self(address.to_string()))
        } else {
            Err(WalletError::MalformedAddress {
                address: address.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x1234...abcd`
    pub fn short(&self) -> String {
        crate::short_hash(&self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Connects the device to its payer wallet
#[derive(Debug, Clone, Default)]
pub struct WalletConnector {
    configured: Option<String>,
}

impl WalletConnector {
    pub fn new(configured: Option<String>) -> Self {
        Self {
            configured: configured.filter(|a| !a.trim().is_empty()),
        }
    }

    pub fn connect(&self) -> Result<WalletAddress, WalletError> {
        let address = self.configured.as_deref().ok_or(WalletError::NotConfigured)?;
        let wallet = WalletAddress::parse(address)?;
        tracing::info!(wallet = %wallet.short(), "Wallet connected");
        Ok(wallet)
    }
}
