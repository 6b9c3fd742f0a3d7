// Phantom NFT Ledger - Core Types
// This module defines the data structures shared by all ledger operations.

use crate::crypto::Address;
use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use indexmap::IndexSet;
use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer as SerdeSerializer};
use std::{
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

use super::error::LedgerError;
use super::{MAX_AUTHORIZED_ADDRESSES, MAX_SYMBOL_LENGTH};

// ========================================
// Token Identifier
// ========================================

/// A token identifier: the token symbol bytes followed by the monotonic
/// counter value and a short transaction-entropy digest. The embedded counter
/// alone makes identifiers unique for the lifetime of the ledger.
#[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct TokenId(Vec<u8>);

impl TokenId {
    pub fn new(bytes: Vec<u8>) -> Self {
        TokenId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl FromStr for TokenId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| "Invalid hex string")?;
        Ok(TokenId::new(bytes))
    }
}

impl Display for TokenId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", &self.to_hex())
    }
}

impl Serializer for TokenId {
    fn write(&self, writer: &mut Writer) {
        writer.write_u16(self.0.len() as u16);
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let len = reader.read_u16()? as usize;
        let bytes = reader.read_bytes(len)?;
        Ok(TokenId::new(bytes.to_vec()))
    }
}

impl Serialize for TokenId {
    fn serialize<S: SerdeSerializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        TokenId::from_str(&hex).map_err(SerdeError::custom)
    }
}

// ========================================
// Authorized Address List
// ========================================

// Stored as a length-marked list; uniqueness is enforced on insert, so a
// stored list carrying duplicates is corrupt.
impl Serializer for IndexSet<Address> {
    fn write(&self, writer: &mut Writer) {
        writer.write_u16(self.len() as u16);
        for address in self {
            address.write(writer);
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let len = reader.read_u16()? as usize;
        if len > MAX_AUTHORIZED_ADDRESSES {
            return Err(ReaderError::InvalidSize);
        }
        let mut set = IndexSet::with_capacity(len);
        for _ in 0..len {
            let address = Address::read(reader)?;
            if !set.insert(address) {
                return Err(ReaderError::InvalidValue);
            }
        }
        Ok(set)
    }
}

// ========================================
// Contract Configuration
// ========================================

/// Immutable contract settings fixed at embedding time.
///
/// Mutable configuration (mint fee, authorized-address list, deployed flag)
/// lives in storage and is only changed through authorized operations; there
/// are no ambient globals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Contract owner address
    pub owner: Address,

    /// Token symbol (1-8 uppercase ASCII letters or digits)
    pub symbol: String,

    /// Mint fee installed at deploy time
    pub deploy_fee: u64,
}

impl ContractConfig {
    pub fn new(owner: Address, symbol: impl Into<String>, deploy_fee: u64) -> Self {
        Self {
            owner,
            symbol: symbol.into(),
            deploy_fee,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.symbol.is_empty() {
            return Err(LedgerError::InvalidSymbol);
        }
        if self.symbol.len() > MAX_SYMBOL_LENGTH {
            return Err(LedgerError::SymbolTooLong);
        }
        if !self
            .symbol
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(LedgerError::InvalidSymbol);
        }
        if self.owner.is_zero() {
            return Err(LedgerError::InvalidSymbol);
        }
        Ok(())
    }
}

// ========================================
// Events
// ========================================

/// Notifications handed to the external event sink after a state change has
/// been committed. Fire-and-forget: the ledger never observes a result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Token moved between accounts. `from` is None on mint, `to` is None on
    /// burn. Emitted for self-transfers too.
    Transfer {
        from: Option<Address>,
        to: Option<Address>,
        amount: u64,
        token: TokenId,
    },

    /// Token created
    Mint {
        creator: Address,
        token: TokenId,
        token_uri: String,
        fees: u64,
    },

    /// Authorized-address list changed
    Auth { address: Address, added: bool },

    /// Mint fee reconfigured
    MintFeeUpdated { value: i64 },

    /// Accumulated fees paid out
    MintFeesWithdrawn { to: Address, value: u64 },

    /// One-time contract initialization
    Deploy { owner: Address, symbol: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::ADDRESS_SIZE;

    #[test]
    fn test_token_id_hex_roundtrip() {
        let id = TokenId::new(b"GHOST\x00\x00\x00\x00\x00\x00\x00\x01".to_vec());
        let parsed = TokenId::from_str(&id.to_hex()).expect("valid hex");
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_token_id_serializer_roundtrip() {
        let id = TokenId::new(vec![1, 2, 3, 4]);
        let bytes = id.to_bytes();
        let decoded = TokenId::from_bytes(&bytes).expect("decode failed");
        assert_eq!(id, decoded);
    }

    #[test]
    fn test_config_validation() {
        let owner = Address::new([9u8; ADDRESS_SIZE]);

        let config = ContractConfig::new(owner, "PHNTM", 0);
        assert!(config.validate().is_ok());

        let config = ContractConfig::new(owner, "", 0);
        assert_eq!(config.validate(), Err(LedgerError::InvalidSymbol));

        let config = ContractConfig::new(owner, "TOOLONGSYM", 0);
        assert_eq!(config.validate(), Err(LedgerError::SymbolTooLong));

        let config = ContractConfig::new(owner, "lower", 0);
        assert_eq!(config.validate(), Err(LedgerError::InvalidSymbol));

        let config = ContractConfig::new(Address::zero(), "PHNTM", 0);
        assert!(config.validate().is_err());
    }
}
