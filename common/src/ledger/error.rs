// Phantom NFT Ledger - Error Codes
// This module defines all error codes for ledger operations.
//
// Error Code Ranges:
// - 100-199: Token errors
// - 200-299: Permission errors
// - 300-399: Input validation errors
// - 400-499: Fee and authority errors
// - 900-999: System errors
//
// Authorization failures on transfer/burn/deploy are NOT errors: those
// operations return Ok(false) without touching state. Errors abort the
// whole operation with no state change.

use thiserror::Error;

use crate::serializer::ReaderError;

/// Ledger operation result type
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger error type with numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[repr(u64)]
pub enum LedgerError {
    // ========================================
    // Token errors (100-199)
    // ========================================
    #[error("Token not found")]
    TokenNotFound = 100,

    // ========================================
    // Permission errors (200-299)
    // ========================================
    #[error("Unauthorized")]
    Unauthorized = 200,

    #[error("Prohibited access to locked content")]
    AccessDenied = 201,

    // ========================================
    // Input validation errors (300-399)
    // ========================================
    #[error("Invalid symbol")]
    InvalidSymbol = 300,

    #[error("Symbol too long")]
    SymbolTooLong = 301,

    #[error("Batch length mismatch")]
    LengthMismatch = 302,

    #[error("Mint fee can't be negative")]
    InvalidMintFee = 303,

    // ========================================
    // Fee and authority errors (400-499)
    // ========================================
    #[error("Fee payment failed")]
    FeePaymentFailed = 400,

    #[error("Address is not authorized")]
    AuthorizedAddressNotFound = 401,

    #[error("Authorized address list is full")]
    AuthorizedListFull = 402,

    // ========================================
    // System errors (900-999)
    // ========================================
    #[error("Arithmetic overflow")]
    Overflow = 900,

    #[error("Storage error")]
    Storage = 901,

    #[error("Encoding error")]
    Encoding = 902,
}

impl LedgerError {
    /// Get the numeric error code
    #[inline]
    pub fn code(&self) -> u64 {
        *self as u64
    }

    /// Create error from numeric code
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            100 => Some(Self::TokenNotFound),
            200 => Some(Self::Unauthorized),
            201 => Some(Self::AccessDenied),
            300 => Some(Self::InvalidSymbol),
            301 => Some(Self::SymbolTooLong),
            302 => Some(Self::LengthMismatch),
            303 => Some(Self::InvalidMintFee),
            400 => Some(Self::FeePaymentFailed),
            401 => Some(Self::AuthorizedAddressNotFound),
            402 => Some(Self::AuthorizedListFull),
            900 => Some(Self::Overflow),
            901 => Some(Self::Storage),
            902 => Some(Self::Encoding),
            _ => None,
        }
    }
}

impl From<ReaderError> for LedgerError {
    fn from(_: ReaderError) -> Self {
        LedgerError::Encoding
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(_: serde_json::Error) -> Self {
        LedgerError::Encoding
    }
}
