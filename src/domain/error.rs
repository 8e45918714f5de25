//! Domain Error Types
//!
//! Pure ledger errors that don't depend on infrastructure.

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use super::AmountError;

/// Ledger operation that moves money, used to word error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOperation {
    Deposit,
    Withdrawal,
    Transfer,
}

impl LedgerOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerOperation::Deposit => "deposit",
            LedgerOperation::Withdrawal => "withdrawal",
            LedgerOperation::Transfer => "transfer",
        }
    }

    /// Capitalized label for sentence starts
    pub fn title(&self) -> &'static str {
        match self {
            LedgerOperation::Deposit => "Deposit",
            LedgerOperation::Withdrawal => "Withdrawal",
            LedgerOperation::Transfer => "Transfer",
        }
    }
}

impl fmt::Display for LedgerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger faults.
///
/// A ledger operation that returns one of these has not touched any balance.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Amount is zero, negative, or not representable
    #[error("Invalid {operation} amount: {reason}")]
    InvalidAmount {
        operation: LedgerOperation,
        reason: AmountError,
    },

    /// Amount exceeds the balance it would be taken from
    #[error("{} amount exceeds your balance", .operation.title())]
    InsufficientFunds {
        operation: LedgerOperation,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Account not found for user {user_id}")]
    AccountNotFound { user_id: i64 },

    #[error("Sender account not found for user {user_id}")]
    SenderNotFound { user_id: i64 },

    #[error("Recipient account not found for user {user_id}")]
    RecipientNotFound { user_id: i64 },

    #[error("Cannot transfer to the same account")]
    SelfTransfer,
}

impl DomainError {
    pub fn invalid_amount(operation: LedgerOperation, reason: AmountError) -> Self {
        Self::InvalidAmount { operation, reason }
    }

    pub fn insufficient_funds(
        operation: LedgerOperation,
        requested: Decimal,
        available: Decimal,
    ) -> Self {
        Self::InsufficientFunds {
            operation,
            requested,
            available,
        }
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::AccountNotFound { .. } => "account_not_found",
            Self::SenderNotFound { .. } => "sender_not_found",
            Self::RecipientNotFound { .. } => "recipient_not_found",
            Self::SelfTransfer => "self_transfer",
        }
    }
}
