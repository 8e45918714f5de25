//! Account and User records
//!
//! Plain state loaded from and written back to the stores.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{balance_limit, Amount, AmountError};

/// Durable balance record keyed by its owner's user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: i64,
    user_id: i64,
    balance: Decimal,
}

impl Account {
    pub fn new(id: i64, user_id: i64, balance: Decimal) -> Self {
        Self {
            id,
            user_id,
            balance,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    // Balances only move through the ledger service.

    pub(crate) fn credit(&mut self, amount: &Amount) -> Result<(), AmountError> {
        let balance = self
            .balance
            .checked_add(amount.value())
            .filter(|balance| *balance < balance_limit())
            .ok_or(AmountError::BalanceOutOfRange)?;

        self.balance = balance;
        Ok(())
    }

    pub(crate) fn debit(&mut self, amount: &Amount) -> Result<(), AmountError> {
        let balance = self
            .balance
            .checked_sub(amount.value())
            .ok_or(AmountError::BalanceOutOfRange)?;

        self.balance = balance;
        Ok(())
    }
}

/// Registered user, as stored.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User about to be registered. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
