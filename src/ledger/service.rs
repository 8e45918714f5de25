//! Ledger Service
//!
//! Each operation loads the account row(s), checks its preconditions,
//! mutates the balance and persists. A failed precondition leaves every
//! balance untouched.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Account, Amount, AmountError, DomainError, LedgerOperation};
use crate::error::AppResult;
use crate::store::AccountStore;

/// Balances of both parties after a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransferResult {
    pub sender_balance: Decimal,
    pub recipient_balance: Decimal,
}

/// Ledger operations against an injected account store
#[derive(Clone)]
pub struct LedgerService {
    accounts: Arc<dyn AccountStore>,
}

impl LedgerService {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Credit `amount` to the account of `user_id` and return the new balance.
    pub async fn deposit(&self, user_id: i64, amount: Decimal) -> AppResult<Decimal> {
        let amount = validate(LedgerOperation::Deposit, amount)?;

        let mut account = self
            .accounts
            .find_by_user_id(user_id)
            .await?
            .ok_or(DomainError::AccountNotFound { user_id })?;

        account
            .credit(&amount)
            .map_err(|reason| out_of_range(LedgerOperation::Deposit, user_id, reason))?;
        self.accounts.save(&account).await?;

        tracing::info!(
            user_id,
            amount = %amount,
            balance = %account.balance(),
            "Deposit applied"
        );

        Ok(account.balance())
    }

    /// Debit `amount` from the account of `user_id` and return the new balance.
    pub async fn withdraw(&self, user_id: i64, amount: Decimal) -> AppResult<Decimal> {
        let amount = validate(LedgerOperation::Withdrawal, amount)?;

        let mut account = self
            .accounts
            .find_by_user_id(user_id)
            .await?
            .ok_or(DomainError::AccountNotFound { user_id })?;

        ensure_covered(LedgerOperation::Withdrawal, &amount, &account)?;

        account
            .debit(&amount)
            .map_err(|reason| out_of_range(LedgerOperation::Withdrawal, user_id, reason))?;
        self.accounts.save(&account).await?;

        tracing::info!(
            user_id,
            amount = %amount,
            balance = %account.balance(),
            "Withdrawal applied"
        );

        Ok(account.balance())
    }

    /// Move `amount` from the sender's account to the recipient's.
    pub async fn transfer(
        &self,
        amount: Decimal,
        sender_id: i64,
        recipient_id: i64,
    ) -> AppResult<TransferResult> {
        if sender_id == recipient_id {
            return Err(DomainError::SelfTransfer.into());
        }

        let mut sender = self
            .accounts
            .find_by_user_id(sender_id)
            .await?
            .ok_or(DomainError::SenderNotFound { user_id: sender_id })?;

        let mut recipient = self
            .accounts
            .find_by_user_id(recipient_id)
            .await?
            .ok_or(DomainError::RecipientNotFound {
                user_id: recipient_id,
            })?;

        let amount = validate(LedgerOperation::Transfer, amount)?;
        ensure_covered(LedgerOperation::Transfer, &amount, &sender)?;

        sender
            .debit(&amount)
            .map_err(|reason| out_of_range(LedgerOperation::Transfer, sender_id, reason))?;
        recipient
            .credit(&amount)
            .map_err(|reason| out_of_range(LedgerOperation::Transfer, recipient_id, reason))?;
        self.accounts.save_transfer(&sender, &recipient).await?;

        tracing::info!(
            sender_id,
            recipient_id,
            amount = %amount,
            "Transfer applied"
        );

        Ok(TransferResult {
            sender_balance: sender.balance(),
            recipient_balance: recipient.balance(),
        })
    }

    /// Current balance of the account of `user_id`.
    pub async fn balance(&self, user_id: i64) -> AppResult<Decimal> {
        let account = self
            .accounts
            .find_by_user_id(user_id)
            .await?
            .ok_or(DomainError::AccountNotFound { user_id })?;

        Ok(account.balance())
    }
}

fn validate(operation: LedgerOperation, amount: Decimal) -> Result<Amount, DomainError> {
    Amount::new(amount).map_err(|reason| {
        tracing::debug!(%operation, %amount, %reason, "Rejected amount");
        DomainError::invalid_amount(operation, reason)
    })
}

fn out_of_range(operation: LedgerOperation, user_id: i64, reason: AmountError) -> DomainError {
    tracing::debug!(%operation, user_id, %reason, "Balance out of range");
    DomainError::invalid_amount(operation, reason)
}

fn ensure_covered(
    operation: LedgerOperation,
    amount: &Amount,
    account: &Account,
) -> Result<(), DomainError> {
    if amount.is_covered_by(account.balance()) {
        return Ok(());
    }

    tracing::debug!(
        %operation,
        user_id = account.user_id(),
        requested = %amount,
        available = %account.balance(),
        "Insufficient funds"
    );

    Err(DomainError::insufficient_funds(
        operation,
        amount.value(),
        account.balance(),
    ))
}
