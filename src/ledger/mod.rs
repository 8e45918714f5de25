//! Ledger module
//!
//! Deposit, withdrawal, transfer and balance queries over an [`AccountStore`].
//!
//! [`AccountStore`]: crate::store::AccountStore

mod service;

pub use service::{LedgerService, TransferResult};
