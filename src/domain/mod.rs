//! Domain module
//!
//! Core domain types and business rules.

pub mod account;
pub mod amount;
pub mod context;
pub mod error;

pub use account::{Account, NewUser, User};
pub use amount::{balance_limit, Amount, AmountError};
pub use context::OperationContext;
pub use error::{DomainError, LedgerOperation};
