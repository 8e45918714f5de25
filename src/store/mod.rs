//! Store module
//!
//! Persistence ports for accounts and users, with a PostgreSQL adapter and
//! an in-memory adapter.
//!
//! The ledger performs read-modify-write cycles through [`AccountStore`]
//! without a version token. Two concurrent operations on the same account can
//! lose an update unless the adapter serializes them.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::{Account, NewUser, User};

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Account persistence port, keyed by owner user id.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Load the account owned by `user_id`
    async fn find_by_user_id(&self, user_id: i64) -> StoreResult<Option<Account>>;

    /// Persist the account's balance
    async fn save(&self, account: &Account) -> StoreResult<()>;

    /// Persist both balances of a transfer, all or nothing
    async fn save_transfer(&self, sender: &Account, recipient: &Account) -> StoreResult<()>;
}

/// User persistence port.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Insert the user together with its zero-balance account.
    ///
    /// Fails with [`StoreError::Conflict`] when the username or email is taken.
    async fn register(&self, new_user: &NewUser) -> StoreResult<User>;
}
