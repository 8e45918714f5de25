//! In-memory store
//!
//! Mutex-guarded maps with the same contract as the PostgreSQL store.
//! Ids are assigned sequentially from 1.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::{Account, NewUser, User};

use super::{AccountStore, StoreError, StoreResult, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    // account id -> account
    accounts: HashMap<i64, Account>,
    next_account_id: i64,
}

/// In-memory account and user store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account directly, bypassing registration.
    ///
    /// Used to seed balances and to model accounts whose user row is absent.
    pub fn insert_account(&self, user_id: i64, balance: Decimal) -> Account {
        let mut tables = self.lock();
        let account = Account::new(tables.allocate_account_id(), user_id, balance);
        tables.accounts.insert(account.id(), account.clone());
        account
    }

    /// Insert a user without an account.
    pub fn insert_user(&self, new_user: &NewUser) -> User {
        let mut tables = self.lock();
        let user = tables.new_user_row(new_user);
        tables.users.push(user.clone());
        user
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        // A panic while holding the lock cannot leave a half-written row
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Tables {
    fn allocate_account_id(&mut self) -> i64 {
        self.next_account_id += 1;
        self.next_account_id
    }

    fn new_user_row(&self, new_user: &NewUser) -> User {
        User {
            id: self.users.len() as i64 + 1,
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            created_at: Utc::now(),
        }
    }

    fn ensure_exists(&self, account: &Account) -> StoreResult<()> {
        if self.accounts.contains_key(&account.id()) {
            Ok(())
        } else {
            Err(StoreError::Missing(format!("account {}", account.id())))
        }
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_user_id(&self, user_id: i64) -> StoreResult<Option<Account>> {
        let tables = self.lock();
        Ok(tables
            .accounts
            .values()
            .find(|account| account.user_id() == user_id)
            .cloned())
    }

    async fn save(&self, account: &Account) -> StoreResult<()> {
        let mut tables = self.lock();
        tables.ensure_exists(account)?;
        tables.accounts.insert(account.id(), account.clone());
        Ok(())
    }

    async fn save_transfer(&self, sender: &Account, recipient: &Account) -> StoreResult<()> {
        let mut tables = self.lock();
        tables.ensure_exists(sender)?;
        tables.ensure_exists(recipient)?;
        tables.accounts.insert(sender.id(), sender.clone());
        tables.accounts.insert(recipient.id(), recipient.clone());
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.lock();
        Ok(tables
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn register(&self, new_user: &NewUser) -> StoreResult<User> {
        let mut tables = self.lock();

        let taken = tables
            .users
            .iter()
            .any(|user| user.username == new_user.username || user.email == new_user.email);
        if taken {
            return Err(StoreError::Conflict(
                "username or email already registered".to_string(),
            ));
        }

        let user = tables.new_user_row(new_user);
        tables.users.push(user.clone());

        let account = Account::new(tables.allocate_account_id(), user.id, Decimal::ZERO);
        tables.accounts.insert(account.id(), account);

        Ok(user)
    }
}
