//! API module
//!
//! HTTP endpoints, middleware, and the shared application state.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use crate::auth::{AuthService, TokenIssuer};
use crate::ledger::LedgerService;
use crate::store::{AccountStore, UserStore};

pub use routes::create_router;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub ledger: LedgerService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        users: Arc<dyn UserStore>,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            ledger: LedgerService::new(accounts),
            auth: AuthService::new(users, tokens),
        }
    }
}
