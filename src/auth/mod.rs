//! Authentication module
//!
//! Password hashing, bearer tokens, and the registration/login flows.
//! The ledger never sees credentials, only the resolved user id.

mod password;
mod service;
mod token;

pub use password::{hash_password, verify_password};
pub use service::{AuthService, RegisterCommand};
pub use token::{AccessToken, Claims, TokenError, TokenIssuer};
