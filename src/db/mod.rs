//! Persistence layer (device-local key-value store).

pub mod accounts;
pub mod store;

pub use accounts::{AccountMap, AccountRepository};
pub use store::{KvStore, StoreError, StoreResult};

/// Store keys as constants.
pub mod keys {
    /// Map of normalized email to account
    pub const USERS: &str = "users";
    /// Normalized email of the logged-in account
    pub const SESSION: &str = "session";
}
