//! Cached client state
//!
//! Each store owns its state behind a `parking_lot::RwLock` and never holds
//! the lock across an `.await`; the last response to arrive wins.

pub mod raffle;
pub mod user;
pub mod wallet;

pub use raffle::{RaffleState, RaffleStore, RafflesByType};
pub use user::{UserState, UserStore};
pub use wallet::{WalletConnection, WalletStore};
