//! Raffle Client
//!
//! Typed client for the raffle mini-app backend.
//!
//! ## Layout
//!
//! - **api**: `ApiClient` over `/api/v1`, injects `X-Telegram-Init-Data`, logs failures
//! - **stores**: cached raffle / user / wallet state that forwards to the API
//! - **ws**: `/ws` push feed mirrored into the raffle store
//! - **config**: environment-driven settings (`VITE_*` + `RAFFLE_*`)

pub mod api;
pub mod config;
pub mod error;
pub mod stores;
pub mod types;
pub mod ws;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use api::{ApiClient, InitDataProvider, StaticInitData, INIT_DATA_HEADER};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, JoinError, JOIN_FALLBACK_MESSAGE};
pub use stores::{RaffleStore, RafflesByType, UserStore, WalletConnection, WalletStore};
pub use types::{
    FairnessProof, HealthStatus, History, Participant, Raffle, RaffleDetail, RaffleStatus,
    RaffleType, User, UserStats, WebSocketMessage,
};
pub use ws::{decode_message, FeedClient, FeedStats};
