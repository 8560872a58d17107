// ============================================================================
// RAFFLE API ENDPOINTS - typed wrappers over /api/v1
// ============================================================================

use crate::api::client::ApiClient;
use crate::error::ClientResult;
use crate::types::{
    HealthStatus, History, JoinRaffleRequest, Participant, Raffle, RaffleDetail, UserStats,
};

pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

impl ApiClient {
    /// GET /health
    pub async fn health(&self) -> ClientResult<HealthStatus> {
        self.get("/health").await
    }

    /// GET /raffles/active - one raffle per type while the backend runs normally
    pub async fn active_raffles(&self) -> ClientResult<Vec<Raffle>> {
        self.get("/raffles/active").await
    }

    /// GET /raffles/{id}
    pub async fn raffle(&self, raffle_id: i64) -> ClientResult<RaffleDetail> {
        self.get(&format!("/raffles/{}", raffle_id)).await
    }

    /// POST /raffles/{id}/join - call after the entry fee was paid
    pub async fn join_raffle(&self, raffle_id: i64, tx_hash: &str) -> ClientResult<Participant> {
        let body = JoinRaffleRequest { tx_hash: tx_hash.to_string() };
        self.post(&format!("/raffles/{}/join", raffle_id), &body).await
    }

    /// GET /user/stats
    pub async fn user_stats(&self) -> ClientResult<UserStats> {
        self.get("/user/stats").await
    }

    /// GET /history
    pub async fn history(&self, limit: Option<u32>, offset: Option<u32>) -> ClientResult<History> {
        let query = [
            ("limit", limit.unwrap_or(DEFAULT_HISTORY_LIMIT)),
            ("offset", offset.unwrap_or(0)),
        ];
        self.get_with_query("/history", &query).await
    }
}
