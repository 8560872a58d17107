//! Raffle Data Model
//!
//! Passive records mirrored from the backend. Nothing here is validated or
//! mutated client-side beyond what the stores do with push notifications.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaffleType {
    Express,
    Standard,
    Premium,
}

impl RaffleType {
    pub const ALL: [RaffleType; 3] = [RaffleType::Express, RaffleType::Standard, RaffleType::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            RaffleType::Express => "express",
            RaffleType::Standard => "standard",
            RaffleType::Premium => "premium",
        }
    }
}

impl std::fmt::Display for RaffleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Server-driven lifecycle. The client never advances it on its own except
/// when mirroring a push notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaffleStatus {
    Active,
    Waiting,
    Drawing,
    Completed,
    Cancelled,
}

impl RaffleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaffleStatus::Active => "active",
            RaffleStatus::Waiting => "waiting",
            RaffleStatus::Drawing => "drawing",
            RaffleStatus::Completed => "completed",
            RaffleStatus::Cancelled => "cancelled",
        }
    }

    /// Raffle still accepts participants
    pub fn is_joinable(&self) -> bool {
        matches!(self, RaffleStatus::Active | RaffleStatus::Waiting)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, RaffleStatus::Completed | RaffleStatus::Cancelled)
    }
}

impl std::fmt::Display for RaffleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// ============================================================================
// ENTITIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raffle {
    pub id: i64,
    #[serde(rename = "type")]
    pub raffle_type: RaffleType,
    pub status: RaffleStatus,
    pub min_participants: u32,
    #[serde(default)]
    pub current_participants: u32,
    pub entry_fee_ton: f64,
    pub prize_pool_ton: f64,
    pub commission_percent: f64,
    #[serde(deserialize_with = "timestamp::required")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub waiting_until: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub drawn_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub winner_id: Option<i64>,
    #[serde(default)]
    pub random_org_signature: Option<String>,
    #[serde(default)]
    pub random_org_url: Option<String>,
}

/// Externally issued proof that the draw used verifiable randomness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FairnessProof<'a> {
    pub signature: &'a str,
    pub url: &'a str,
}

impl Raffle {
    /// Only available once the draw completed and both halves are set
    pub fn fairness_proof(&self) -> Option<FairnessProof<'_>> {
        match (&self.random_org_signature, &self.random_org_url) {
            (Some(signature), Some(url)) => Some(FairnessProof { signature, url }),
            _ => None,
        }
    }

    /// Participants still missing before the timer starts (0 once reached)
    pub fn spots_remaining(&self) -> u32 {
        self.min_participants.saturating_sub(self.current_participants)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub raffle_id: i64,
    pub user_id: i64,
    #[serde(deserialize_with = "timestamp::required")]
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    pub is_winner: bool,
    pub prize_sent: bool,
}

/// `GET /raffles/{id}` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaffleDetail {
    #[serde(flatten)]
    pub raffle: Raffle,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub ton_wallet: Option<String>,
    pub total_participations: u32,
    pub total_wins: u32,
    pub total_spent_ton: f64,
    pub total_won_ton: f64,
    #[serde(deserialize_with = "timestamp::required")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::required")]
    pub last_active: DateTime<Utc>,
}

impl User {
    /// Winnings minus spend, in TON
    pub fn net_result_ton(&self) -> f64 {
        self.total_won_ton - self.total_spent_ton
    }
}

// ============================================================================
// REQUEST / RESPONSE ENVELOPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRaffleRequest {
    pub tx_hash: String,
}

/// `GET /user/stats` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub user: User,
    #[serde(default)]
    pub recent_participations: Vec<Raffle>,
}

/// `GET /history` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub raffles: Vec<Raffle>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

// ============================================================================
// PUSH FEED
// ============================================================================

/// Messages pushed over `/ws`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WebSocketMessage {
    RaffleUpdate {
        raffle_id: i64,
        data: Raffle,
    },
    RaffleStarted {
        raffle_id: i64,
        #[serde(deserialize_with = "timestamp::required")]
        waiting_until: DateTime<Utc>,
    },
    /// `winner_id` is null when the draw finished without a winner record
    RaffleCompleted {
        raffle_id: i64,
        #[serde(default)]
        winner_id: Option<i64>,
    },
    Pong,
}

impl WebSocketMessage {
    pub fn raffle_id(&self) -> Option<i64> {
        match self {
            WebSocketMessage::RaffleUpdate { raffle_id, .. }
            | WebSocketMessage::RaffleStarted { raffle_id, .. }
            | WebSocketMessage::RaffleCompleted { raffle_id, .. } => Some(*raffle_id),
            WebSocketMessage::Pong => None,
        }
    }
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

/// The backend emits ISO-8601 both with and without an offset. Naive values
/// are UTC.
pub mod timestamp {
    use super::*;

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
    }

    pub fn required<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw).map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
