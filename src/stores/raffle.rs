//! Raffle store
//!
//! Caches the active raffles and the raffle currently being viewed. Fetch
//! failures land on the `error` flag; the join action returns a normalized
//! `JoinError` instead.

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::JoinError;
use crate::types::{Participant, Raffle, RaffleDetail, RaffleStatus, RaffleType, WebSocketMessage};

#[derive(Debug, Clone, Default)]
pub struct RaffleState {
    pub active_raffles: Vec<Raffle>,
    pub current_raffle: Option<RaffleDetail>,
    pub loading: bool,
    pub error: Option<String>,
}

/// First cached raffle of each type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RafflesByType {
    pub express: Option<Raffle>,
    pub standard: Option<Raffle>,
    pub premium: Option<Raffle>,
}

impl RafflesByType {
    pub fn get(&self, raffle_type: RaffleType) -> Option<&Raffle> {
        match raffle_type {
            RaffleType::Express => self.express.as_ref(),
            RaffleType::Standard => self.standard.as_ref(),
            RaffleType::Premium => self.premium.as_ref(),
        }
    }
}

pub struct RaffleStore {
    api: ApiClient,
    state: RwLock<RaffleState>,
}

impl RaffleStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RwLock::new(RaffleState::default()),
        }
    }

    pub fn snapshot(&self) -> RaffleState {
        self.state.read().clone()
    }

    pub fn active_raffles(&self) -> Vec<Raffle> {
        self.state.read().active_raffles.clone()
    }

    pub fn current_raffle(&self) -> Option<RaffleDetail> {
        self.state.read().current_raffle.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn raffles_by_type(&self) -> RafflesByType {
        let state = self.state.read();
        let first_of = |t: RaffleType| state.active_raffles.iter().find(|r| r.raffle_type == t).cloned();
        RafflesByType {
            express: first_of(RaffleType::Express),
            standard: first_of(RaffleType::Standard),
            premium: first_of(RaffleType::Premium),
        }
    }

    /// Refresh the active list. Errors are reported through `error()`.
    pub async fn fetch_active_raffles(&self) {
        self.begin_loading();

        let result = self.api.active_raffles().await;

        let mut state = self.state.write();
        match result {
            Ok(raffles) => {
                debug!("Fetched {} active raffles", raffles.len());
                state.active_raffles = raffles;
            }
            Err(e) => state.error = Some(e.message()),
        }
        state.loading = false;
    }

    /// Load one raffle with its participants into `current_raffle`
    pub async fn fetch_raffle(&self, raffle_id: i64) {
        self.begin_loading();

        let result = self.api.raffle(raffle_id).await;

        let mut state = self.state.write();
        match result {
            Ok(detail) => state.current_raffle = Some(detail),
            Err(e) => state.error = Some(e.message()),
        }
        state.loading = false;
    }

    /// Register a paid entry, then refresh the active list
    pub async fn join_raffle(&self, raffle_id: i64, tx_hash: &str) -> Result<Participant, JoinError> {
        let participant = self.api.join_raffle(raffle_id, tx_hash).await?;
        info!("Joined raffle {} as participant {}", raffle_id, participant.id);

        self.fetch_active_raffles().await;
        Ok(participant)
    }

    /// Mirror a push notification into the cache
    pub fn apply_message(&self, message: &WebSocketMessage) {
        let mut state = self.state.write();
        let RaffleState { active_raffles, current_raffle, .. } = &mut *state;

        match message {
            WebSocketMessage::RaffleUpdate { raffle_id, data } => {
                if data.id != *raffle_id {
                    warn!("raffle_update for {} carries raffle {}, ignoring", raffle_id, data.id);
                    return;
                }
                match active_raffles.iter_mut().find(|r| r.id == *raffle_id) {
                    Some(cached) => *cached = data.clone(),
                    None => active_raffles.push(data.clone()),
                }
                if let Some(current) = current_raffle.as_mut().filter(|c| c.raffle.id == *raffle_id) {
                    current.raffle = data.clone();
                }
            }
            WebSocketMessage::RaffleStarted { raffle_id, waiting_until } => {
                for raffle in cached_raffles(active_raffles, current_raffle, *raffle_id) {
                    raffle.status = RaffleStatus::Waiting;
                    raffle.waiting_until = Some(*waiting_until);
                }
            }
            WebSocketMessage::RaffleCompleted { raffle_id, winner_id } => {
                for raffle in cached_raffles(active_raffles, current_raffle, *raffle_id) {
                    raffle.status = RaffleStatus::Completed;
                    if winner_id.is_some() {
                        raffle.winner_id = *winner_id;
                    }
                }
                let Some(winner_id) = winner_id else {
                    warn!("raffle_completed for {} without a winner", raffle_id);
                    return;
                };
                if let Some(current) = current_raffle.as_mut().filter(|c| c.raffle.id == *raffle_id) {
                    for participant in &mut current.participants {
                        participant.is_winner = participant.user_id == *winner_id;
                    }
                }
            }
            WebSocketMessage::Pong => {}
        }
    }

    fn begin_loading(&self) {
        let mut state = self.state.write();
        state.loading = true;
        state.error = None;
    }
}

/// Cached copies of one raffle: the list entry and the detail view
fn cached_raffles<'a>(
    active: &'a mut [Raffle],
    current: &'a mut Option<RaffleDetail>,
    raffle_id: i64,
) -> impl Iterator<Item = &'a mut Raffle> {
    active
        .iter_mut()
        .filter(move |r| r.id == raffle_id)
        .chain(
            current
                .as_mut()
                .map(|c| &mut c.raffle)
                .filter(move |r| r.id == raffle_id),
        )
}
