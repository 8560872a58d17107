//! User store: the signed-in user's counters

use parking_lot::RwLock;
use tracing::error;

use crate::api::ApiClient;
use crate::types::{Raffle, User};

#[derive(Debug, Clone, Default)]
pub struct UserState {
    pub user: Option<User>,
    pub recent_participations: Vec<Raffle>,
    pub loading: bool,
}

pub struct UserStore {
    api: ApiClient,
    state: RwLock<UserState>,
}

impl UserStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RwLock::new(UserState::default()),
        }
    }

    pub fn snapshot(&self) -> UserState {
        self.state.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Refresh stats. A failure is logged and the previous snapshot kept.
    pub async fn fetch_stats(&self) {
        self.state.write().loading = true;

        let result = self.api.user_stats().await;

        let mut state = self.state.write();
        match result {
            Ok(stats) => {
                state.user = Some(stats.user);
                state.recent_participations = stats.recent_participations;
            }
            Err(e) => error!("Failed to fetch stats: {}", e),
        }
        state.loading = false;
    }
}
