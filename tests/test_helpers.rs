// ============================================================================
// TEST HELPERS — in-process backend for integration tests
// ============================================================================

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::HeaderMap;
use axum::Router;
use parking_lot::Mutex;
use serde_json::{json, Value};

use raffle_client::ClientConfig;

/// Bind `routes` under `/api/v1` (plus any root routes) on an ephemeral port
pub async fn spawn_backend(api_routes: Router, root_routes: Router) -> SocketAddr {
    let app = Router::new().nest("/api/v1", api_routes).merge(root_routes);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn config_for(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(&format!("http://{}/api/v1", addr))
        .unwrap()
        .with_ws_url(&format!("ws://{}/ws", addr))
        .unwrap()
}

/// Records what the backend saw
#[derive(Default)]
pub struct Recorder {
    pub hits: AtomicUsize,
    pub headers: Mutex<Vec<HeaderMap>>,
    pub bodies: Mutex<Vec<Value>>,
    pub queries: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record(&self, headers: &HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.headers.lock().push(headers.clone());
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_header(&self, name: &str) -> Option<String> {
        self.headers
            .lock()
            .last()
            .and_then(|h| h.get(name))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn raffle_json(id: i64, raffle_type: &str, current: u32) -> Value {
    json!({
        "id": id,
        "type": raffle_type,
        "status": "active",
        "min_participants": 5,
        "current_participants": current,
        "entry_fee_ton": 1.0,
        "prize_pool_ton": 4.5,
        "commission_percent": 10.0,
        "created_at": "2024-05-01T10:00:00.000000",
        "waiting_until": null,
        "drawn_at": null,
        "winner_id": null,
        "random_org_signature": null,
        "random_org_url": null
    })
}

pub fn active_raffles_json() -> Value {
    json!([
        raffle_json(1, "express", 2),
        raffle_json(2, "standard", 0),
        raffle_json(3, "premium", 11),
    ])
}

pub fn participant_json(id: i64, raffle_id: i64, tx_hash: &str) -> Value {
    json!({
        "id": id,
        "raffle_id": raffle_id,
        "user_id": 42,
        "joined_at": "2024-05-01T10:03:00",
        "transaction_hash": tx_hash,
        "is_winner": false,
        "prize_sent": false
    })
}

pub fn user_stats_json(participations: u32) -> Value {
    json!({
        "user": {
            "id": 42,
            "telegram_id": 777000,
            "username": "alice",
            "ton_wallet": "UQBvW8Z5huBkMJYdnfAEM5JqTNkuWX3diqYENkWsIL0XggGG",
            "total_participations": participations,
            "total_wins": 1,
            "total_spent_ton": 6.0,
            "total_won_ton": 4.5,
            "created_at": "2024-04-01T09:00:00",
            "last_active": "2024-05-01T10:03:00"
        },
        "recent_participations": []
    })
}
