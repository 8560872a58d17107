//! Push feed client
//!
//! Connects to the backend's `/ws` endpoint, keeps the socket alive with text
//! pings (the server answers each with `{"type":"pong"}`) and mirrors every
//! notification into a `RaffleStore`.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::stores::RaffleStore;
use crate::types::WebSocketMessage;

pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(30);
const PING_TEXT: &str = "ping";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Counters returned when the feed ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub applied: u64,
    pub pongs: u64,
    pub skipped: u64,
}

pub struct FeedClient {
    url: Url,
    stream: WsStream,
}

impl FeedClient {
    pub async fn connect(url: &Url) -> ClientResult<Self> {
        let (stream, _response) = connect_async(url.as_str()).await?;
        info!("📡 Raffle feed connected: {}", url);
        Ok(Self { url: url.clone(), stream })
    }

    /// Pump messages into `store` until the server closes the socket
    pub async fn run(self, store: Arc<RaffleStore>, ping_interval: Duration) -> ClientResult<FeedStats> {
        let Self { url, stream } = self;
        let (mut sink, mut source) = stream.split();
        let mut stats = FeedStats::default();

        let mut ticker = tokio::time::interval(ping_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    sink.send(Message::Text(PING_TEXT.into())).await?;
                }
                frame = source.next() => {
                    let frame = match frame {
                        Some(frame) => frame?,
                        None => break,
                    };
                    match frame {
                        Message::Text(text) => match decode_message(&text) {
                            Ok(WebSocketMessage::Pong) => stats.pongs += 1,
                            Ok(message) => {
                                debug!("Feed message for raffle {:?}", message.raffle_id());
                                store.apply_message(&message);
                                stats.applied += 1;
                            }
                            Err(e) => {
                                warn!("Skipping feed frame: {}", e);
                                stats.skipped += 1;
                            }
                        },
                        Message::Close(_) => break,
                        _ => {}
                    }
                }
            }
        }

        info!(
            "📡 Raffle feed closed: {} ({} applied, {} skipped)",
            url, stats.applied, stats.skipped
        );
        Ok(stats)
    }
}

pub fn decode_message(text: &str) -> ClientResult<WebSocketMessage> {
    serde_json::from_str(text).map_err(|e| ClientError::Decode(format!("feed message: {}", e)))
}
