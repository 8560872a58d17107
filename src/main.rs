// ============================================================================
// RAFFLE CLIENT — command line front end
// ============================================================================
//
// Reads .env (VITE_API_URL, VITE_PORT, VITE_WS_URL, RAFFLE_INIT_DATA,
// RAFFLE_TIMEOUT_SECS) and drives the stores against a running backend.
//
// Run:  cargo run -- raffles
//       cargo run -- join 3 <tx_hash>
//       cargo run -- watch

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use raffle_client::ws::DEFAULT_PING_INTERVAL;
use raffle_client::{
    ApiClient, ClientConfig, ClientResult, FeedClient, Raffle, RaffleStore, UserStore,
};

const USAGE: &str = "usage: raffle-client <health|raffles|raffle <id>|join <id> <tx_hash>|stats|history [limit] [offset]|watch>";

enum Command {
    Health,
    Raffles,
    Raffle(i64),
    Join(i64, String),
    Stats,
    History(Option<u32>, Option<u32>),
    Watch,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let parse_id = |raw: Option<&String>| -> Result<i64, String> {
        raw.ok_or("missing raffle id")?
            .parse::<i64>()
            .map_err(|_| "raffle id must be a number".to_string())
    };
    let parse_opt = |raw: Option<&String>| -> Result<Option<u32>, String> {
        raw.map(|v| v.parse::<u32>().map_err(|_| format!("not a number: {}", v)))
            .transpose()
    };

    match args.first().map(String::as_str) {
        Some("health") => Ok(Command::Health),
        Some("raffles") | None => Ok(Command::Raffles),
        Some("raffle") => Ok(Command::Raffle(parse_id(args.get(1))?)),
        Some("join") => {
            let id = parse_id(args.get(1))?;
            let tx_hash = args.get(2).ok_or("missing tx_hash")?.clone();
            Ok(Command::Join(id, tx_hash))
        }
        Some("stats") => Ok(Command::Stats),
        Some("history") => Ok(Command::History(parse_opt(args.get(1))?, parse_opt(args.get(2))?)),
        Some("watch") => Ok(Command::Watch),
        Some(other) => Err(format!("unknown command: {}", other)),
    }
}

fn print_raffle(raffle: &Raffle) {
    println!(
        "#{:<5} {:<8} {:<9} {:>3}/{:<3} fee {:>6.2} TON  prize {:>7.2} TON",
        raffle.id,
        raffle.raffle_type,
        raffle.status,
        raffle.current_participants,
        raffle.min_participants,
        raffle.entry_fee_ton,
        raffle.prize_pool_ton,
    );
    if let Some(proof) = raffle.fairness_proof() {
        println!("       proof: {}", proof.url);
    }
}

async fn run(command: Command, config: ClientConfig) -> ClientResult<bool> {
    let api = ApiClient::new(config.clone())?;

    match command {
        Command::Health => {
            let health = api.health().await?;
            println!("backend: {}", health.status);
            Ok(health.is_ok())
        }
        Command::Raffles => {
            let store = RaffleStore::new(api);
            store.fetch_active_raffles().await;
            if let Some(e) = store.error() {
                error!("❌ {}", e);
                return Ok(false);
            }
            store.active_raffles().iter().for_each(print_raffle);
            Ok(true)
        }
        Command::Raffle(id) => {
            let store = RaffleStore::new(api);
            store.fetch_raffle(id).await;
            match store.current_raffle() {
                Some(detail) => {
                    print_raffle(&detail.raffle);
                    for p in &detail.participants {
                        println!(
                            "       user {:<8} joined {}{}",
                            p.user_id,
                            p.joined_at.format("%Y-%m-%d %H:%M:%S"),
                            if p.is_winner { "  🏆" } else { "" }
                        );
                    }
                    Ok(true)
                }
                None => {
                    error!("❌ {}", store.error().unwrap_or_default());
                    Ok(false)
                }
            }
        }
        Command::Join(id, tx_hash) => {
            let store = RaffleStore::new(api);
            match store.join_raffle(id, &tx_hash).await {
                Ok(participant) => {
                    println!("joined raffle {} as participant {}", id, participant.id);
                    Ok(true)
                }
                Err(e) => {
                    error!("❌ {}", e);
                    Ok(false)
                }
            }
        }
        Command::Stats => {
            let store = UserStore::new(api);
            store.fetch_stats().await;
            match store.user() {
                Some(user) => {
                    println!(
                        "{}: {} raffles, {} wins, spent {:.2} TON, won {:.2} TON",
                        user.username.as_deref().unwrap_or("anonymous"),
                        user.total_participations,
                        user.total_wins,
                        user.total_spent_ton,
                        user.total_won_ton,
                    );
                    Ok(true)
                }
                None => Ok(false),
            }
        }
        Command::History(limit, offset) => {
            let history = api.history(limit, offset).await?;
            println!("{} raffles total", history.total);
            history.raffles.iter().for_each(print_raffle);
            Ok(true)
        }
        Command::Watch => {
            let store = Arc::new(RaffleStore::new(api));
            store.fetch_active_raffles().await;
            let feed = FeedClient::connect(&config.ws_url).await?;
            let stats = feed.run(store.clone(), DEFAULT_PING_INTERVAL).await?;
            info!("Feed ended after {} updates", stats.applied);
            store.active_raffles().iter().for_each(print_raffle);
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,raffle_client=debug")))
        .with(tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ {}", e);
            return ExitCode::from(2);
        }
    };
    if config.init_data.is_none() {
        warn!("RAFFLE_INIT_DATA not set, authenticated endpoints will reject requests");
    }
    info!("🎟️  Raffle backend: {}", config.api_url);

    match run(command, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
