mod api;
mod chat;
mod common;
mod config;
mod network;
mod storage;
mod ui;

use std::error::Error;

use api::BackendClient;
use chat::{ChatCache, ChatSession};
use clap::Parser;
use config::AppConfig;
use dotenvy::dotenv;
use network::ChatChannel;
use storage::SqliteStore;
use ui::ChatApp;
use ui::state::LiveSession;

#[derive(Parser)]
#[command(
    name = "shopora_chat",
    version,
    about = "Operator chat panel for the Shopora storefront"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Identity to chat as (overrides config)
    #[arg(long, value_name = "ID")]
    identity: Option<String>,
    /// SQLite file holding the chat cache (overrides config)
    #[arg(long, value_name = "FILE")]
    database: Option<String>,
    /// How long messages stay cached (overrides config)
    #[arg(long, value_name = "MINUTES")]
    retention_minutes: Option<u32>,
    /// Require a signed-in backend session before opening the panel
    #[arg(long)]
    require_session: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(identity) = &self.identity {
            config.identity = identity.clone();
        }
        if let Some(database) = &self.database {
            config.database_path = database.clone();
        }
        if let Some(minutes) = self.retention_minutes {
            config.retention_minutes = minutes;
        }
        if self.require_session {
            config.require_session = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    cli.apply_overrides(&mut app_config);

    if !session_allows_panel(&app_config).await {
        return Err("no signed-in backend session".into());
    }

    let store = SqliteStore::open(&app_config.database_path)?;
    let cache = ChatCache::new(store, app_config.cache_settings());
    let channel = ChatChannel::open(app_config.network_settings());
    let session = ChatSession::open(cache, channel)?;

    log::info!(
        "Chat panel started for {} ({} cached messages)",
        session.viewer(),
        session.cache().len()
    );

    run_panel(session)?;
    Ok(())
}

async fn session_allows_panel(config: &AppConfig) -> bool {
    if !config.require_session {
        return true;
    }

    let cookie = std::env::var(config::SESSION_COOKIE_ENV).ok();
    let backend = BackendClient::new(config.api_base_url.as_str());
    match backend.current_user(cookie.as_deref()).await {
        Ok(Some(user)) => {
            if user.email != config.identity {
                log::warn!(
                    "Signed in as {} but chatting as {}",
                    user.email,
                    config.identity
                );
            }
            log::info!("Backend session ok for {}", user.email);
            true
        }
        Ok(None) => {
            log::error!(
                "Not signed in at {}; set {} to a valid session cookie",
                config.api_base_url,
                config::SESSION_COOKIE_ENV
            );
            false
        }
        Err(err) => {
            log::error!("Session check failed: {err}");
            false
        }
    }
}

fn run_panel(session: LiveSession) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Shopora Chat",
        options,
        Box::new(move |cc| Ok(Box::new(ChatApp::new(cc, session)))),
    )
}
