//! Application config: Telegram connection, logging, database, dispatch lanes and file locations.
//! Loaded from env after `dotenvy::dotenv()`.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

use formbot_telegram::TelegramConfig;

pub const DEFAULT_LOG_FILE: &str = "logs/formbot.log";
pub const DEFAULT_DATABASE_URL: &str = "./formbot.db";
pub const DEFAULT_ROUTER_LANES: usize = 4;
pub const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";
pub const DEFAULT_DOCUMENT_DIR: &str = "./documents";

#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
    /// DATABASE_URL; path of the SQLite file holding users
    pub database_url: String,
    /// ROUTER_LANES
    pub router_lanes: usize,
    /// DOWNLOAD_DIR; where fetched attachments land
    pub download_dir: PathBuf,
    /// DOCUMENT_DIR; where generated questionnaires land
    pub document_dir: PathBuf,
}

impl BaseConfig {
    /// Loads from environment variables. `token` overrides BOT_TOKEN, `lanes` overrides ROUTER_LANES.
    pub fn load(token: Option<String>, lanes: Option<usize>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let router_lanes = match lanes {
            Some(lanes) => lanes,
            None => match env::var("ROUTER_LANES") {
                Ok(s) => s
                    .parse()
                    .map_err(|_| anyhow::anyhow!("ROUTER_LANES is not a number: {}", s))?,
                Err(_) => DEFAULT_ROUTER_LANES,
            },
        };
        let download_dir = env::var("DOWNLOAD_DIR")
            .unwrap_or_else(|_| DEFAULT_DOWNLOAD_DIR.to_string())
            .into();
        let document_dir = env::var("DOCUMENT_DIR")
            .unwrap_or_else(|_| DEFAULT_DOCUMENT_DIR.to_string())
            .into();

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            database_url,
            router_lanes,
            download_dir,
            document_dir,
        })
    }

    /// Fails on an unparsable API URL or zero lanes.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if self.router_lanes == 0 {
            anyhow::bail!("ROUTER_LANES must be at least 1");
        }
        Ok(())
    }

    /// Transport slice of the config.
    pub fn telegram(&self) -> TelegramConfig {
        TelegramConfig {
            bot_token: self.bot_token.clone(),
            telegram_api_url: self.telegram_api_url.clone(),
            log_file: Some(self.log_file.clone()),
        }
    }
}
