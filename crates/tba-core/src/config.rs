use std::{env, fs, path::Path, time::Duration};

use crate::{
    domain::{BotToken, ChatId},
    errors::Error,
    retry::RetryPolicy,
    Result,
};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Immutable settings a [`crate::client::Bot`] is built with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without the `/bot<token>` part.
    pub api_url: String,
    /// Upper bound on one round trip; `None` leaves it to the transport.
    pub request_timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: None,
            retry: RetryPolicy::none(),
        }
    }
}

/// Environment-driven configuration for binaries.
///
/// `Debug` never shows the token.
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: BotToken,
    pub api_url: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub max_retry_after: Duration,
    /// Target chat for the demo binary.
    pub chat_id: Option<ChatId>,
}

impl Config {
    /// Read `.env` (without overriding the environment), then the environment.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let token = get("TELEGRAM_BOT_TOKEN").ok_or_else(|| {
            Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;
        let telegram_bot_token = BotToken::new(token)
            .map_err(|_| Error::Config("TELEGRAM_BOT_TOKEN is malformed".to_string()))?;

        let api_url = get("TELEGRAM_API_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout = Duration::from_millis(
            parse_u64(get("TELEGRAM_REQUEST_TIMEOUT_MS")).unwrap_or(30_000),
        );
        let max_retries = get("TELEGRAM_MAX_RETRIES")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(0);
        let max_retry_after =
            Duration::from_secs(parse_u64(get("TELEGRAM_MAX_RETRY_AFTER_SECS")).unwrap_or(30));

        let chat_id = get("TELEGRAM_CHAT_ID").map(|s| ChatId::from(s.trim()));

        Ok(Self {
            telegram_bot_token,
            api_url,
            request_timeout,
            max_retries,
            max_retry_after,
            chat_id,
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            request_timeout: Some(self.request_timeout),
            retry: RetryPolicy::flood_control(self.max_retries, self.max_retry_after),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn parse_u64(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };
        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }
        out.push((key.to_string(), val));
    }
    out
}
