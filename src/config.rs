//! # Bot Configuration Module
//!
//! Runtime configuration loaded from the environment. The admin identity is
//! injected here and consumed by the admin flow as a comparison input only.

use anyhow::{Context, Result};
use std::env;

/// Runtime configuration for the storefront bot
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,
    /// Base URL of the catalog service (no trailing slash)
    pub catalog_base_url: String,
    /// Base URL of the request store service (no trailing slash)
    pub store_base_url: String,
    /// Chat id of the single authorized admin
    pub admin_chat_id: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let bot_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
        let catalog_base_url =
            env::var("CATALOG_BASE_URL").context("CATALOG_BASE_URL must be set")?;
        let store_base_url =
            env::var("REQUEST_STORE_BASE_URL").context("REQUEST_STORE_BASE_URL must be set")?;
        let admin_chat_id = env::var("ADMIN_CHAT_ID")
            .context("ADMIN_CHAT_ID must be set")?
            .parse::<i64>()
            .context("ADMIN_CHAT_ID must be a numeric chat id")?;

        Ok(Self {
            bot_token,
            catalog_base_url: trim_trailing_slash(catalog_base_url),
            store_base_url: trim_trailing_slash(store_base_url),
            admin_chat_id,
        })
    }

    /// Whether the given sender is the configured admin.
    pub fn is_admin(&self, sender_id: i64) -> bool {
        sender_id == self.admin_chat_id
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimming() {
        assert_eq!(
            trim_trailing_slash("https://store.example.com/".to_string()),
            "https://store.example.com"
        );
        assert_eq!(
            trim_trailing_slash("https://store.example.com".to_string()),
            "https://store.example.com"
        );
        assert_eq!(
            trim_trailing_slash("https://store.example.com//".to_string()),
            "https://store.example.com"
        );
    }

    #[test]
    fn test_admin_comparison() {
        let config = Config {
            bot_token: "token".to_string(),
            catalog_base_url: "http://catalog".to_string(),
            store_base_url: "http://store".to_string(),
            admin_chat_id: 777,
        };

        assert!(config.is_admin(777));
        assert!(!config.is_admin(778));
        assert!(!config.is_admin(-777));
    }
}
