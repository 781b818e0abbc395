//! Bot connection and view settings, loaded from the environment.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: Option<PathBuf>,
    /// VIEWS_DIR: directory of JSON view files
    pub views_dir: Option<PathBuf>,
}

impl TelegramConfig {
    /// BOT_TOKEN is required; the rest are optional.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Like [`Self::from_env`], with `token` overriding BOT_TOKEN when given.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").ok().map(PathBuf::from);
        let views_dir = env::var("VIEWS_DIR").ok().map(PathBuf::from);
        let config = Self {
            bot_token,
            telegram_api_url,
            log_file,
            views_dir,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_token(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            telegram_api_url: None,
            log_file: None,
            views_dir: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }

    /// teloxide bot for this config, pointed at the custom API server when one is set.
    pub fn bot(&self) -> Result<teloxide::Bot> {
        let bot = teloxide::Bot::new(&self.bot_token);
        match &self.telegram_api_url {
            Some(url) => Ok(bot.set_api_url(reqwest::Url::parse(url)?)),
            None => Ok(bot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_token() {
        let config = TelegramConfig::with_token("test_token");
        assert_eq!(config.bot_token, "test_token");
        assert!(config.telegram_api_url.is_none());
        assert!(config.log_file.is_none());
        assert!(config.views_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url_and_empty_token() {
        let mut config = TelegramConfig::with_token("t");
        config.telegram_api_url = Some("not a url".to_string());
        assert!(config.validate().is_err());

        config.telegram_api_url = Some("http://localhost:8081".to_string());
        assert!(config.validate().is_ok());
        assert!(config.bot().is_ok());

        assert!(TelegramConfig::with_token("  ").validate().is_err());
    }
}
