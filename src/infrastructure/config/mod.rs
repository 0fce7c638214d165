//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Category whose new text channels get the welcome panel
pub const DEFAULT_WELCOME_CATEGORY_ID: u64 = 1163983820245180446;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub welcome: WelcomeConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    /// User ids allowed to run owner-only commands
    #[serde(default)]
    pub owners: Vec<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordConfig {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct WelcomeConfig {
    pub enabled: bool,
    pub category_id: u64,
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            category_id: DEFAULT_WELCOME_CATEGORY_ID,
        }
    }
}

/// Identity used for interactions typed into the console adapter
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub user_id: u64,
    pub guild_id: Option<u64>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            user_id: 1,
            guild_id: Some(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "relay-bot".to_string(),
                owners: Vec::new(),
            },
            discord: DiscordConfig::default(),
            welcome: WelcomeConfig::default(),
            console: ConsoleConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(token) = std::env::var("DISCORD_TOKEN") {
            self.discord.token = Some(token);
        }

        if let Ok(owners) = std::env::var("BOT_OWNERS") {
            self.bot.owners = parse_id_list(&owners)?;
        }

        if let Ok(category) = std::env::var("WELCOME_CATEGORY_ID") {
            self.welcome.category_id = category
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("WELCOME_CATEGORY_ID: {}", category)))?;
        }

        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.discord.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Parse a comma separated list of snowflake ids
fn parse_id_list(raw: &str) -> Result<Vec<u64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|_| ConfigError::InvalidValue(format!("not a user id: {}", s))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config = Config::parse("bot:\n  name: test\n").unwrap();
        assert_eq!(config.bot.name, "test");
        assert!(config.bot.owners.is_empty());
        assert!(config.welcome.enabled);
        assert_eq!(config.welcome.category_id, DEFAULT_WELCOME_CATEGORY_ID);
        assert!(config.token().is_none());
    }

    #[test]
    fn test_kebab_case_keys() {
        let yaml = "bot:\n  name: test\n  owners: [1, 2]\nwelcome:\n  enabled: false\n  category-id: 55\ndiscord:\n  token: abc\n";
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.bot.owners, vec![1, 2]);
        assert!(!config.welcome.enabled);
        assert_eq!(config.welcome.category_id, 55);
        assert_eq!(config.token(), Some("abc"));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(Config::parse("bot: ["), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1, 2,,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_id_list("1,abc").is_err());
    }

    #[test]
    fn test_empty_token_is_none() {
        let mut config = Config::default();
        config.discord.token = Some(String::new());
        assert!(config.token().is_none());
    }
}
