use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DiscordConfig {
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Names of the two channels the relay answers in. Matched verbatim.
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelsConfig {
    #[serde(default = "default_english_diary")]
    pub english_diary: String,
    #[serde(default = "default_kids_diary")]
    pub kids_diary: String,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            english_diary: default_english_diary(),
            kids_diary: default_kids_diary(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub channels: ChannelsConfig,
}

fn default_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_english_diary() -> String {
    "英語日記".to_string()
}

fn default_kids_diary() -> String {
    "ともきにっき".to_string()
}

impl Config {
    /// Load `.env`, the optional TOML file, then apply the process environment.
    pub fn load(path: &Path) -> Result<Self> {
        // A missing .env is the normal case in production.
        dotenv::dotenv().ok();

        let content = if path.exists() {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?
        } else {
            String::new()
        };

        Self::from_sources(&content, |key| std::env::var(key).ok())
    }

    /// Build a config from TOML text and an environment lookup.
    /// Credentials are required; everything else falls back to defaults.
    pub fn from_sources<F>(toml_text: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Config =
            toml::from_str(toml_text).context("Failed to parse config file")?;

        if let Some(token) = env("DISCORD_BOT_TOKEN") {
            config.discord.bot_token = token;
        }
        if let Some(key) = env("GEMINI_API_KEY") {
            config.gemini.api_key = key;
        }
        if let Some(model) = env("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
            config.gemini.model = model;
        }
        if let Some(port) = env("PORT") {
            config.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port:?}"))?;
        }

        if config.discord.bot_token.trim().is_empty() {
            bail!("DISCORD_BOT_TOKEN is not set");
        }
        if config.gemini.api_key.trim().is_empty() {
            bail!("GEMINI_API_KEY is not set");
        }

        Ok(config)
    }
}
