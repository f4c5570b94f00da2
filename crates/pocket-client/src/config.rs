//! Client configuration loaded from environment variables.
//!
//! All settings have defaults so the client runs in mock mode with zero
//! configuration.

use std::fmt;
use std::path::PathBuf;

/// Which chat reply strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiMode {
    #[default]
    Mock,
    Real,
}

impl AiMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "mock" => Some(AiMode::Mock),
            "real" => Some(AiMode::Real),
            _ => None,
        }
    }
}

/// Mobile platform, used to pick the purchase provider key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    /// iOS builds use the iOS key; every other target uses the Android key.
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Android
        }
    }
}

/// Client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Chat reply strategy.
    /// Env: `AI_MODE` (`mock` / `real`)
    /// Default: `mock`
    pub ai_mode: AiMode,

    /// Bearer credential for the completion provider.  The real path is
    /// disabled without it, whatever `ai_mode` says.
    /// Env: `OPENAI_API_KEY`
    pub openai_api_key: Option<String>,

    /// Env: `OPENAI_BASE_URL`
    /// Default: `https://api.openai.com/v1`
    pub openai_base_url: String,

    /// Env: `OPENAI_MODEL`
    /// Default: `gpt-4o-mini`
    pub openai_model: String,

    pub max_tokens: u32,

    pub temperature: f32,

    /// Env: `RC_IOS_API_KEY`
    pub purchases_ios_key: Option<String>,

    /// Env: `RC_ANDROID_API_KEY`
    pub purchases_android_key: Option<String>,

    /// Explicit SQLite file.  `None` uses the platform data directory.
    /// Env: `POCKET_COACH_DB`
    pub database_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ai_mode: AiMode::Mock,
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            max_tokens: 256,
            temperature: 0.7,
            purchases_ios_key: None,
            purchases_android_key: None,
            database_path: None,
        }
    }
}

// Keeps credentials out of `?config` log lines.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("ai_mode", &self.ai_mode)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<set>"))
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("purchases_ios_key", &self.purchases_ios_key.as_ref().map(|_| "<set>"))
            .field(
                "purchases_android_key",
                &self.purchases_android_key.as_ref().map(|_| "<set>"),
            )
            .field("database_path", &self.database_path)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(mode) = lookup("AI_MODE") {
            match AiMode::parse(&mode) {
                Some(parsed) => config.ai_mode = parsed,
                None => {
                    tracing::warn!(value = %mode, "Invalid AI_MODE, using mock");
                }
            }
        }

        config.openai_api_key = non_empty(lookup("OPENAI_API_KEY"));

        if let Some(url) = non_empty(lookup("OPENAI_BASE_URL")) {
            config.openai_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(model) = non_empty(lookup("OPENAI_MODEL")) {
            config.openai_model = model;
        }

        config.purchases_ios_key = non_empty(lookup("RC_IOS_API_KEY"));
        config.purchases_android_key = non_empty(lookup("RC_ANDROID_API_KEY"));

        if let Some(path) = non_empty(lookup("POCKET_COACH_DB")) {
            config.database_path = Some(PathBuf::from(path));
        }

        config
    }

    /// Whether replies come from the completion provider.
    pub fn real_chat_enabled(&self) -> bool {
        self.ai_mode == AiMode::Real && self.openai_api_key.is_some()
    }

    pub fn purchases_api_key(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Ios => self.purchases_ios_key.as_deref(),
            Platform::Android => self.purchases_android_key.as_deref(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
