/// Application name
pub const APP_NAME: &str = "Pocket Coach";

/// Namespace prefix for every persisted key
pub const STORAGE_KEY_PREFIX: &str = "@pocketcoach/";

/// Messages a user without the pro entitlement may send per calendar day
pub const FREE_DAILY_MESSAGES: u32 = 3;

/// Entitlement identifier granting paid-tier access
pub const PRO_ENTITLEMENT_ID: &str = "pro";

/// Trailing history turns forwarded to the completion provider
pub const MAX_HISTORY_MESSAGES: usize = 20;

/// Number of starter prompts every built-in coach carries
pub const STARTER_PROMPT_COUNT: usize = 5;

/// Prefix of generated custom coach ids
pub const CUSTOM_COACH_ID_PREFIX: &str = "custom-";

/// Assistant turn recorded when a reply could not be produced
pub const SEND_FAILED_MESSAGE: &str = "Something went wrong. Try again in a moment.";

/// Characters of the last assistant turn quoted by a quick prompt
pub const QUICK_PROMPT_CONTEXT_CHARS: usize = 100;
