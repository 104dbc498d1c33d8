//! Application-wide constants

pub mod ai {
    /// Default model used when no config or env override is present
    pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
    /// Maximum output tokens per model call. Full pages are large.
    pub const MAX_OUTPUT_TOKENS: usize = 16_000;
    /// Default Anthropic-compatible messages endpoint
    pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
    pub const ANTHROPIC_VERSION: &str = "2023-06-01";
    /// Upper bound on model round-trips for one generation
    pub const MAX_TURNS: usize = 40;
}

pub mod paths {
    pub const CONFIG_DIR_NAME: &str = ".sitesmith";
    pub const CONFIG_FILE_NAME: &str = "config.toml";
    pub const LOG_FILE_NAME: &str = "sitesmith.log";
}
