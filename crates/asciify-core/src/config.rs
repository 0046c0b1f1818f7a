use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Built-in ASCII ramp, darkest-mapped first. The trailing space is the lightest cell.
pub const DEFAULT_PALETTE: &str = "@%#*+=-:. ";
/// Telegram caps a message at 4096 chars; the fence and escapes need headroom.
pub const DEFAULT_MESSAGE_BUDGET: usize = 4000;
pub const DEFAULT_ASCII_WIDTH: u32 = 40;
/// Terminal cells are roughly twice as tall as they are wide.
pub const DEFAULT_CHAR_ASPECT: f32 = 0.55;
pub const DEFAULT_PIXEL_BLOCK: u32 = 20;
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
/// Bot API download ceiling.
pub const DEFAULT_MAX_PHOTO_BYTES: u64 = 20 * 1024 * 1024;

/// Top-level config (asciify.toml + ASCIIFY_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AsciifyConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// `"*"`, `"@username"`, `"username"` or a numeric user id.
    #[serde(default = "default_allow_users")]
    pub allow_users: Vec<String>,
    #[serde(default = "default_max_photo_bytes")]
    pub max_photo_bytes: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            allow_users: default_allow_users(),
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
        }
    }
}

/// Knobs for the transformation pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Columns of ASCII art.
    #[serde(default = "default_ascii_width")]
    pub ascii_width: u32,
    /// Vertical squash applied to the ASCII path so the art is not stretched.
    #[serde(default = "default_char_aspect")]
    pub char_aspect: f32,
    /// Maximum characters in one rendered text block.
    #[serde(default = "default_message_budget")]
    pub message_budget: usize,
    /// Edge length of a mosaic block, in source pixels.
    #[serde(default = "default_pixel_block")]
    pub pixel_block: u32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Seed palette for new sessions. Used verbatim, never trimmed.
    #[serde(default = "default_palette")]
    pub default_palette: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ascii_width: DEFAULT_ASCII_WIDTH,
            char_aspect: DEFAULT_CHAR_ASPECT,
            message_budget: DEFAULT_MESSAGE_BUDGET,
            pixel_block: DEFAULT_PIXEL_BLOCK,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            default_palette: DEFAULT_PALETTE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Sessions untouched for this long are dropped by the sweeper.
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: default_idle_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_allow_users() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_max_photo_bytes() -> u64 {
    DEFAULT_MAX_PHOTO_BYTES
}
fn default_ascii_width() -> u32 {
    DEFAULT_ASCII_WIDTH
}
fn default_char_aspect() -> f32 {
    DEFAULT_CHAR_ASPECT
}
fn default_message_budget() -> usize {
    DEFAULT_MESSAGE_BUDGET
}
fn default_pixel_block() -> u32 {
    DEFAULT_PIXEL_BLOCK
}
fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}
fn default_palette() -> String {
    DEFAULT_PALETTE.to_string()
}
fn default_idle_ttl_secs() -> u64 {
    3600
}
fn default_sweep_interval_secs() -> u64 {
    300
}

impl AsciifyConfig {
    /// Load config from a TOML file with ASCIIFY_* env var overrides.
    ///
    /// Nested keys use a double underscore, e.g. `ASCIIFY_RENDER__ASCII_WIDTH=60`.
    /// A missing file is not an error; every field has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        tracing::debug!(path = %path, "loading config");

        let config: AsciifyConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("ASCIIFY_").split("__"))
            .extract()
            .map_err(|e| crate::error::AsciifyError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipelines cannot work with.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AsciifyError::Config;

        let r = &self.render;
        if r.default_palette.is_empty() {
            return Err(Config("render.default_palette must not be empty".into()));
        }
        if r.ascii_width == 0 {
            return Err(Config("render.ascii_width must be at least 1".into()));
        }
        if !(r.char_aspect.is_finite() && r.char_aspect > 0.0) {
            return Err(Config("render.char_aspect must be a positive number".into()));
        }
        if r.message_budget < 2 * r.ascii_width as usize + 1 {
            return Err(Config(format!(
                "render.message_budget ({}) cannot hold a single row of {} chars",
                r.message_budget, r.ascii_width
            )));
        }
        if r.pixel_block == 0 {
            return Err(Config("render.pixel_block must be at least 1".into()));
        }
        if !(1..=100).contains(&r.jpeg_quality) {
            return Err(Config("render.jpeg_quality must be within 1..=100".into()));
        }
        if self.sessions.sweep_interval_secs == 0 {
            return Err(Config("sessions.sweep_interval_secs must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_config_path() -> String {
    if let Ok(path) = std::env::var("ASCIIFY_CONFIG") {
        return path;
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.asciify/asciify.toml", home)
}
