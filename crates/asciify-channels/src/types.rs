use serde::{Deserialize, Serialize};

use asciify_core::{OwnerId, PhotoRef};

/// The transformations offered in the action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuOption {
    Pixelate,
    Ascii,
    Negative,
}

impl MenuOption {
    /// Menu order.
    pub const ALL: [MenuOption; 3] = [MenuOption::Pixelate, MenuOption::Ascii, MenuOption::Negative];

    /// Payload attached to the inline button.
    pub fn callback_data(self) -> &'static str {
        match self {
            Self::Pixelate => "pixelate",
            Self::Ascii => "ascii",
            Self::Negative => "negative",
        }
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.callback_data() == data)
    }

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pixelate => "Pixelate",
            Self::Ascii => "ASCII Art",
            Self::Negative => "Negative",
        }
    }

    /// Short acknowledgement shown when the button is tapped.
    pub fn progress_text(self) -> &'static str {
        match self {
            Self::Pixelate => "Pixelating your image...",
            Self::Ascii => "Converting your image to ASCII art...",
            Self::Negative => "Converting your image to negative...",
        }
    }
}

/// Slash commands understood outside the photo flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Cancel,
}

impl BotCommand {
    /// Parse `/start`, `/help`, `/cancel`, tolerating a `@botname` suffix and arguments.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.trim().split_whitespace().next()?;
        let word = word.strip_prefix('/')?;
        let name = word.split('@').next().unwrap_or(word);
        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// One inbound event, already reduced to what the flow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    PhotoUploaded { owner: OwnerId, photo: PhotoRef },
    TextReceived { owner: OwnerId, text: String },
    MenuSelected { owner: OwnerId, option: MenuOption },
    Command { owner: OwnerId, command: BotCommand },
}

impl InboundEvent {
    pub fn owner(&self) -> OwnerId {
        match self {
            Self::PhotoUploaded { owner, .. }
            | Self::TextReceived { owner, .. }
            | Self::MenuSelected { owner, .. }
            | Self::Command { owner, .. } => *owner,
        }
    }
}

/// Formatting hint for outbound text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFormat {
    #[default]
    PlainText,

    /// Monospaced block; whitespace and line structure must survive delivery.
    Preformatted,
}

/// A text reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundText {
    pub content: String,
    pub format: MessageFormat,
}

impl OutboundText {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            format: MessageFormat::PlainText,
        }
    }

    pub fn preformatted(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            format: MessageFormat::Preformatted,
        }
    }
}
