//! [`Gateway`] over the Telegram Bot API.

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile};
use tracing::warn;

use asciify_channels::{ChannelError, Gateway, MenuOption, MessageFormat, OutboundText};
use asciify_core::{OwnerId, PhotoRef};

use crate::send;

pub struct TelegramGateway {
    bot: Bot,
    max_photo_bytes: u64,
}

impl TelegramGateway {
    pub fn new(bot: Bot, max_photo_bytes: u64) -> Self {
        Self {
            bot,
            max_photo_bytes,
        }
    }
}

/// One row of buttons, in the order given.
pub fn action_keyboard(options: &[MenuOption]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![options
        .iter()
        .map(|o| InlineKeyboardButton::callback(o.label(), o.callback_data()))
        .collect::<Vec<_>>()])
}

fn chat(owner: OwnerId) -> ChatId {
    ChatId(owner.get())
}

fn send_failed(e: teloxide::RequestError) -> ChannelError {
    ChannelError::SendFailed(e.to_string())
}

#[async_trait]
impl Gateway for TelegramGateway {
    fn name(&self) -> &str {
        "telegram"
    }

    /// `get_file` + `download_file`, refusing anything over the size ceiling
    /// before downloading it.
    async fn fetch_photo(&self, photo: &PhotoRef) -> Result<Vec<u8>, ChannelError> {
        let file = self.bot.get_file(photo.as_str()).await.map_err(|e| {
            warn!(file_id = %photo, error = %e, "Telegram: get_file failed");
            ChannelError::FetchFailed(e.to_string())
        })?;

        let size = u64::from(file.size);
        if size > self.max_photo_bytes {
            return Err(ChannelError::TooLarge {
                size,
                max: self.max_photo_bytes,
            });
        }

        let mut buf: Vec<u8> = Vec::with_capacity(size as usize);
        self.bot
            .download_file(&file.path, &mut buf)
            .await
            .map_err(|e| {
                warn!(file_id = %photo, error = %e, "Telegram: download_file failed");
                ChannelError::FetchFailed(e.to_string())
            })?;
        Ok(buf)
    }

    async fn send_text(&self, owner: OwnerId, text: &OutboundText) -> Result<(), ChannelError> {
        match text.format {
            MessageFormat::PlainText => send::send_plain(&self.bot, chat(owner), &text.content).await,
            MessageFormat::Preformatted => {
                send::send_preformatted(&self.bot, chat(owner), &text.content).await
            }
        }
        .map_err(send_failed)
    }

    async fn send_image(&self, owner: OwnerId, image: Vec<u8>) -> Result<(), ChannelError> {
        let photo = InputFile::memory(image).file_name("result.jpg");
        self.bot
            .send_photo(chat(owner), photo)
            .await
            .map_err(send_failed)?;
        Ok(())
    }

    async fn prompt_action_menu(
        &self,
        owner: OwnerId,
        prompt: &str,
        options: &[MenuOption],
    ) -> Result<(), ChannelError> {
        self.bot
            .send_message(chat(owner), prompt)
            .reply_markup(action_keyboard(options))
            .await
            .map_err(send_failed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn keyboard_has_one_button_per_option() {
        let keyboard = action_keyboard(&MenuOption::ALL);
        assert_eq!(keyboard.inline_keyboard.len(), 1);

        let row = &keyboard.inline_keyboard[0];
        let labels: Vec<&str> = row.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(labels, ["Pixelate", "ASCII Art", "Negative"]);

        let data: Vec<String> = row
            .iter()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(d) => Some(d.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(data, ["pixelate", "ascii", "negative"]);
    }
}
