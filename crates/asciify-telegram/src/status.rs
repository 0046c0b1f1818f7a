//! Chat action indicator ("sending photo…", "typing…") while a request runs.
//!
//! Telegram clears the status after ~5 seconds, so it is refreshed every 4s
//! until `stop()` aborts the loop.

use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::ChatAction;

use asciify_channels::MenuOption;

/// Which indicator fits the reply a menu option produces.
pub fn action_for(option: MenuOption) -> ChatAction {
    match option {
        MenuOption::Ascii => ChatAction::Typing,
        MenuOption::Pixelate | MenuOption::Negative => ChatAction::UploadPhoto,
    }
}

/// Handle to a background chat action task.
pub struct StatusHandle(tokio::task::JoinHandle<()>);

impl StatusHandle {
    pub fn start(bot: Bot, chat_id: ChatId, action: ChatAction) -> Self {
        let handle = tokio::spawn(async move {
            loop {
                let _ = bot.send_chat_action(chat_id, action).await;
                tokio::time::sleep(Duration::from_secs(4)).await;
            }
        });
        StatusHandle(handle)
    }

    pub fn stop(self) {
        self.0.abort();
    }
}
