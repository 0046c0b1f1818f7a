//! Telegram channel adapter.
//!
//! Wraps a teloxide `Bot` + `Dispatcher` and drives the long-polling event loop
//! until the process is stopped.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::info;

use asciify_core::config::{RenderConfig, TelegramConfig};
use asciify_flow::Conversation;
use asciify_sessions::SessionStore;

use crate::error::TelegramError;
use crate::gateway::TelegramGateway;
use crate::handler::{handle_callback, handle_message, Flow};

pub struct TelegramAdapter {
    config: TelegramConfig,
    render: RenderConfig,
    sessions: Arc<SessionStore>,
}

impl TelegramAdapter {
    pub fn new(config: &TelegramConfig, render: RenderConfig, sessions: Arc<SessionStore>) -> Self {
        Self {
            config: config.clone(),
            render,
            sessions,
        }
    }

    /// Connect to Telegram and drive the long-polling loop until Ctrl-C.
    pub async fn run(self) -> Result<(), TelegramError> {
        let token = self.config.bot_token.trim();
        if token.is_empty() {
            return Err(TelegramError::NoToken);
        }

        let bot = Bot::new(token);
        let gateway = Arc::new(TelegramGateway::new(bot.clone(), self.config.max_photo_bytes));
        let flow: Flow = Arc::new(Conversation::new(gateway, self.sessions, self.render)?);
        let config = self.config;

        info!("Telegram: starting long-polling dispatcher");

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handle_message))
            .branch(Update::filter_callback_query().endpoint(handle_callback));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![flow, config])
            .default_handler(|_upd| async {})
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Telegram: dispatcher stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_token_is_refused_before_connecting() {
        let config = TelegramConfig {
            bot_token: "  ".into(),
            ..TelegramConfig::default()
        };
        let adapter = TelegramAdapter::new(&config, RenderConfig::default(), Arc::default());
        assert!(matches!(adapter.run().await, Err(TelegramError::NoToken)));
    }
}
