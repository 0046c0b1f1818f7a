//! Message and callback handlers registered in the teloxide Dispatcher.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{debug, warn};

use asciify_channels::{BotCommand, InboundEvent, MenuOption};
use asciify_core::config::TelegramConfig;
use asciify_core::{OwnerId, PhotoRef};
use asciify_flow::Conversation;
use asciify_sessions::SessionState;

use crate::allow;
use crate::gateway::TelegramGateway;
use crate::status::{self, StatusHandle};

pub type Flow = Arc<Conversation<TelegramGateway>>;

/// Handler for every incoming `Message`.
///
/// 1. Bot-message filter
/// 2. Allowlist check
/// 3. Reduce the message to an [`InboundEvent`]
/// 4. Hand it to the conversation
pub async fn handle_message(
    msg: Message,
    flow: Flow,
    config: TelegramConfig,
) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    if from.is_bot {
        return Ok(());
    }

    if !allow::is_allowed(&config.allow_users, from) {
        debug!(user_id = from.id.0, "Telegram: user not in allowlist");
        return Ok(());
    }

    let owner = OwnerId(msg.chat.id.0);
    let Some(event) = inbound_event(owner, upload_of(&msg), msg.text()) else {
        return Ok(());
    };

    let outcome = flow.handle(event).await;
    debug!(owner = %owner, outcome = ?outcome, "Telegram: message handled");
    Ok(())
}

/// Handler for inline keyboard taps.
///
/// A tap on a pending menu is acknowledged with a progress toast and the
/// transformation runs in its own task, with a chat action shown until the
/// result is out. Any other tap gets an empty acknowledgement.
pub async fn handle_callback(
    bot: Bot,
    query: CallbackQuery,
    flow: Flow,
    config: TelegramConfig,
) -> ResponseResult<()> {
    if !allow::is_allowed(&config.allow_users, &query.from) {
        bot.answer_callback_query(&query.id).await?;
        return Ok(());
    }

    let option = query.data.as_deref().and_then(MenuOption::from_callback_data);
    let chat_id = query.message.as_ref().map(|m| m.chat().id);
    let (Some(option), Some(chat_id)) = (option, chat_id) else {
        bot.answer_callback_query(&query.id).await?;
        return Ok(());
    };

    let owner = OwnerId(chat_id.0);
    let pending = matches!(
        flow.sessions().state(owner),
        SessionState::AwaitingAction { .. }
    );
    let answer = bot.answer_callback_query(&query.id);
    let answer = match callback_toast(option, pending) {
        Some(text) => answer.text(text).await,
        None => answer.await,
    };
    if let Err(e) = answer {
        warn!(owner = %owner, error = %e, "Telegram: answer_callback_query failed");
    }

    let event = InboundEvent::MenuSelected { owner, option };
    if !pending {
        // The flow ignores taps without a pending action.
        let outcome = flow.handle(event).await;
        debug!(owner = %owner, outcome = ?outcome, "Telegram: stale menu tap");
        return Ok(());
    }

    tokio::spawn(async move {
        let status = StatusHandle::start(bot, chat_id, status::action_for(option));
        let outcome = flow.handle(event).await;
        status.stop();
        debug!(owner = %owner, outcome = ?outcome, "Telegram: menu tap handled");
    });

    Ok(())
}

/// Toast for a menu tap. Stale taps are acknowledged silently so the button
/// stops spinning without producing any output.
fn callback_toast(option: MenuOption, pending: bool) -> Option<&'static str> {
    pending.then(|| option.progress_text())
}

/// The photo in a message: the largest size of a photo, or an image document.
fn upload_of(msg: &Message) -> Option<PhotoRef> {
    if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        return Some(PhotoRef::new(photo.file.id.clone()));
    }

    let doc = msg.document()?;
    let mime = doc.mime_type.as_ref().map(|m| m.as_ref());
    is_image_mime(mime).then(|| PhotoRef::new(doc.file.id.clone()))
}

fn is_image_mime(mime: Option<&str>) -> bool {
    mime.is_some_and(|m| m.starts_with("image/"))
}

/// Reduce the parts of a message the flow cares about to one event.
///
/// An upload wins over any caption; a known slash command wins over plain
/// text. Unknown commands pass through as text.
fn inbound_event(
    owner: OwnerId,
    upload: Option<PhotoRef>,
    text: Option<&str>,
) -> Option<InboundEvent> {
    if let Some(photo) = upload {
        return Some(InboundEvent::PhotoUploaded { owner, photo });
    }

    let text = text?;
    if let Some(command) = BotCommand::parse(text) {
        return Some(InboundEvent::Command { owner, command });
    }
    Some(InboundEvent::TextReceived {
        owner,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId(7)
    }

    #[test]
    fn upload_takes_precedence_over_caption() {
        let event = inbound_event(owner(), Some(PhotoRef::new("f1")), Some("/help"));
        assert_eq!(
            event,
            Some(InboundEvent::PhotoUploaded {
                owner: owner(),
                photo: PhotoRef::new("f1"),
            })
        );
    }

    #[test]
    fn commands_are_recognised() {
        let event = inbound_event(owner(), None, Some("/cancel@asciify_bot"));
        assert_eq!(
            event,
            Some(InboundEvent::Command {
                owner: owner(),
                command: BotCommand::Cancel,
            })
        );
    }

    #[test]
    fn unknown_command_is_plain_text() {
        let event = inbound_event(owner(), None, Some("/#@."));
        assert_eq!(
            event,
            Some(InboundEvent::TextReceived {
                owner: owner(),
                text: "/#@.".into(),
            })
        );
    }

    #[test]
    fn text_keeps_its_whitespace() {
        match inbound_event(owner(), None, Some(" @#. ")) {
            Some(InboundEvent::TextReceived { text, .. }) => assert_eq!(text, " @#. "),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nothing_to_handle() {
        assert_eq!(inbound_event(owner(), None, None), None);
    }

    #[test]
    fn stale_menu_tap_has_no_toast() {
        assert_eq!(callback_toast(MenuOption::Ascii, false), None);
        assert_eq!(
            callback_toast(MenuOption::Pixelate, true),
            Some("Pixelating your image...")
        );
    }

    #[test]
    fn only_image_documents_count_as_uploads() {
        assert!(is_image_mime(Some("image/png")));
        assert!(is_image_mime(Some("image/webp")));
        assert!(!is_image_mime(Some("application/pdf")));
        assert!(!is_image_mime(None));
    }
}
