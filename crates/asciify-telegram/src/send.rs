//! Message sending helpers for the Telegram adapter.
//!
//! Preformatted text goes out as a MarkdownV2 code block. If Telegram rejects
//! the parse mode, or escaping pushed the message past the 4096-char limit,
//! the same text is resent as plain text.

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::warn;

/// Telegram's hard limit on message length, in characters.
pub const MESSAGE_MAX: usize = 4096;

/// Escape text for use inside a MarkdownV2 ``` block.
///
/// Inside pre/code entities only `` ` `` and `\` need escaping.
pub fn escape_code_block(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        if ch == '`' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Wrap `text` in a MarkdownV2 code fence, or `None` if it would not fit.
pub fn fenced(text: &str) -> Option<String> {
    let body = format!("```\n{}\n```", escape_code_block(text));
    (body.chars().count() <= MESSAGE_MAX).then_some(body)
}

pub async fn send_plain(bot: &Bot, chat_id: ChatId, text: &str) -> ResponseResult<()> {
    bot.send_message(chat_id, text).await?;
    Ok(())
}

/// Send `text` as a monospaced block, falling back to plain text.
pub async fn send_preformatted(bot: &Bot, chat_id: ChatId, text: &str) -> ResponseResult<()> {
    if let Some(body) = fenced(text) {
        match bot
            .send_message(chat_id, body)
            .parse_mode(ParseMode::MarkdownV2)
            .await
        {
            Ok(_) => return Ok(()),
            Err(e) => warn!(error = %e, "Telegram: MarkdownV2 rejected, resending as plain text"),
        }
    }
    send_plain(bot, chat_id, text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_backtick_and_backslash_only() {
        assert_eq!(escape_code_block("a`b\\c"), "a\\`b\\\\c");
        assert_eq!(escape_code_block("@%#*+=-:. _[]()"), "@%#*+=-:. _[]()");
    }

    #[test]
    fn fence_wraps_art() {
        assert_eq!(fenced("@#\n. ").unwrap(), "```\n@#\n. \n```");
    }

    #[test]
    fn full_budget_art_still_fits_when_fenced() {
        let art = "#".repeat(4000);
        assert!(fenced(&art).is_some());
    }

    #[test]
    fn escaped_art_over_limit_is_not_fenced() {
        let art = "\\".repeat(4000);
        assert!(fenced(&art).is_none());
    }
}
