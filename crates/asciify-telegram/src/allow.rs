//! Who may talk to the bot.
//!
//! `allow_users` entries are `"*"`, a username (with or without `@`) or a
//! numeric user id. Usernames compare case-sensitively. No entries, no access.

use teloxide::types::User;

/// Whether `user` matches any entry of `allow_users`.
pub fn is_allowed(allow_users: &[String], user: &User) -> bool {
    let username = user.username.as_deref().unwrap_or("");
    let id = user.id.0.to_string();
    allow_users
        .iter()
        .any(|entry| entry_matches(entry, username, &id))
}

fn entry_matches(entry: &str, username: &str, id: &str) -> bool {
    match entry.trim_start_matches('@') {
        "*" => true,
        "" => false,
        name => name == username || name == id,
    }
}
