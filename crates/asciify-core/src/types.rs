use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the chat a session belongs to.
///
/// For Telegram this is the numeric chat id; private chats share it with the user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub i64);

impl OwnerId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OwnerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Opaque handle to an uploaded photo in the transport's media store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoRef(pub String);

impl PhotoRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PhotoRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PhotoRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_displays_raw_number() {
        assert_eq!(OwnerId(-100_123).to_string(), "-100123");
    }

    #[test]
    fn photo_ref_from_str() {
        let photo: PhotoRef = "AgACAgIAAxkBAAIB".into();
        assert_eq!(photo.as_str(), "AgACAgIAAxkBAAIB");
    }
}
