use chrono::{DateTime, Utc};

use asciify_core::{OwnerId, PhotoRef};
use asciify_imaging::Palette;

/// Where an owner is in the upload → palette → action flow.
///
/// Each variant carries only the fields that are valid at that step, so a
/// pending action can never be read without a photo behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No request in flight. Never stored; the store reports it for absent owners.
    Idle,
    /// Photo received; waiting for the palette text. `palette` is the seed.
    AwaitingPalette { photo: PhotoRef, palette: Palette },
    /// Palette chosen; waiting for a menu tap.
    AwaitingAction { photo: PhotoRef, palette: Palette },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingPalette { .. } => "awaiting_palette",
            Self::AwaitingAction { .. } => "awaiting_action",
        }
    }

    pub fn photo(&self) -> Option<&PhotoRef> {
        match self {
            Self::Idle => None,
            Self::AwaitingPalette { photo, .. } | Self::AwaitingAction { photo, .. } => Some(photo),
        }
    }

    pub fn palette(&self) -> Option<&Palette> {
        match self {
            Self::Idle => None,
            Self::AwaitingPalette { palette, .. } | Self::AwaitingAction { palette, .. } => {
                Some(palette)
            }
        }
    }
}

/// One owner's in-flight request.
#[derive(Debug, Clone)]
pub struct Session {
    pub owner: OwnerId,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(owner: OwnerId, state: SessionState) -> Self {
        let now = Utc::now();
        Self {
            owner,
            state,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Everything needed to run a chosen transformation, detached from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedJob {
    pub owner: OwnerId,
    pub photo: PhotoRef,
    pub palette: Palette,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_has_no_photo() {
        assert!(SessionState::Idle.photo().is_none());
        assert!(SessionState::Idle.palette().is_none());
    }

    #[test]
    fn awaiting_states_expose_photo() {
        let state = SessionState::AwaitingAction {
            photo: PhotoRef::new("file-1"),
            palette: Palette::default(),
        };
        assert_eq!(state.photo(), Some(&PhotoRef::new("file-1")));
        assert_eq!(state.name(), "awaiting_action");
    }
}
