use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::{debug, instrument};

use asciify_core::{OwnerId, PhotoRef};
use asciify_imaging::Palette;

use crate::types::{ClaimedJob, Session, SessionState};

/// In-memory map of owner → session, one session per owner.
///
/// Every check-then-mutate runs under the owner's shard lock, so two events
/// for the same owner can never interleave halfway through a transition.
/// No guard is ever held across an `.await`; callers get owned snapshots.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<OwnerId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the flow for `owner` with a fresh upload.
    ///
    /// Overwrites whatever was in progress. Returns the discarded state.
    #[instrument(skip(self, palette), fields(owner = %owner, photo = %photo))]
    pub fn begin(&self, owner: OwnerId, photo: PhotoRef, palette: Palette) -> SessionState {
        let state = SessionState::AwaitingPalette { photo, palette };
        let previous = self
            .sessions
            .insert(owner, Session::new(owner, state))
            .map(|s| s.state)
            .unwrap_or(SessionState::Idle);
        debug!(previous = previous.name(), "session started");
        previous
    }

    /// Current state for `owner`; `Idle` when there is no session.
    pub fn state(&self, owner: OwnerId) -> SessionState {
        self.sessions
            .get(&owner)
            .map(|s| s.state.clone())
            .unwrap_or(SessionState::Idle)
    }

    /// Snapshot of the full session record, if any.
    pub fn get(&self, owner: OwnerId) -> Option<Session> {
        self.sessions.get(&owner).map(|s| s.clone())
    }

    /// `AwaitingPalette` → `AwaitingAction` with `palette`.
    ///
    /// Returns `false` (and changes nothing) from any other state.
    #[instrument(skip(self, palette), fields(owner = %owner))]
    pub fn choose_palette(&self, owner: OwnerId, palette: Palette) -> bool {
        let Some(mut session) = self.sessions.get_mut(&owner) else {
            return false;
        };
        let photo = match &session.state {
            SessionState::AwaitingPalette { photo, .. } => photo.clone(),
            _ => return false,
        };

        session.state = SessionState::AwaitingAction { photo, palette };
        session.touch();
        debug!("palette chosen");
        true
    }

    /// Take the pending job out of an `AwaitingAction` session, clearing it.
    ///
    /// Claiming happens before any I/O: a photo uploaded while the job runs
    /// starts a new session instead of being paired with this job.
    #[instrument(skip(self), fields(owner = %owner))]
    pub fn claim(&self, owner: OwnerId) -> Option<ClaimedJob> {
        let (_, session) = self.sessions.remove_if(&owner, |_, s| {
            matches!(s.state, SessionState::AwaitingAction { .. })
        })?;

        match session.state {
            SessionState::AwaitingAction { photo, palette } => {
                debug!("job claimed");
                Some(ClaimedJob {
                    owner,
                    photo,
                    palette,
                })
            }
            _ => None,
        }
    }

    /// Drop the session for `owner`. Returns whether one existed.
    #[instrument(skip(self), fields(owner = %owner))]
    pub fn clear(&self, owner: OwnerId) -> bool {
        self.sessions.remove(&owner).is_some()
    }

    /// Drop the session for `owner` only if it still refers to `photo`.
    ///
    /// Used when a step for `photo` fails: a newer upload that landed in the
    /// meantime keeps its session.
    #[instrument(skip(self), fields(owner = %owner, photo = %photo))]
    pub fn discard(&self, owner: OwnerId, photo: &PhotoRef) -> bool {
        self.sessions
            .remove_if(&owner, |_, s| s.state.photo() == Some(photo))
            .is_some()
    }

    /// Remove sessions not updated since `now - max_idle`. Returns how many went.
    pub fn purge_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let cutoff = now - max_idle;
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.updated_at >= cutoff);
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            debug!(purged, "idle sessions purged");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn owner() -> OwnerId {
        OwnerId(42)
    }

    #[test]
    fn absent_owner_is_idle() {
        let store = SessionStore::new();
        assert_eq!(store.state(owner()), SessionState::Idle);
        assert!(store.get(owner()).is_none());
    }

    #[test]
    fn begin_enters_awaiting_palette_with_seed() {
        let store = SessionStore::new();
        let previous = store.begin(owner(), PhotoRef::new("p1"), Palette::default());
        assert_eq!(previous, SessionState::Idle);
        assert_eq!(
            store.state(owner()),
            SessionState::AwaitingPalette {
                photo: PhotoRef::new("p1"),
                palette: Palette::default(),
            }
        );
    }

    #[test]
    fn new_upload_overwrites_pending_action() {
        let store = SessionStore::new();
        store.begin(owner(), PhotoRef::new("old"), Palette::default());
        assert!(store.choose_palette(owner(), Palette::new("#.").unwrap()));

        let previous = store.begin(owner(), PhotoRef::new("new"), Palette::default());
        assert_eq!(previous.name(), "awaiting_action");
        match store.state(owner()) {
            SessionState::AwaitingPalette { photo, palette } => {
                assert_eq!(photo, PhotoRef::new("new"));
                assert_eq!(palette, Palette::default());
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn choose_palette_only_from_awaiting_palette() {
        let store = SessionStore::new();
        assert!(!store.choose_palette(owner(), Palette::default()));

        store.begin(owner(), PhotoRef::new("p"), Palette::default());
        assert!(store.choose_palette(owner(), Palette::new("ab").unwrap()));
        // Second text message while awaiting the menu is not a palette change.
        assert!(!store.choose_palette(owner(), Palette::new("cd").unwrap()));
        assert_eq!(
            store.state(owner()).palette(),
            Some(&Palette::new("ab").unwrap())
        );
    }

    #[test]
    fn claim_takes_job_and_clears() {
        let store = SessionStore::new();
        store.begin(owner(), PhotoRef::new("p"), Palette::default());
        assert!(store.claim(owner()).is_none(), "not yet awaiting action");

        store.choose_palette(owner(), Palette::new("xy").unwrap());
        let job = store.claim(owner()).expect("job");
        assert_eq!(job.photo, PhotoRef::new("p"));
        assert_eq!(job.palette, Palette::new("xy").unwrap());
        assert_eq!(store.state(owner()), SessionState::Idle);
        assert!(store.claim(owner()).is_none());
    }

    #[test]
    fn claim_from_awaiting_palette_keeps_session() {
        let store = SessionStore::new();
        store.begin(owner(), PhotoRef::new("p"), Palette::default());
        assert!(store.claim(owner()).is_none());
        assert_eq!(store.state(owner()).name(), "awaiting_palette");
    }

    #[test]
    fn sessions_are_isolated_per_owner() {
        let store = SessionStore::new();
        store.begin(OwnerId(1), PhotoRef::new("a"), Palette::default());
        store.begin(OwnerId(2), PhotoRef::new("b"), Palette::default());
        store.choose_palette(OwnerId(1), Palette::new("1").unwrap());

        assert_eq!(store.state(OwnerId(2)).palette(), Some(&Palette::default()));
        assert_eq!(store.state(OwnerId(2)).name(), "awaiting_palette");
        assert_eq!(store.state(OwnerId(1)).name(), "awaiting_action");
    }

    #[test]
    fn clear_reports_presence() {
        let store = SessionStore::new();
        assert!(!store.clear(owner()));
        store.begin(owner(), PhotoRef::new("p"), Palette::default());
        assert!(store.clear(owner()));
        assert!(store.is_empty());
    }

    #[test]
    fn discard_spares_a_newer_upload() {
        let store = SessionStore::new();
        store.begin(owner(), PhotoRef::new("new"), Palette::default());

        assert!(!store.discard(owner(), &PhotoRef::new("old")));
        assert_eq!(store.state(owner()).photo(), Some(&PhotoRef::new("new")));

        assert!(store.discard(owner(), &PhotoRef::new("new")));
        assert_eq!(store.state(owner()), SessionState::Idle);
        assert!(!store.discard(owner(), &PhotoRef::new("new")));
    }

    #[test]
    fn purge_idle_drops_only_stale_sessions() {
        let store = SessionStore::new();
        store.begin(OwnerId(1), PhotoRef::new("a"), Palette::default());
        store.begin(OwnerId(2), PhotoRef::new("b"), Palette::default());

        let now = Utc::now();
        assert_eq!(store.purge_idle(now, Duration::seconds(3600)), 0);
        assert_eq!(store.purge_idle(now + Duration::seconds(7200), Duration::seconds(3600)), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_claims_yield_one_job() {
        let store = Arc::new(SessionStore::new());
        store.begin(owner(), PhotoRef::new("p"), Palette::default());
        store.choose_palette(owner(), Palette::default());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.claim(owner()).is_some())
            })
            .collect();
        let claimed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|c| *c)
            .count();
        assert_eq!(claimed, 1);
    }
}
