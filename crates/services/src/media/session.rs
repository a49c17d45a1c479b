use std::sync::{Arc, Mutex, MutexGuard};

use url::Url;

use course_core::model::{LessonId, PlaybackSessionId, StreamLocator};

use super::gateway::MediaGateway;

/// Handle to the one live playback session.
///
/// Ephemeral: minted on `open`, dead after `dispose`. The playback URL
/// points at the local gateway, never at the backend directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSession {
    id: PlaybackSessionId,
    lesson_id: LessonId,
    source: StreamLocator,
    playback_url: Url,
}

impl PlaybackSession {
    #[must_use]
    pub fn id(&self) -> PlaybackSessionId {
        self.id
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn source(&self) -> &StreamLocator {
        &self.source
    }

    #[must_use]
    pub fn playback_url(&self) -> &Url {
        &self.playback_url
    }
}

/// Owns the single live `PlaybackSession`.
///
/// The playback mount is exclusive, so the prior session is always removed
/// from the gateway before the next one is registered — the ordering is
/// internal, callers cannot get it wrong. Re-opening the current lesson
/// with an unchanged source returns the existing handle, so an unrelated
/// re-render never restarts playback.
pub struct MediaSessionManager {
    gateway: Arc<MediaGateway>,
    current: Mutex<Option<PlaybackSession>>,
}

impl MediaSessionManager {
    #[must_use]
    pub fn new(gateway: Arc<MediaGateway>) -> Self {
        Self {
            gateway,
            current: Mutex::new(None),
        }
    }

    /// Opens a session for the lesson, disposing any prior session for a
    /// different lesson first.
    pub fn open(&self, lesson_id: &LessonId, source: &StreamLocator) -> PlaybackSession {
        let mut current = self.lock_current();

        if let Some(session) = current.as_ref() {
            if session.lesson_id == *lesson_id && session.source == *source {
                return session.clone();
            }
            self.gateway.remove_session(session.id);
        }

        let id = PlaybackSessionId::new();
        self.gateway.register_session(id, source.as_url().clone());
        let session = PlaybackSession {
            id,
            lesson_id: lesson_id.clone(),
            source: source.clone(),
            playback_url: self.gateway.playback_url(id),
        };
        *current = Some(session.clone());
        session
    }

    /// Disposes the live session, if any. Synchronous: once this returns,
    /// the gateway answers `410 Gone` for the old session id.
    pub fn dispose_current(&self) {
        if let Some(session) = self.lock_current().take() {
            self.gateway.remove_session(session.id);
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<PlaybackSession> {
        self.lock_current().clone()
    }

    /// Registered session count on the gateway; never exceeds one under
    /// this manager's ownership.
    #[must_use]
    pub fn live_sessions(&self) -> usize {
        self.gateway.session_count()
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<PlaybackSession>> {
        match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use api::CredentialStore;

    async fn manager() -> MediaSessionManager {
        let gateway = MediaGateway::start(CredentialStore::new())
            .await
            .expect("gateway start");
        MediaSessionManager::new(gateway)
    }

    fn locator(path: &str) -> StreamLocator {
        StreamLocator::parse(format!("https://media.example.com/{path}/master.m3u8")).unwrap()
    }

    #[tokio::test]
    async fn reopening_the_same_lesson_keeps_the_session() {
        let manager = manager().await;
        let lesson = LessonId::new("L1");
        let source = locator("L1");

        let first = manager.open(&lesson, &source);
        let second = manager.open(&lesson, &source);

        assert_eq!(first.id(), second.id());
        assert_eq!(manager.live_sessions(), 1);
    }

    #[tokio::test]
    async fn switching_lessons_disposes_the_prior_session() {
        let manager = manager().await;

        let first = manager.open(&LessonId::new("L1"), &locator("L1"));
        let second = manager.open(&LessonId::new("L2"), &locator("L2"));

        assert_ne!(first.id(), second.id());
        assert_eq!(manager.live_sessions(), 1);
        assert_eq!(
            manager.current().map(|s| s.lesson_id().clone()),
            Some(LessonId::new("L2"))
        );
    }

    #[tokio::test]
    async fn changed_source_for_the_same_lesson_recreates_the_session() {
        let manager = manager().await;
        let lesson = LessonId::new("L1");

        let first = manager.open(&lesson, &locator("L1"));
        let second = manager.open(&lesson, &locator("L1-remastered"));

        assert_ne!(first.id(), second.id());
        assert_eq!(manager.live_sessions(), 1);
    }

    #[tokio::test]
    async fn dispose_clears_the_registration() {
        let manager = manager().await;
        manager.open(&LessonId::new("L1"), &locator("L1"));

        manager.dispose_current();

        assert!(manager.current().is_none());
        assert_eq!(manager.live_sessions(), 0);
    }

    #[tokio::test]
    async fn playback_url_targets_the_local_gateway() {
        let manager = manager().await;
        let session = manager.open(&LessonId::new("L1"), &locator("L1"));

        let url = session.playback_url();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert!(url.path().ends_with("/manifest.m3u8"));
        assert!(url.path().contains(&session.id().to_string()));
    }
}
