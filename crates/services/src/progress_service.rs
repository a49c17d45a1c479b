use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use api::ProgressApi;
use course_core::model::{CourseId, LessonId, ProgressSnapshot};

use crate::error::ProgressError;

/// What happened to a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The backend accepted the record and the snapshot was refetched.
    Submitted,
    /// A submission for the same lesson was already in flight; this call was
    /// dropped, not queued — the in-flight success makes it moot.
    Suppressed,
}

/// Client-side view of lesson completion for one enrollment.
///
/// The server stays authoritative: a successful completion invalidates the
/// cached snapshot and refetches it, so completion state and the aggregate
/// percentage always come from the source of truth. There is no optimistic
/// local flip — a rejected submission (enrollment revoked mid-session, say)
/// leaves the cache exactly as the server sees it.
pub struct ProgressService {
    course_id: CourseId,
    api: Arc<dyn ProgressApi>,
    snapshot: Mutex<ProgressSnapshot>,
    pending: Mutex<HashSet<LessonId>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(course_id: CourseId, api: Arc<dyn ProgressApi>) -> Self {
        Self {
            course_id,
            api,
            snapshot: Mutex::new(ProgressSnapshot::default()),
            pending: Mutex::new(HashSet::new()),
        }
    }

    /// Refetch the snapshot from the backend.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` when the fetch fails; the previous snapshot is
    /// kept in that case.
    pub async fn refresh(&self) -> Result<(), ProgressError> {
        let snapshot = self.api.progress(&self.course_id).await?;
        *self.lock_snapshot() = snapshot;
        Ok(())
    }

    /// True iff the server has recorded the lesson as completed. Unknown
    /// lessons are simply not complete; this never fails.
    #[must_use]
    pub fn is_complete(&self, lesson_id: &LessonId) -> bool {
        self.lock_snapshot().is_complete(lesson_id)
    }

    /// Aggregate percentage in `[0, 100]`, exactly as the backend reported
    /// it. The server owns weighting and rounding.
    #[must_use]
    pub fn percentage(&self) -> f32 {
        self.lock_snapshot().percent()
    }

    /// Recorded watch time for a lesson, zero when unknown.
    #[must_use]
    pub fn watch_time_secs(&self, lesson_id: &LessonId) -> u32 {
        self.lock_snapshot().watch_time_secs(lesson_id)
    }

    /// True while a completion submission for this lesson is in flight.
    /// Feeds the UI's disabled state.
    #[must_use]
    pub fn is_pending(&self, lesson_id: &LessonId) -> bool {
        self.lock_pending().contains(lesson_id)
    }

    /// Send a completion record for the lesson.
    ///
    /// Per-lesson submissions are serialized: a second call while the first
    /// is still in flight returns `Suppressed` without touching the network.
    /// Submissions for *different* lessons may run concurrently. Repeat
    /// calls after success go through — the backend no-ops on duplicates.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` when the submission or the follow-up refetch
    /// fails. The pending flag is cleared either way.
    pub async fn mark_complete(
        &self,
        lesson_id: &LessonId,
        watch_time_secs: u32,
    ) -> Result<CompletionOutcome, ProgressError> {
        if !self.lock_pending().insert(lesson_id.clone()) {
            tracing::debug!(lesson = %lesson_id, "completion already in flight, suppressing");
            return Ok(CompletionOutcome::Suppressed);
        }

        let result = self.submit_and_refresh(lesson_id, watch_time_secs).await;
        self.lock_pending().remove(lesson_id);

        match result {
            Ok(()) => {
                tracing::info!(lesson = %lesson_id, "completion recorded");
                Ok(CompletionOutcome::Submitted)
            }
            Err(err) => {
                tracing::warn!(lesson = %lesson_id, error = %err, "completion failed");
                Err(err)
            }
        }
    }

    async fn submit_and_refresh(
        &self,
        lesson_id: &LessonId,
        watch_time_secs: u32,
    ) -> Result<(), ProgressError> {
        self.api.complete_lesson(lesson_id, watch_time_secs).await?;
        self.refresh().await
    }

    fn lock_snapshot(&self) -> MutexGuard<'_, ProgressSnapshot> {
        match self.snapshot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashSet<LessonId>> {
        match self.pending.lock() {
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
    use api::InMemoryApi;
    use course_core::model::{Course, Lesson, Section, SectionId};

    fn course() -> Course {
        let lessons = vec![
            Lesson::text(LessonId::new("L1"), "One", "body", Vec::new()).unwrap(),
            Lesson::text(LessonId::new("L2"), "Two", "body", Vec::new()).unwrap(),
        ];
        let section = Section::new(SectionId::new("s1"), "Only", lessons).unwrap();
        Course::new(CourseId::new("c1"), "Course", vec![section]).unwrap()
    }

    fn service(api: &InMemoryApi) -> ProgressService {
        ProgressService::new(CourseId::new("c1"), Arc::new(api.clone()))
    }

    #[tokio::test]
    async fn refresh_adopts_the_server_snapshot() {
        let api = InMemoryApi::new(course());
        let service = service(&api);

        assert!(!service.is_complete(&LessonId::new("L1")));

        api.complete_lesson(&LessonId::new("L1"), 30).await.unwrap();
        service.refresh().await.unwrap();

        assert!(service.is_complete(&LessonId::new("L1")));
        assert_eq!(service.percentage(), 50.0);
        assert_eq!(service.watch_time_secs(&LessonId::new("L1")), 30);
    }

    #[tokio::test]
    async fn mark_complete_refetches_authoritative_state() {
        let api = InMemoryApi::new(course());
        let service = service(&api);

        let outcome = service
            .mark_complete(&LessonId::new("L1"), 120)
            .await
            .unwrap();

        assert_eq!(outcome, CompletionOutcome::Submitted);
        assert!(service.is_complete(&LessonId::new("L1")));
        assert!(!service.is_pending(&LessonId::new("L1")));
        assert_eq!(api.completion_calls(), 1);
    }

    #[tokio::test]
    async fn repeat_after_success_is_allowed_and_idempotent() {
        let api = InMemoryApi::new(course());
        let service = service(&api);
        let lesson = LessonId::new("L1");

        service.mark_complete(&lesson, 120).await.unwrap();
        let outcome = service.mark_complete(&lesson, 120).await.unwrap();

        // Not suppressed locally: the backend no-ops the duplicate.
        assert_eq!(outcome, CompletionOutcome::Submitted);
        assert_eq!(api.completion_calls(), 2);
        assert!(service.is_complete(&lesson));
    }
}
