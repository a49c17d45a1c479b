use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use course_core::Clock;
use course_core::model::{
    Course, CourseId, LessonId, LessonProgress, ProgressSnapshot, ReviewDraft, Section,
};

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("rejected with status {0}")]
    Rejected(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Course metadata as served by the catalog endpoint, before the curriculum
/// is attached.
///
/// This mirrors the wire shape so adapters can compose a domain `Course`
/// without leaking transport concerns into the domain layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseHead {
    pub id: CourseId,
    pub title: String,
}

/// Catalog contract: course metadata and the ordered section list.
///
/// The server defines display order; adapters must preserve it.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch course metadata by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if missing, or other backend errors.
    async fn course(&self, id: &CourseId) -> Result<CourseHead, ApiError>;

    /// Fetch the ordered section/lesson tree for a course.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the curriculum cannot be fetched or decoded.
    async fn curriculum(&self, course_id: &CourseId) -> Result<Vec<Section>, ApiError>;
}

/// Progress contract: the enrollment snapshot plus idempotent completion.
#[async_trait]
pub trait ProgressApi: Send + Sync {
    /// Fetch the authoritative progress snapshot for a course.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the snapshot cannot be fetched or decoded.
    async fn progress(&self, course_id: &CourseId) -> Result<ProgressSnapshot, ApiError>;

    /// Record a lesson completion. Idempotent per lesson: the backend no-ops
    /// on duplicates.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the submission is rejected (e.g. enrollment
    /// revoked mid-session).
    async fn complete_lesson(
        &self,
        lesson_id: &LessonId,
        watch_time_secs: u32,
    ) -> Result<(), ApiError>;
}

/// Review submission contract. Rating validity (1..=5) is enforced by the
/// caller before anything reaches an adapter.
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// Submit a course review.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the submission is rejected.
    async fn submit_review(
        &self,
        course_id: &CourseId,
        review: &ReviewDraft,
    ) -> Result<(), ApiError>;
}

/// Aggregates the backend contracts behind trait objects for easy adapter
/// swapping.
#[derive(Clone)]
pub struct Backend {
    pub catalog: Arc<dyn CatalogApi>,
    pub progress: Arc<dyn ProgressApi>,
    pub reviews: Arc<dyn ReviewApi>,
}

impl Backend {
    /// Backend served from process memory, for tests and prototyping.
    #[must_use]
    pub fn in_memory(course: Course) -> Self {
        let api = InMemoryApi::new(course);
        Self::from_in_memory(api)
    }

    #[must_use]
    pub fn from_in_memory(api: InMemoryApi) -> Self {
        let catalog: Arc<dyn CatalogApi> = Arc::new(api.clone());
        let progress: Arc<dyn ProgressApi> = Arc::new(api.clone());
        let reviews: Arc<dyn ReviewApi> = Arc::new(api);
        Self {
            catalog,
            progress,
            reviews,
        }
    }
}

#[derive(Default)]
struct InMemoryState {
    completed: HashMap<LessonId, u32>,
    completion_calls: u32,
    reviews: Vec<(CourseId, u8, String)>,
}

/// Simple in-memory backend implementation for testing and prototyping.
///
/// The aggregate percentage stands in for the server-side weighting rules
/// with a plain completed/total ratio.
#[derive(Clone)]
pub struct InMemoryApi {
    course: Arc<Course>,
    clock: Clock,
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryApi {
    #[must_use]
    pub fn new(course: Course) -> Self {
        Self {
            course: Arc::new(course),
            clock: Clock::default_clock(),
            state: Arc::new(Mutex::new(InMemoryState::default())),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Number of completion submissions observed, duplicates included.
    #[must_use]
    pub fn completion_calls(&self) -> u32 {
        self.lock_state().completion_calls
    }

    /// Reviews accepted so far, as (course, rating, text).
    #[must_use]
    pub fn reviews(&self) -> Vec<(CourseId, u8, String)> {
        self.lock_state().reviews.clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn snapshot_locked(&self, state: &InMemoryState) -> ProgressSnapshot {
        let total = self.course.lesson_count();
        let percent = if total == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let ratio = state.completed.len() as f32 / total as f32;
            ratio * 100.0
        };
        let now = self.clock.now();
        let entries = state
            .completed
            .iter()
            .map(|(id, watch)| LessonProgress::completed(id.clone(), *watch, now));
        ProgressSnapshot::new(percent, entries)
    }
}

#[async_trait]
impl CatalogApi for InMemoryApi {
    async fn course(&self, id: &CourseId) -> Result<CourseHead, ApiError> {
        if id != self.course.id() {
            return Err(ApiError::NotFound);
        }
        Ok(CourseHead {
            id: self.course.id().clone(),
            title: self.course.title().to_string(),
        })
    }

    async fn curriculum(&self, course_id: &CourseId) -> Result<Vec<Section>, ApiError> {
        if course_id != self.course.id() {
            return Err(ApiError::NotFound);
        }
        Ok(self.course.sections().to_vec())
    }
}

#[async_trait]
impl ProgressApi for InMemoryApi {
    async fn progress(&self, course_id: &CourseId) -> Result<ProgressSnapshot, ApiError> {
        if course_id != self.course.id() {
            return Err(ApiError::NotFound);
        }
        let state = self.lock_state();
        Ok(self.snapshot_locked(&state))
    }

    async fn complete_lesson(
        &self,
        lesson_id: &LessonId,
        watch_time_secs: u32,
    ) -> Result<(), ApiError> {
        let mut state = self.lock_state();
        state.completion_calls += 1;
        // Duplicate completions keep the first watch time, like the server.
        state
            .completed
            .entry(lesson_id.clone())
            .or_insert(watch_time_secs);
        Ok(())
    }
}

#[async_trait]
impl ReviewApi for InMemoryApi {
    async fn submit_review(
        &self,
        course_id: &CourseId,
        review: &ReviewDraft,
    ) -> Result<(), ApiError> {
        if course_id != self.course.id() {
            return Err(ApiError::NotFound);
        }
        let mut state = self.lock_state();
        state.reviews.push((
            course_id.clone(),
            review.rating().value(),
            review.text().to_string(),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{Lesson, SectionId};
    use course_core::time::fixed_clock;

    fn course() -> Course {
        let lessons = vec![
            Lesson::text(LessonId::new("L1"), "One", "body", Vec::new()).unwrap(),
            Lesson::text(LessonId::new("L2"), "Two", "body", Vec::new()).unwrap(),
        ];
        let section = Section::new(SectionId::new("s1"), "Only", lessons).unwrap();
        Course::new(CourseId::new("c1"), "Course", vec![section]).unwrap()
    }

    #[tokio::test]
    async fn completion_is_idempotent_but_counted() {
        let api = InMemoryApi::new(course()).with_clock(fixed_clock());
        let lesson = LessonId::new("L1");

        api.complete_lesson(&lesson, 60).await.unwrap();
        api.complete_lesson(&lesson, 90).await.unwrap();

        assert_eq!(api.completion_calls(), 2);

        let snapshot = api.progress(&CourseId::new("c1")).await.unwrap();
        assert!(snapshot.is_complete(&lesson));
        assert_eq!(snapshot.watch_time_secs(&lesson), 60);
        assert_eq!(snapshot.percent(), 50.0);
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let api = InMemoryApi::new(course());
        let err = api.course(&CourseId::new("other")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn curriculum_preserves_order() {
        let api = InMemoryApi::new(course());
        let sections = api.curriculum(&CourseId::new("c1")).await.unwrap();
        assert_eq!(sections.len(), 1);
        let ids: Vec<&str> = sections[0]
            .lessons()
            .iter()
            .map(|l| l.id().as_str())
            .collect();
        assert_eq!(ids, vec!["L1", "L2"]);
    }

    #[tokio::test]
    async fn reviews_are_recorded() {
        let api = InMemoryApi::new(course());
        let draft = ReviewDraft::new(5, "solid").unwrap();
        api.submit_review(&CourseId::new("c1"), &draft)
            .await
            .unwrap();
        let reviews = api.reviews();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].1, 5);
    }
}
