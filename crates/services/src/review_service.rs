use std::sync::Arc;

use api::ReviewApi;
use course_core::model::{CourseId, ReviewDraft};

use crate::error::ReviewError;
use crate::notify::NotifierRef;

/// Validates and submits course reviews.
#[derive(Clone)]
pub struct ReviewService {
    api: Arc<dyn ReviewApi>,
    notifier: NotifierRef,
}

impl ReviewService {
    #[must_use]
    pub fn new(api: Arc<dyn ReviewApi>, notifier: NotifierRef) -> Self {
        Self { api, notifier }
    }

    /// Submit a review for the course.
    ///
    /// Ratings outside 1..=5 are rejected here, before any network call.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Rating` for invalid ratings and
    /// `ReviewError::Api` when the backend rejects the submission.
    pub async fn submit(
        &self,
        course_id: &CourseId,
        rating: u8,
        text: &str,
    ) -> Result<(), ReviewError> {
        let draft = ReviewDraft::new(rating, text)?;

        match self.api.submit_review(course_id, &draft).await {
            Ok(()) => {
                tracing::info!(course = %course_id, rating, "review submitted");
                self.notifier.success("Thanks for your review!");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(course = %course_id, error = %err, "review submission failed");
                self.notifier.error("Could not submit your review. Please try again.");
                Err(err.into())
            }
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
    use course_core::model::{Course, Lesson, LessonId, Section, SectionId};

    use crate::notify::NullNotifier;

    fn course() -> Course {
        let lesson = Lesson::text(LessonId::new("L1"), "One", "body", Vec::new()).unwrap();
        let section = Section::new(SectionId::new("s1"), "Only", vec![lesson]).unwrap();
        Course::new(CourseId::new("c1"), "Course", vec![section]).unwrap()
    }

    #[tokio::test]
    async fn out_of_range_rating_never_reaches_the_backend() {
        let api = InMemoryApi::new(course());
        let service = ReviewService::new(Arc::new(api.clone()), Arc::new(NullNotifier));

        let err = service
            .submit(&CourseId::new("c1"), 0, "bad rating")
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::Rating(_)));
        assert!(api.reviews().is_empty());
    }

    #[tokio::test]
    async fn valid_review_is_submitted() {
        let api = InMemoryApi::new(course());
        let service = ReviewService::new(Arc::new(api.clone()), Arc::new(NullNotifier));

        service
            .submit(&CourseId::new("c1"), 5, "  loved it ")
            .await
            .unwrap();

        let reviews = api.reviews();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].1, 5);
        assert_eq!(reviews[0].2, "loved it");
    }
}
