use std::sync::Arc;

use api::CatalogApi;
use course_core::Curriculum;
use course_core::model::{Course, CourseId};

use crate::error::CatalogError;

/// Loads a course and its curriculum into the traversable model.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogApi>,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self { catalog }
    }

    /// Fetch course metadata plus the ordered section tree and build the
    /// curriculum. Server-defined display order is preserved as-is.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for backend failures, invalid course data, or
    /// duplicate lesson ids across sections.
    pub async fn load_curriculum(&self, course_id: &CourseId) -> Result<Curriculum, CatalogError> {
        let head = self.catalog.course(course_id).await?;
        let sections = self.catalog.curriculum(course_id).await?;
        let course = Course::new(head.id, head.title, sections)?;
        tracing::debug!(course = %course_id, lessons = course.lesson_count(), "curriculum loaded");
        Ok(Curriculum::new(course)?)
    }
}
