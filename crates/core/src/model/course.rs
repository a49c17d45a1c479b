use thiserror::Error;

use crate::model::ids::{CourseId, SectionId};
use crate::model::lesson::Lesson;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("section title cannot be empty")]
    EmptySectionTitle,
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// Ordered group of lessons. The stored lesson order defines the navigation
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    title: String,
    lessons: Vec<Lesson>,
}

impl Section {
    /// # Errors
    ///
    /// Returns `CourseError::EmptySectionTitle` on a blank title.
    pub fn new(
        id: SectionId,
        title: impl Into<String>,
        lessons: Vec<Lesson>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptySectionTitle);
        }
        Ok(Self { id, title, lessons })
    }

    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A course as served by the backend: ordered sections of ordered lessons.
/// Immutable for the duration of a learning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    sections: Vec<Section>,
}

impl Course {
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` on a blank title.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        sections: Vec<Section>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        Ok(Self {
            id,
            title,
            sections,
        })
    }

    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Total number of lessons across all sections.
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(|s| s.lessons().len()).sum()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::LessonId;

    fn lesson(id: &str) -> Lesson {
        Lesson::text(LessonId::new(id), format!("Lesson {id}"), "body", Vec::new()).unwrap()
    }

    #[test]
    fn course_rejects_empty_title() {
        let err = Course::new(CourseId::new("c1"), "   ", Vec::new()).unwrap_err();
        assert_eq!(err, CourseError::EmptyTitle);
    }

    #[test]
    fn section_rejects_empty_title() {
        let err = Section::new(SectionId::new("s1"), "", Vec::new()).unwrap_err();
        assert_eq!(err, CourseError::EmptySectionTitle);
    }

    #[test]
    fn lesson_count_sums_sections() {
        let s1 = Section::new(
            SectionId::new("s1"),
            "Basics",
            vec![lesson("a"), lesson("b")],
        )
        .unwrap();
        let s2 = Section::new(SectionId::new("s2"), "Advanced", vec![lesson("c")]).unwrap();
        let course = Course::new(CourseId::new("c1"), "Rust 101", vec![s1, s2]).unwrap();
        assert_eq!(course.lesson_count(), 3);
    }

    #[test]
    fn empty_course_is_representable() {
        let course = Course::new(CourseId::new("c1"), "Empty", Vec::new()).unwrap();
        assert_eq!(course.lesson_count(), 0);
        assert!(course.sections().is_empty());
    }
}
