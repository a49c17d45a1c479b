use std::collections::HashMap;

use thiserror::Error;

use crate::model::{Course, Lesson, LessonId, Section};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("lesson id {0} appears more than once across sections")]
    DuplicateLesson(LessonId),
}

//
// ─── NAVIGATION ────────────────────────────────────────────────────────────────
//

/// Navigation direction through the flattened lesson sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

//
// ─── CURRICULUM ────────────────────────────────────────────────────────────────
//

/// Ordered view over a course's sections and lessons.
///
/// Presents the tree both hierarchically (for sidebar rendering) and as a
/// flat, order-preserving sequence (for next/previous navigation). The
/// flattened order is fixed at construction: sections in stored order,
/// lessons in stored order within each section.
#[derive(Debug, Clone)]
pub struct Curriculum {
    course: Course,
    order: Vec<LessonId>,
    positions: HashMap<LessonId, (usize, usize)>,
}

impl Curriculum {
    /// Builds the traversable view.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::DuplicateLesson` if a lesson id appears in
    /// more than one place; the flattened sequence must be unique per id.
    pub fn new(course: Course) -> Result<Self, CurriculumError> {
        let mut order = Vec::with_capacity(course.lesson_count());
        let mut positions = HashMap::with_capacity(course.lesson_count());

        for (section_idx, section) in course.sections().iter().enumerate() {
            for (lesson_idx, lesson) in section.lessons().iter().enumerate() {
                let id = lesson.id().clone();
                if positions.insert(id.clone(), (section_idx, lesson_idx)).is_some() {
                    return Err(CurriculumError::DuplicateLesson(id));
                }
                order.push(id);
            }
        }

        Ok(Self {
            course,
            order,
            positions,
        })
    }

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        self.course.sections()
    }

    /// Lessons in section-then-lesson declaration order. Stable across calls.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Lesson> {
        self.order
            .iter()
            .filter_map(|id| self.lesson(id))
            .collect()
    }

    /// Position of the lesson in the flattened sequence.
    #[must_use]
    pub fn index_of(&self, lesson_id: &LessonId) -> Option<usize> {
        self.order.iter().position(|id| id == lesson_id)
    }

    /// The lesson `flatten()[index ± 1]`, or `None` at either boundary.
    /// Unknown ids also resolve to `None`; there is no wraparound.
    #[must_use]
    pub fn neighbor(&self, lesson_id: &LessonId, direction: Direction) -> Option<&Lesson> {
        let index = self.index_of(lesson_id)?;
        let neighbor_index = match direction {
            Direction::Next => index.checked_add(1)?,
            Direction::Prev => index.checked_sub(1)?,
        };
        let id = self.order.get(neighbor_index)?;
        self.lesson(id)
    }

    #[must_use]
    pub fn lesson(&self, lesson_id: &LessonId) -> Option<&Lesson> {
        let (section_idx, lesson_idx) = *self.positions.get(lesson_id)?;
        self.course
            .sections()
            .get(section_idx)?
            .lessons()
            .get(lesson_idx)
    }

    /// First lesson of the flattened sequence, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Lesson> {
        let id = self.order.first()?;
        self.lesson(id)
    }

    #[must_use]
    pub fn contains(&self, lesson_id: &LessonId) -> bool {
        self.positions.contains_key(lesson_id)
    }

    /// Index of the section holding the lesson, for sidebar expansion.
    #[must_use]
    pub fn section_index_of(&self, lesson_id: &LessonId) -> Option<usize> {
        self.positions.get(lesson_id).map(|(section, _)| *section)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
