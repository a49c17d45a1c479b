use std::collections::HashSet;
use std::sync::Arc;

use course_core::Curriculum;
use course_core::model::{Lesson, LessonId};

/// Where the learning page is in its lifecycle once data has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    /// Curriculum loaded but empty; nothing to play.
    NoLessonSelected,
    /// Exactly one lesson is current.
    LessonActive,
}

/// Owned state of the learning page.
///
/// Holds the current lesson, sidebar expansion, and a selection sequence
/// number. Async results captured under an older sequence are stale and get
/// discarded by their callers. Only the `PlayerService` mutates selection.
#[derive(Debug)]
pub struct Player {
    curriculum: Arc<Curriculum>,
    current: Option<LessonId>,
    selection_seq: u64,
    expanded_sections: HashSet<usize>,
}

impl Player {
    pub(crate) fn new(curriculum: Arc<Curriculum>) -> Self {
        Self {
            curriculum,
            current: None,
            selection_seq: 0,
            expanded_sections: HashSet::new(),
        }
    }

    #[must_use]
    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    #[must_use]
    pub fn phase(&self) -> PlayerPhase {
        if self.current.is_some() {
            PlayerPhase::LessonActive
        } else {
            PlayerPhase::NoLessonSelected
        }
    }

    #[must_use]
    pub fn current_id(&self) -> Option<&LessonId> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn current_lesson(&self) -> Option<&Lesson> {
        let id = self.current.as_ref()?;
        self.curriculum.lesson(id)
    }

    /// 0-based position of the current lesson in the flattened sequence.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        let id = self.current.as_ref()?;
        self.curriculum.index_of(id)
    }

    /// Bumped on every selection change; callers snapshot it before async
    /// work and drop results when it moved on.
    #[must_use]
    pub fn selection_seq(&self) -> u64 {
        self.selection_seq
    }

    #[must_use]
    pub fn is_section_expanded(&self, section_index: usize) -> bool {
        self.expanded_sections.contains(&section_index)
    }

    pub fn toggle_section(&mut self, section_index: usize) {
        if !self.expanded_sections.remove(&section_index) {
            self.expanded_sections.insert(section_index);
        }
    }

    pub(crate) fn set_current(&mut self, lesson_id: LessonId) {
        self.selection_seq += 1;
        if let Some(section) = self.curriculum.section_index_of(&lesson_id) {
            self.expanded_sections.insert(section);
        }
        self.current = Some(lesson_id);
    }
}
