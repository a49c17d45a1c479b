use course_core::model::{LessonId, LessonKind};
use services::{Player, ProgressService};

use crate::vm::time_fmt::{format_duration, format_percent};

/// One sidebar row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRowVm {
    pub id: LessonId,
    pub title: String,
    pub is_video: bool,
    pub duration_label: Option<String>,
    pub completed: bool,
    pub current: bool,
}

/// One sidebar section group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionVm {
    pub index: usize,
    pub title: String,
    pub expanded: bool,
    pub completed_count: usize,
    pub lesson_count: usize,
    pub lessons: Vec<LessonRowVm>,
}

/// Projects the curriculum + progress into sidebar rows.
#[must_use]
pub fn map_sections(player: &Player, progress: &ProgressService) -> Vec<SectionVm> {
    let current = player.current_id();
    player
        .curriculum()
        .sections()
        .iter()
        .enumerate()
        .map(|(index, section)| {
            let lessons: Vec<LessonRowVm> = section
                .lessons()
                .iter()
                .map(|lesson| LessonRowVm {
                    id: lesson.id().clone(),
                    title: lesson.title().to_string(),
                    is_video: lesson.kind() == LessonKind::Video,
                    duration_label: lesson.duration_secs().map(format_duration),
                    completed: progress.is_complete(lesson.id()),
                    current: current == Some(lesson.id()),
                })
                .collect();
            let completed_count = lessons.iter().filter(|row| row.completed).count();
            SectionVm {
                index,
                title: section.title().to_string(),
                expanded: player.is_section_expanded(index),
                completed_count,
                lesson_count: lessons.len(),
                lessons,
            }
        })
        .collect()
}

/// Footer label: aggregate percent plus a lesson tally.
#[must_use]
pub fn progress_label(percent: f32, completed: usize, total: usize) -> String {
    format!(
        "{} complete · {completed} / {total} lessons",
        format_percent(percent)
    )
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
