use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::model::ids::LessonId;

/// One learner's completion record for one lesson.
///
/// The authoritative copy lives server-side; the client only ever holds
/// records it fetched (or refetched after a successful completion).
#[derive(Debug, Clone, PartialEq)]
pub struct LessonProgress {
    pub lesson_id: LessonId,
    pub completed: bool,
    pub watch_time_secs: u32,
    pub completed_at: Option<DateTime<Utc>>,
}

impl LessonProgress {
    #[must_use]
    pub fn completed(lesson_id: LessonId, watch_time_secs: u32, at: DateTime<Utc>) -> Self {
        Self {
            lesson_id,
            completed: true,
            watch_time_secs,
            completed_at: Some(at),
        }
    }
}

/// Read-through cache of the server's progress view for one enrollment.
///
/// The aggregate percentage is supplied by the backend (which owns the
/// weighting/rounding rules) and is never recomputed client-side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressSnapshot {
    percent: f32,
    entries: HashMap<LessonId, LessonProgress>,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn new(percent: f32, entries: impl IntoIterator<Item = LessonProgress>) -> Self {
        Self {
            percent: percent.clamp(0.0, 100.0),
            entries: entries
                .into_iter()
                .map(|entry| (entry.lesson_id.clone(), entry))
                .collect(),
        }
    }

    /// Aggregate completion percentage in `[0, 100]`.
    #[must_use]
    pub fn percent(&self) -> f32 {
        self.percent
    }

    /// True iff a record exists for the lesson with `completed = true`.
    /// Unknown lessons are simply not complete.
    #[must_use]
    pub fn is_complete(&self, lesson_id: &LessonId) -> bool {
        self.entries
            .get(lesson_id)
            .is_some_and(|entry| entry.completed)
    }

    /// Recorded watch time for the lesson, zero when unknown.
    #[must_use]
    pub fn watch_time_secs(&self, lesson_id: &LessonId) -> u32 {
        self.entries
            .get(lesson_id)
            .map_or(0, |entry| entry.watch_time_secs)
    }

    #[must_use]
    pub fn entry(&self, lesson_id: &LessonId) -> Option<&LessonProgress> {
        self.entries.get(lesson_id)
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.entries.values().filter(|entry| entry.completed).count()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
