use std::sync::Arc;

use course_core::{Curriculum, Direction};
use course_core::model::{Lesson, LessonId};

use crate::error::PlayerError;
use crate::media::{MediaSessionManager, PlaybackSession};
use crate::notify::NotifierRef;
use crate::progress_service::{CompletionOutcome, ProgressService};

use super::state::Player;

/// What happened to a `complete_lesson` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// Submitted and confirmed by the backend.
    Recorded,
    /// The lesson was already complete; nothing was submitted. This is how
    /// a replay's ended event stays silent.
    AlreadyComplete,
    /// A submission for this lesson was already in flight; dropped.
    Suppressed,
}

/// The state machine coordinating curriculum, progress and media.
///
/// Owns no view state itself: the view hands the `Player` in by reference
/// for every transition, per the explicit-state-object design.
#[derive(Clone)]
pub struct PlayerService {
    progress: Arc<ProgressService>,
    media: Arc<MediaSessionManager>,
    notifier: NotifierRef,
}

impl PlayerService {
    #[must_use]
    pub fn new(
        progress: Arc<ProgressService>,
        media: Arc<MediaSessionManager>,
        notifier: NotifierRef,
    ) -> Self {
        Self {
            progress,
            media,
            notifier,
        }
    }

    /// Builds the player state once curriculum *and* progress are loaded.
    ///
    /// Auto-selects the resume lesson: the first incomplete lesson in
    /// flattened order, else the first lesson. An empty curriculum selects
    /// nothing and opens no media session.
    #[must_use]
    pub fn initialize(&self, curriculum: Arc<Curriculum>) -> Player {
        let mut player = Player::new(curriculum);

        let resume = {
            let curriculum = player.curriculum();
            curriculum
                .flatten()
                .into_iter()
                .find(|lesson| !self.progress.is_complete(lesson.id()))
                .or_else(|| curriculum.first())
                .map(|lesson| lesson.id().clone())
        };

        match resume {
            Some(lesson_id) => {
                tracing::debug!(lesson = %lesson_id, "initial lesson selected");
                self.activate(&mut player, lesson_id);
            }
            None => tracing::debug!("curriculum is empty, nothing to select"),
        }
        player
    }

    /// Makes the lesson current, opening/closing media sessions as needed.
    ///
    /// Selecting the already-current lesson is a no-op so playback is never
    /// restarted by an unrelated re-render.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::UnknownLesson` for ids outside the flattened
    /// sequence.
    pub fn select_lesson(
        &self,
        player: &mut Player,
        lesson_id: &LessonId,
    ) -> Result<(), PlayerError> {
        if !player.curriculum().contains(lesson_id) {
            return Err(PlayerError::UnknownLesson(lesson_id.clone()));
        }
        if player.current_id() == Some(lesson_id) {
            return Ok(());
        }
        self.activate(player, lesson_id.clone());
        Ok(())
    }

    /// Moves to the neighboring lesson. A no-op at either boundary and
    /// before any lesson is selected.
    pub fn navigate(&self, player: &mut Player, direction: Direction) {
        let Some(current) = player.current_id().cloned() else {
            return;
        };
        let Some(next) = player
            .curriculum()
            .neighbor(&current, direction)
            .map(|lesson| lesson.id().clone())
        else {
            return;
        };
        // The neighbor came out of the curriculum, so this cannot fail.
        let _ = self.select_lesson(player, &next);
    }

    /// Records completion for the lesson.
    ///
    /// Already-complete lessons are skipped without a network call (replay
    /// guard); an in-flight submission for the same lesson suppresses the
    /// repeat. Failures are surfaced on the notification channel and local
    /// state stays untouched.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Progress` when the submission fails.
    pub async fn complete_lesson(
        &self,
        lesson_id: &LessonId,
        watch_time_secs: u32,
    ) -> Result<CompletionStatus, PlayerError> {
        if self.progress.is_complete(lesson_id) {
            return Ok(CompletionStatus::AlreadyComplete);
        }

        match self.progress.mark_complete(lesson_id, watch_time_secs).await {
            Ok(CompletionOutcome::Submitted) => Ok(CompletionStatus::Recorded),
            Ok(CompletionOutcome::Suppressed) => Ok(CompletionStatus::Suppressed),
            Err(err) => {
                self.notifier
                    .error("Could not save your progress. Please try again.");
                Err(err.into())
            }
        }
    }

    /// True while a completion submission for the lesson is in flight;
    /// drives the UI's disabled state.
    #[must_use]
    pub fn is_completion_pending(&self, lesson_id: &LessonId) -> bool {
        self.progress.is_pending(lesson_id)
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    /// The live playback session, if the current lesson is a video.
    #[must_use]
    pub fn current_session(&self) -> Option<PlaybackSession> {
        self.media.current()
    }

    /// Routes a media-engine failure to the notification channel. Playback
    /// errors degrade the player surface, never the page.
    pub fn report_playback_error(&self, detail: &str) {
        tracing::warn!(%detail, "playback error");
        self.notifier
            .error("Playback failed. Check your connection and try again.");
    }

    fn activate(&self, player: &mut Player, lesson_id: LessonId) {
        let stream = player
            .curriculum()
            .lesson(&lesson_id)
            .and_then(Lesson::stream)
            .cloned();
        // The prior session is always gone before the next one registers.
        match stream {
            Some(stream) => {
                self.media.open(&lesson_id, &stream);
            }
            None => self.media.dispose_current(),
        }
        player.set_current(lesson_id);
    }
}
