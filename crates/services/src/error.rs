//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;
use course_core::CurriculumError;
use course_core::model::{CourseError, LessonId, RatingError};

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Curriculum(#[from] CurriculumError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `ReviewService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewError {
    #[error(transparent)]
    Rating(#[from] RatingError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by the media session layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MediaError {
    #[error("media gateway failed to bind: {0}")]
    Bind(String),
}

/// Errors emitted by the player orchestrator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlayerError {
    #[error("lesson {0} is not part of this curriculum")]
    UnknownLesson(LessonId),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Media(#[from] MediaError),
}
