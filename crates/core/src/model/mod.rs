mod course;
mod ids;
mod lesson;
mod progress;
mod review;

pub use course::{Course, CourseError, Section};
pub use ids::{CourseId, LessonId, PlaybackSessionId, SectionId};
pub use lesson::{
    Lesson, LessonContent, LessonError, LessonKind, ResourceLink, StreamLocator,
};
pub use progress::{LessonProgress, ProgressSnapshot};
pub use review::{Rating, RatingError, ReviewDraft};
