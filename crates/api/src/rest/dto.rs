//! Wire shapes for the REST backend, plus mapping into the domain model.
//!
//! The backend speaks camelCase JSON; domain types never appear on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use course_core::model::{
    Course, CourseId, Lesson, LessonId, LessonProgress, ProgressSnapshot, ResourceLink, Section,
    SectionId, StreamLocator,
};

use crate::contract::{ApiError, CourseHead};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CourseDto {
    pub id: String,
    pub title: String,
}

impl CourseDto {
    pub(crate) fn into_head(self) -> CourseHead {
        CourseHead {
            id: CourseId::new(self.id),
            title: self.title,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SectionDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<LessonDto>,
}

impl SectionDto {
    pub(crate) fn into_section(self) -> Result<Section, ApiError> {
        let lessons = self
            .lessons
            .into_iter()
            .map(LessonDto::into_lesson)
            .collect::<Result<Vec<_>, _>>()?;
        Section::new(SectionId::new(self.id), self.title, lessons)
            .map_err(|e| ApiError::InvalidPayload(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LessonDto {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub body: Option<String>,
    pub duration_seconds: Option<u32>,
    pub stream_url: Option<String>,
    #[serde(default)]
    pub resources: Vec<ResourceDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResourceDto {
    pub label: String,
    pub url: String,
}

impl LessonDto {
    pub(crate) fn into_lesson(self) -> Result<Lesson, ApiError> {
        let invalid = |detail: String| ApiError::InvalidPayload(detail);
        let id = LessonId::new(self.id);
        let resources = self
            .resources
            .into_iter()
            .map(|r| {
                ResourceLink::new(r.label, r.url).map_err(|e| invalid(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match self.kind.as_str() {
            "text" => {
                let body = self
                    .body
                    .ok_or_else(|| invalid(format!("text lesson {id} has no body")))?;
                Lesson::text(id, self.title, body, resources)
                    .map_err(|e| invalid(e.to_string()))
            }
            "video" => {
                let stream_url = self
                    .stream_url
                    .ok_or_else(|| invalid(format!("video lesson {id} has no stream url")))?;
                let stream =
                    StreamLocator::parse(stream_url).map_err(|e| invalid(e.to_string()))?;
                let duration = self
                    .duration_seconds
                    .ok_or_else(|| invalid(format!("video lesson {id} has no duration")))?;
                Lesson::video(id, self.title, duration, stream, resources)
                    .map_err(|e| invalid(e.to_string()))
            }
            other => Err(invalid(format!("unknown lesson kind: {other}"))),
        }
    }
}

pub(crate) fn into_course(head: CourseHead, sections: Vec<Section>) -> Result<Course, ApiError> {
    Course::new(head.id, head.title, sections)
        .map_err(|e| ApiError::InvalidPayload(e.to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgressDto {
    pub enrollment: EnrollmentDto,
    #[serde(default)]
    pub lesson_progress: Vec<LessonProgressDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnrollmentDto {
    pub progress: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LessonProgressDto {
    pub lesson_id: String,
    pub completed: bool,
    #[serde(default)]
    pub watch_time_seconds: u32,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProgressDto {
    pub(crate) fn into_snapshot(self) -> ProgressSnapshot {
        let entries = self.lesson_progress.into_iter().map(|entry| LessonProgress {
            lesson_id: LessonId::new(entry.lesson_id),
            completed: entry.completed,
            watch_time_secs: entry.watch_time_seconds,
            completed_at: entry.completed_at,
        });
        ProgressSnapshot::new(self.enrollment.progress, entries)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompletionRequestDto {
    pub watch_time_seconds: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewRequestDto {
    pub rating: u8,
    pub text: String,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::LessonKind;

    #[test]
    fn curriculum_payload_maps_to_sections() {
        let payload = serde_json::json!([
            {
                "id": "s1",
                "title": "Basics",
                "lessons": [
                    {
                        "id": "L1",
                        "title": "Welcome",
                        "kind": "text",
                        "body": "# Hello"
                    },
                    {
                        "id": "L2",
                        "title": "First steps",
                        "kind": "video",
                        "durationSeconds": 300,
                        "streamUrl": "https://media.example.com/L2/master.m3u8",
                        "resources": [
                            { "label": "Slides", "url": "https://cdn.example.com/L2.pdf" }
                        ]
                    }
                ]
            }
        ]);

        let dtos: Vec<SectionDto> = serde_json::from_value(payload).unwrap();
        let sections = dtos
            .into_iter()
            .map(SectionDto::into_section)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(sections.len(), 1);
        let lessons = sections[0].lessons();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].kind(), LessonKind::Text);
        assert_eq!(lessons[1].kind(), LessonKind::Video);
        assert_eq!(lessons[1].duration_secs(), Some(300));
        assert_eq!(lessons[1].resources().len(), 1);
    }

    #[test]
    fn unknown_lesson_kind_is_rejected() {
        let payload = serde_json::json!({
            "id": "L1",
            "title": "Quiz",
            "kind": "quiz"
        });
        let dto: LessonDto = serde_json::from_value(payload).unwrap();
        let err = dto.into_lesson().unwrap_err();
        assert!(matches!(err, ApiError::InvalidPayload(_)));
    }

    #[test]
    fn video_lesson_without_stream_is_rejected() {
        let payload = serde_json::json!({
            "id": "L1",
            "title": "Clip",
            "kind": "video",
            "durationSeconds": 60
        });
        let dto: LessonDto = serde_json::from_value(payload).unwrap();
        assert!(dto.into_lesson().is_err());
    }

    #[test]
    fn progress_payload_maps_to_snapshot() {
        let payload = serde_json::json!({
            "enrollment": { "progress": 33.4 },
            "lessonProgress": [
                { "lessonId": "L1", "completed": true, "watchTimeSeconds": 300 },
                { "lessonId": "L2", "completed": false }
            ]
        });

        let dto: ProgressDto = serde_json::from_value(payload).unwrap();
        let snapshot = dto.into_snapshot();

        assert!((snapshot.percent() - 33.4).abs() < f32::EPSILON);
        assert!(snapshot.is_complete(&LessonId::new("L1")));
        assert!(!snapshot.is_complete(&LessonId::new("L2")));
        assert_eq!(snapshot.watch_time_secs(&LessonId::new("L1")), 300);
    }

    #[test]
    fn progress_payload_without_records_is_empty() {
        let payload = serde_json::json!({ "enrollment": { "progress": 0.0 } });
        let dto: ProgressDto = serde_json::from_value(payload).unwrap();
        let snapshot = dto.into_snapshot();
        assert_eq!(snapshot.completed_count(), 0);
    }

    #[test]
    fn request_bodies_serialize_camel_case() {
        let completion = serde_json::to_value(CompletionRequestDto {
            watch_time_seconds: 120,
        })
        .unwrap();
        assert_eq!(completion, serde_json::json!({ "watchTimeSeconds": 120 }));

        let review = serde_json::to_value(ReviewRequestDto {
            rating: 4,
            text: "good".into(),
        })
        .unwrap();
        assert_eq!(
            review,
            serde_json::json!({ "rating": 4, "text": "good" })
        );
    }
}
