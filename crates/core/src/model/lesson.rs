use thiserror::Error;
use url::Url;

use crate::model::ids::LessonId;

//
// ─── ERRORS (domain validation) ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("text lesson body cannot be empty")]
    EmptyBody,

    #[error("video duration must be > 0")]
    ZeroDuration,

    #[error("stream locator is not a valid url: {0}")]
    InvalidStreamLocator(String),

    #[error("resource label cannot be empty")]
    EmptyResourceLabel,

    #[error("resource url is not a valid url: {0}")]
    InvalidResourceUrl(String),
}

//
// ─── STREAM LOCATOR ────────────────────────────────────────────────────────────
//

/// Location of a lesson's adaptive-bitrate manifest.
///
/// The backend authorizes each manifest/segment fetch per request, so the
/// locator itself carries no credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamLocator(Url);

impl StreamLocator {
    /// Parses a manifest URL.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::InvalidStreamLocator` if the value is empty or
    /// not a parseable absolute URL.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, LessonError> {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            return Err(LessonError::InvalidStreamLocator(s.to_string()));
        }
        let url =
            Url::parse(s).map_err(|_| LessonError::InvalidStreamLocator(s.to_string()))?;
        Ok(Self(url))
    }

    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

//
// ─── LESSON TYPES ──────────────────────────────────────────────────────────────
//

/// Kind of content a lesson carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonKind {
    Video,
    Text,
}

/// Content payload of a lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonContent {
    /// Markdown body rendered inline.
    Text { body: String },
    /// Streamable video: declared duration plus the manifest locator.
    Video {
        duration_secs: u32,
        stream: StreamLocator,
    },
}

/// Downloadable material attached to a lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLink {
    label: String,
    url: Url,
}

impl ResourceLink {
    /// # Errors
    ///
    /// Returns `LessonError` if the label is blank or the URL does not parse.
    pub fn new(label: impl Into<String>, url: impl AsRef<str>) -> Result<Self, LessonError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(LessonError::EmptyResourceLabel);
        }
        let raw = url.as_ref().trim();
        let url =
            Url::parse(raw).map_err(|_| LessonError::InvalidResourceUrl(raw.to_string()))?;
        Ok(Self { label, url })
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Atomic unit of course content. Immutable within a learning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    content: LessonContent,
    resources: Vec<ResourceLink>,
}

impl Lesson {
    /// Creates a text lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` or `LessonError::EmptyBody` on blank
    /// input.
    pub fn text(
        id: LessonId,
        title: impl Into<String>,
        body: impl Into<String>,
        resources: Vec<ResourceLink>,
    ) -> Result<Self, LessonError> {
        let title = validated_title(title)?;
        let body = body.into();
        if body.trim().is_empty() {
            return Err(LessonError::EmptyBody);
        }
        Ok(Self {
            id,
            title,
            content: LessonContent::Text { body },
            resources,
        })
    }

    /// Creates a video lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` or `LessonError::ZeroDuration` on
    /// invalid input.
    pub fn video(
        id: LessonId,
        title: impl Into<String>,
        duration_secs: u32,
        stream: StreamLocator,
        resources: Vec<ResourceLink>,
    ) -> Result<Self, LessonError> {
        let title = validated_title(title)?;
        if duration_secs == 0 {
            return Err(LessonError::ZeroDuration);
        }
        Ok(Self {
            id,
            title,
            content: LessonContent::Video {
                duration_secs,
                stream,
            },
            resources,
        })
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &LessonContent {
        &self.content
    }

    #[must_use]
    pub fn resources(&self) -> &[ResourceLink] {
        &self.resources
    }

    #[must_use]
    pub fn kind(&self) -> LessonKind {
        match self.content {
            LessonContent::Text { .. } => LessonKind::Text,
            LessonContent::Video { .. } => LessonKind::Video,
        }
    }

    /// The manifest locator, when this is a video lesson.
    #[must_use]
    pub fn stream(&self) -> Option<&StreamLocator> {
        match &self.content {
            LessonContent::Video { stream, .. } => Some(stream),
            LessonContent::Text { .. } => None,
        }
    }

    /// Declared video duration, when this is a video lesson.
    #[must_use]
    pub fn duration_secs(&self) -> Option<u32> {
        match self.content {
            LessonContent::Video { duration_secs, .. } => Some(duration_secs),
            LessonContent::Text { .. } => None,
        }
    }
}

fn validated_title(title: impl Into<String>) -> Result<String, LessonError> {
    let title = title.into();
    if title.trim().is_empty() {
        return Err(LessonError::EmptyTitle);
    }
    Ok(title)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> StreamLocator {
        StreamLocator::parse("https://media.example.com/l1/master.m3u8").unwrap()
    }

    #[test]
    fn text_lesson_requires_title_and_body() {
        let err = Lesson::text(LessonId::new("L1"), "  ", "body", Vec::new()).unwrap_err();
        assert_eq!(err, LessonError::EmptyTitle);

        let err = Lesson::text(LessonId::new("L1"), "Intro", "  ", Vec::new()).unwrap_err();
        assert_eq!(err, LessonError::EmptyBody);
    }

    #[test]
    fn video_lesson_rejects_zero_duration() {
        let err =
            Lesson::video(LessonId::new("L1"), "Intro", 0, locator(), Vec::new()).unwrap_err();
        assert_eq!(err, LessonError::ZeroDuration);
    }

    #[test]
    fn video_lesson_exposes_stream_and_duration() {
        let lesson =
            Lesson::video(LessonId::new("L1"), "Intro", 90, locator(), Vec::new()).unwrap();
        assert_eq!(lesson.kind(), LessonKind::Video);
        assert_eq!(lesson.duration_secs(), Some(90));
        assert_eq!(lesson.stream(), Some(&locator()));
    }

    #[test]
    fn text_lesson_has_no_stream() {
        let lesson = Lesson::text(LessonId::new("L1"), "Notes", "# hi", Vec::new()).unwrap();
        assert_eq!(lesson.kind(), LessonKind::Text);
        assert!(lesson.stream().is_none());
        assert!(lesson.duration_secs().is_none());
    }

    #[test]
    fn stream_locator_rejects_garbage() {
        assert!(StreamLocator::parse("").is_err());
        assert!(StreamLocator::parse("not a url").is_err());
        assert!(StreamLocator::parse("https://ok.example/m.m3u8").is_ok());
    }

    #[test]
    fn resource_link_validates_inputs() {
        assert!(ResourceLink::new(" ", "https://a.example/x.pdf").is_err());
        assert!(ResourceLink::new("Slides", "nope").is_err());

        let link = ResourceLink::new("Slides", "https://a.example/x.pdf").unwrap();
        assert_eq!(link.label(), "Slides");
        assert_eq!(link.url().as_str(), "https://a.example/x.pdf");
    }
}
