//! REST adapter for the backend contracts.
//!
//! Every request re-reads the bearer token from the credential store, so a
//! token refresh is picked up without rebuilding the client.

mod dto;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use course_core::model::{CourseId, LessonId, ProgressSnapshot, ReviewDraft, Section};

use crate::auth::CredentialStore;
use crate::contract::{ApiError, Backend, CatalogApi, CourseHead, ProgressApi, ReviewApi};
use dto::{
    CompletionRequestDto, CourseDto, ProgressDto, ReviewRequestDto, SectionDto,
};

/// HTTP client for the learning-platform backend.
#[derive(Clone)]
pub struct RestApi {
    base_url: Url,
    client: Client,
    credentials: CredentialStore,
}

impl RestApi {
    /// # Errors
    ///
    /// Returns `ApiError::InvalidPayload` if the base URL does not parse.
    pub fn new(
        base_url: impl AsRef<str>,
        credentials: CredentialStore,
    ) -> Result<Self, ApiError> {
        let raw = base_url.as_ref().trim_end_matches('/');
        let base_url = Url::parse(raw)
            .map_err(|e| ApiError::InvalidPayload(format!("invalid base url: {e}")))?;
        Ok(Self {
            base_url,
            client: Client::new(),
            credentials,
        })
    }

    /// Wraps this client into a `Backend` aggregate.
    #[must_use]
    pub fn into_backend(self) -> Backend {
        let shared = std::sync::Arc::new(self);
        Backend {
            catalog: shared.clone(),
            progress: shared.clone(),
            reviews: shared,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidPayload("base url cannot be a base".into()))?;
            segments.pop_if_empty();
            for segment in path.split('/') {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");
        let mut request = self.client.get(url);
        if let Some(token) = self.credentials.bearer_token() {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response.status())?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidPayload(e.to_string()))
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let mut request = self.client.post(url);
        if let Some(token) = self.credentials.bearer_token() {
            request = request.bearer_auth(token);
        }
        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response.status())
    }
}

fn check_status(status: StatusCode) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    let err = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        other => ApiError::Rejected(other.as_u16()),
    };
    tracing::warn!(status = status.as_u16(), "backend rejected request");
    Err(err)
}

#[async_trait]
impl CatalogApi for RestApi {
    async fn course(&self, id: &CourseId) -> Result<CourseHead, ApiError> {
        let dto: CourseDto = self.get_json(&format!("courses/{id}")).await?;
        Ok(dto.into_head())
    }

    async fn curriculum(&self, course_id: &CourseId) -> Result<Vec<Section>, ApiError> {
        let dtos: Vec<SectionDto> = self
            .get_json(&format!("courses/{course_id}/curriculum"))
            .await?;
        dtos.into_iter().map(SectionDto::into_section).collect()
    }
}

#[async_trait]
impl ProgressApi for RestApi {
    async fn progress(&self, course_id: &CourseId) -> Result<ProgressSnapshot, ApiError> {
        let dto: ProgressDto = self
            .get_json(&format!("courses/{course_id}/progress"))
            .await?;
        Ok(dto.into_snapshot())
    }

    async fn complete_lesson(
        &self,
        lesson_id: &LessonId,
        watch_time_secs: u32,
    ) -> Result<(), ApiError> {
        self.post_json(
            &format!("lessons/{lesson_id}/complete"),
            &CompletionRequestDto {
                watch_time_seconds: watch_time_secs,
            },
        )
        .await
    }
}

#[async_trait]
impl ReviewApi for RestApi {
    async fn submit_review(
        &self,
        course_id: &CourseId,
        review: &ReviewDraft,
    ) -> Result<(), ApiError> {
        self.post_json(
            &format!("courses/{course_id}/reviews"),
            &ReviewRequestDto {
                rating: review.rating().value(),
                text: review.text().to_string(),
            },
        )
        .await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_under_the_base_path() {
        let api = RestApi::new("https://lms.example.com/api/v1/", CredentialStore::new())
            .unwrap();
        let url = api.endpoint("courses/c1/progress").unwrap();
        assert_eq!(
            url.as_str(),
            "https://lms.example.com/api/v1/courses/c1/progress"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(RestApi::new("not a url", CredentialStore::new()).is_err());
    }

    #[test]
    fn status_mapping_distinguishes_auth_failures() {
        assert!(matches!(
            check_status(StatusCode::UNAUTHORIZED),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            check_status(StatusCode::FORBIDDEN),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND),
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY),
            Err(ApiError::Rejected(502))
        ));
        assert!(check_status(StatusCode::OK).is_ok());
    }
}
