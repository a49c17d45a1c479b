use std::sync::Arc;

use api::{Backend, CredentialStore, InMemoryApi, RestApi};
use course_core::model::CourseId;

use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::media::{MediaGateway, MediaSessionManager};
use crate::notify::NotifierRef;
use crate::player::PlayerService;
use crate::progress_service::ProgressService;
use crate::review_service::ReviewService;

/// Assembles app-facing services over a backend.
#[derive(Clone)]
pub struct AppServices {
    course_id: CourseId,
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressService>,
    player: Arc<PlayerService>,
    reviews: Arc<ReviewService>,
    media: Arc<MediaSessionManager>,
}

impl AppServices {
    /// Build services over the REST backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the base URL is invalid or the media
    /// gateway cannot start.
    pub async fn new_rest(
        base_url: &str,
        credentials: CredentialStore,
        course_id: CourseId,
        notifier: NotifierRef,
    ) -> Result<Self, AppServicesError> {
        let backend = RestApi::new(base_url, credentials.clone())?.into_backend();
        Self::from_backend(backend, credentials, course_id, notifier).await
    }

    /// Build services over an in-memory backend, for tests and demos.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the media gateway cannot start.
    pub async fn new_in_memory(
        api: InMemoryApi,
        course_id: CourseId,
        notifier: NotifierRef,
    ) -> Result<Self, AppServicesError> {
        let backend = Backend::from_in_memory(api);
        Self::from_backend(backend, CredentialStore::new(), course_id, notifier).await
    }

    /// Wire services over any backend aggregate.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Media` if the gateway cannot bind.
    pub async fn from_backend(
        backend: Backend,
        credentials: CredentialStore,
        course_id: CourseId,
        notifier: NotifierRef,
    ) -> Result<Self, AppServicesError> {
        let gateway = MediaGateway::start(credentials).await?;
        let media = Arc::new(MediaSessionManager::new(gateway));

        let catalog = Arc::new(CatalogService::new(backend.catalog));
        let progress = Arc::new(ProgressService::new(course_id.clone(), backend.progress));
        let player = Arc::new(PlayerService::new(
            Arc::clone(&progress),
            Arc::clone(&media),
            notifier.clone(),
        ));
        let reviews = Arc::new(ReviewService::new(backend.reviews, notifier));

        Ok(Self {
            course_id,
            catalog,
            progress,
            player,
            reviews,
            media,
        })
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn player(&self) -> Arc<PlayerService> {
        Arc::clone(&self.player)
    }

    #[must_use]
    pub fn reviews(&self) -> Arc<ReviewService> {
        Arc::clone(&self.reviews)
    }

    #[must_use]
    pub fn media(&self) -> Arc<MediaSessionManager> {
        Arc::clone(&self.media)
    }
}
