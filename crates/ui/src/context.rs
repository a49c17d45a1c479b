use std::sync::Arc;

use course_core::model::CourseId;
use services::{CatalogService, PlayerService, ProgressService, ReviewService};

use crate::platform::LinkOpenerRef;
use crate::views::ToastBus;

/// App-facing surface the composition root provides to the UI.
pub trait UiApp: Send + Sync {
    fn course_id(&self) -> CourseId;
    fn learner_label(&self) -> String;

    fn catalog(&self) -> Arc<CatalogService>;
    fn progress(&self) -> Arc<ProgressService>;
    fn player(&self) -> Arc<PlayerService>;
    fn reviews(&self) -> Arc<ReviewService>;
    fn toasts(&self) -> ToastBus;
    fn link_opener(&self) -> LinkOpenerRef;
}

#[derive(Clone)]
pub struct AppContext {
    course_id: CourseId,
    learner_label: String,
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressService>,
    player: Arc<PlayerService>,
    reviews: Arc<ReviewService>,
    toasts: ToastBus,
    link_opener: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            course_id: app.course_id(),
            learner_label: app.learner_label(),
            catalog: app.catalog(),
            progress: app.progress(),
            player: app.player(),
            reviews: app.reviews(),
            toasts: app.toasts(),
            link_opener: app.link_opener(),
        }
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id.clone()
    }

    /// Shown in the playback watermark overlay.
    #[must_use]
    pub fn learner_label(&self) -> &str {
        &self.learner_label
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
    pub fn toasts(&self) -> ToastBus {
        self.toasts.clone()
    }

    #[must_use]
    pub fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }
}

// This context is provided by the application composition root (crates/app).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
