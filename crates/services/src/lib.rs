#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod media;
pub mod notify;
pub mod player;
pub mod progress_service;
pub mod review_service;

pub use course_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::CatalogService;
pub use error::{
    AppServicesError, CatalogError, MediaError, PlayerError, ProgressError, ReviewError,
};
pub use media::{MediaGateway, MediaSessionManager, PlaybackSession};
pub use notify::{Notifier, NotifierRef, NullNotifier};
pub use player::{CompletionStatus, Player, PlayerPhase, PlayerService};
pub use progress_service::{CompletionOutcome, ProgressService};
pub use review_service::ReviewService;
