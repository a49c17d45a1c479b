use std::sync::Arc;

/// Ambient notification channel: fire-and-forget success/error toasts.
///
/// Called on submission and playback failures, never for transient retries.
/// The UI provides the real implementation; nothing here blocks on it.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

pub type NotifierRef = Arc<dyn Notifier>;

/// Notifier that drops everything. For tests and headless wiring.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
