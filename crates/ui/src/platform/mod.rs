use std::sync::Arc;

mod desktop;

/// Opens resource links in the system browser/handler instead of letting
/// the webview navigate away from the app.
pub trait UiLinkOpener: Send + Sync {
    fn open_url(&self, url: &str);
}

pub type LinkOpenerRef = Arc<dyn UiLinkOpener>;

pub use desktop::DesktopLinkOpener;
