use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dioxus::prelude::*;

use services::Notifier;

use crate::context::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Queue feeding the toast host.
///
/// Implements the services notifier seam, so submission and playback
/// failures surface here without the services layer knowing about Dioxus.
#[derive(Clone, Default)]
pub struct ToastBus {
    inner: Arc<Mutex<VecDeque<Toast>>>,
}

impl ToastBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push_back(Toast {
            kind,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn drain(&self) -> Vec<Toast> {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.drain(..).collect()
    }
}

impl Notifier for ToastBus {
    fn success(&self, message: &str) {
        self.push(ToastKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(ToastKind::Error, message);
    }
}

// Each toast stays visible for this many poll ticks (ticks are 250ms).
const TOAST_TICKS: u8 = 16;

#[component]
pub fn ToastHost() -> Element {
    let ctx = use_context::<AppContext>();
    let mut visible = use_signal(Vec::<(u64, u8, Toast)>::new);
    let mut next_id = use_signal(|| 0u64);

    use_future(move || {
        let bus = ctx.toasts();
        async move {
            loop {
                tokio::time::sleep(Duration::from_millis(250)).await;
                let drained = bus.drain();
                let needs_tick = !drained.is_empty() || !visible.read().is_empty();
                if !needs_tick {
                    continue;
                }
                let mut list = visible.write();
                for entry in list.iter_mut() {
                    entry.1 = entry.1.saturating_sub(1);
                }
                list.retain(|entry| entry.1 > 0);
                for toast in drained {
                    let id = next_id();
                    next_id.set(id + 1);
                    list.push((id, TOAST_TICKS, toast));
                }
            }
        }
    });

    let toasts = visible.read().clone();
    rsx! {
        div { class: "toast-host", aria_live: "polite",
            for (id, _, toast) in toasts {
                div {
                    key: "{id}",
                    class: if toast.kind == ToastKind::Error { "toast toast--error" } else { "toast toast--success" },
                    span { class: "toast__message", "{toast.message}" }
                    button {
                        class: "toast__dismiss",
                        r#type: "button",
                        onclick: move |_| {
                            visible.write().retain(|entry| entry.0 != id);
                        },
                        "×"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_collects_and_drains_in_order() {
        let bus = ToastBus::new();
        bus.success("saved");
        bus.error("failed");

        let drained = bus.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind, ToastKind::Success);
        assert_eq!(drained[1].kind, ToastKind::Error);
        assert!(bus.drain().is_empty());
    }
}
