use dioxus::prelude::*;

use course_core::Direction;

use super::view::{LearnIntent, LessonPanelVm};

#[component]
pub(super) fn LessonPanel(vm: LessonPanelVm, on_intent: EventHandler<LearnIntent>) -> Element {
    rsx! {
        section { class: "lesson-panel",
            header { class: "lesson-panel__header",
                div { class: "lesson-panel__heading",
                    p { class: "lesson-panel__index", "{vm.index_label}" }
                    h2 { class: "lesson-panel__title", "{vm.title}" }
                }
                if vm.completed {
                    span { class: "lesson-panel__done", "Completed ✓" }
                } else {
                    button {
                        class: "btn btn-primary",
                        id: "learn-complete",
                        r#type: "button",
                        disabled: vm.pending,
                        onclick: move |_| on_intent.call(LearnIntent::CompleteCurrent),
                        if vm.pending { "Saving..." } else { "Mark as complete" }
                    }
                }
            }

            if vm.is_video {
                div { class: "player-frame",
                    div { class: "player-frame__mount", id: "learn-video-mount" }
                    div { class: "player-frame__watermark", id: "learn-watermark",
                        "{vm.watermark}"
                    }
                }
                // Bridge targets for the media element's JS event handlers.
                button {
                    id: "learn-complete-auto",
                    r#type: "button",
                    hidden: true,
                    onclick: move |_| on_intent.call(LearnIntent::CompleteCurrent),
                }
                button {
                    id: "learn-playback-error",
                    r#type: "button",
                    hidden: true,
                    onclick: move |_| on_intent.call(LearnIntent::PlaybackError),
                }
            } else if let Some(body_html) = vm.body_html.clone() {
                article { class: "lesson-text", dangerous_inner_html: "{body_html}" }
            }

            if !vm.resources.is_empty() {
                div { class: "lesson-resources",
                    h3 { "Resources" }
                    ul {
                        for (label, url) in vm.resources.clone() {
                            li { key: "{url}",
                                button {
                                    class: "lesson-resources__link",
                                    r#type: "button",
                                    onclick: move |_| {
                                        on_intent.call(LearnIntent::OpenResource(url.clone()))
                                    },
                                    "{label}"
                                }
                            }
                        }
                    }
                }
            }

            footer { class: "lesson-panel__footer",
                button {
                    class: "btn btn-secondary",
                    id: "learn-prev",
                    r#type: "button",
                    disabled: !vm.has_prev,
                    onclick: move |_| on_intent.call(LearnIntent::Navigate(Direction::Prev)),
                    "← Previous"
                }
                button {
                    class: "btn btn-secondary",
                    id: "learn-next",
                    r#type: "button",
                    disabled: !vm.has_next,
                    onclick: move |_| on_intent.call(LearnIntent::Navigate(Direction::Next)),
                    "Next →"
                }
            }
        }
    }
}
