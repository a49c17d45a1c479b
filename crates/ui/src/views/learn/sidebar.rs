use dioxus::prelude::*;

use crate::vm::{LessonRowVm, SectionVm};

use super::view::LearnIntent;

#[component]
pub(super) fn CurriculumSidebar(
    sections: Vec<SectionVm>,
    on_intent: EventHandler<LearnIntent>,
) -> Element {
    rsx! {
        aside { class: "curriculum",
            for section in sections {
                CurriculumSection { key: "{section.index}", section, on_intent }
            }
        }
    }
}

#[component]
fn CurriculumSection(section: SectionVm, on_intent: EventHandler<LearnIntent>) -> Element {
    let index = section.index;
    let marker = if section.expanded { "▾" } else { "▸" };
    rsx! {
        div { class: "curriculum__section",
            button {
                class: "curriculum__section-toggle",
                r#type: "button",
                onclick: move |_| on_intent.call(LearnIntent::ToggleSection(index)),
                span { class: "curriculum__section-marker", "{marker}" }
                span { class: "curriculum__section-title", "{section.title}" }
                span { class: "curriculum__section-count",
                    "{section.completed_count} / {section.lesson_count}"
                }
            }
            if section.expanded {
                ul { class: "curriculum__lessons",
                    for lesson in section.lessons {
                        LessonRow { key: "{lesson.id}", lesson, on_intent }
                    }
                }
            }
        }
    }
}

#[component]
fn LessonRow(lesson: LessonRowVm, on_intent: EventHandler<LearnIntent>) -> Element {
    let class = if lesson.current {
        "lesson-row lesson-row--current"
    } else {
        "lesson-row"
    };
    let badge = if lesson.completed {
        "✓"
    } else if lesson.is_video {
        "▶"
    } else {
        "≡"
    };
    let lesson_id = lesson.id.clone();
    rsx! {
        li {
            button {
                class: "{class}",
                r#type: "button",
                onclick: move |_| on_intent.call(LearnIntent::Select(lesson_id.clone())),
                span { class: "lesson-row__badge", "{badge}" }
                span { class: "lesson-row__title", "{lesson.title}" }
                if let Some(duration) = lesson.duration_label.clone() {
                    span { class: "lesson-row__duration", "{duration}" }
                }
            }
        }
    }
}
