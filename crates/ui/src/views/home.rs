use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::format_percent;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let progress = ctx.progress();
    let course_id = ctx.course_id();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let progress = progress.clone();
        let course_id = course_id.clone();
        async move {
            let curriculum = catalog
                .load_curriculum(&course_id)
                .await
                .map_err(|_| ViewError::CourseUnavailable)?;
            progress
                .refresh()
                .await
                .map_err(|_| ViewError::CourseUnavailable)?;
            Ok::<_, ViewError>((curriculum.course().title().to_string(), curriculum.len()))
        }
    });
    let state = view_state_from_resource(&resource);
    let percent_label = format_percent(ctx.progress().percentage());

    rsx! {
        div { class: "page home-page",
            h2 { "Overview" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready((title, lesson_count)) => rsx! {
                    div { class: "course-card",
                        h3 { class: "course-card__title", "{title}" }
                        p { class: "course-card__meta",
                            "{lesson_count} lessons · {percent_label} complete"
                        }
                        Link { to: Route::Learn {}, class: "btn btn-primary", "Continue learning" }
                    }
                },
            }
        }
    }
}
