use dioxus::prelude::*;

use crate::context::AppContext;

#[component]
pub(super) fn ReviewModal(on_close: EventHandler<()>) -> Element {
    let ctx = use_context::<AppContext>();
    let mut rating = use_signal(|| 0u8);
    let mut text = use_signal(String::new);
    let mut submitting = use_signal(|| false);
    let mut error = use_signal(|| None::<&'static str>);

    let submit = {
        let reviews = ctx.reviews();
        let course_id = ctx.course_id();
        use_callback(move |()| {
            if submitting() {
                return;
            }
            let rating_value = rating();
            // Same rule the service enforces, checked here so nothing is
            // even attempted for an un-picked rating.
            if !(1..=5).contains(&rating_value) {
                error.set(Some("Pick a rating first."));
                return;
            }
            submitting.set(true);
            error.set(None);
            let reviews = reviews.clone();
            let course_id = course_id.clone();
            spawn(async move {
                let result = reviews.submit(&course_id, rating_value, &text()).await;
                submitting.set(false);
                match result {
                    Ok(()) => on_close.call(()),
                    Err(_) => error.set(Some("Could not submit your review. Please try again.")),
                }
            });
        })
    };

    rsx! {
        div { class: "modal-overlay",
            div {
                class: "modal review-modal",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "review-modal-title",
                h3 { id: "review-modal-title", "Rate this course" }
                div { class: "review-stars",
                    for value in 1..=5u8 {
                        button {
                            key: "{value}",
                            class: if rating() >= value { "review-star review-star--on" } else { "review-star" },
                            r#type: "button",
                            aria_label: "{value} stars",
                            onclick: move |_| rating.set(value),
                            "★"
                        }
                    }
                }
                textarea {
                    class: "review-text",
                    placeholder: "What did you think?",
                    value: "{text}",
                    oninput: move |evt| text.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: "review-error", "{message}" }
                }
                div { class: "modal__actions",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        id: "review-submit",
                        r#type: "button",
                        disabled: submitting() || rating() == 0,
                        onclick: move |_| submit.call(()),
                        if submitting() { "Sending..." } else { "Submit review" }
                    }
                }
            }
        }
    }
}
