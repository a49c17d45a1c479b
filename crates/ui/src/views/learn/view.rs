use std::sync::Arc;

use dioxus::document::eval;
use dioxus::prelude::*;

use course_core::Direction;
use course_core::model::{LessonContent, LessonId, LessonKind};
use services::{Player, PlayerPhase};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{format_duration, map_sections, markdown_to_html, progress_label};

use super::content::LessonPanel;
use super::review::ReviewModal;
use super::scripts::{deterrence_script, player_mount_script, player_teardown_script};
use super::sidebar::CurriculumSidebar;

#[derive(Clone, Debug, PartialEq)]
pub(super) enum LearnIntent {
    Select(LessonId),
    Navigate(Direction),
    ToggleSection(usize),
    CompleteCurrent,
    PlaybackError,
    OpenResource(String),
}

/// Everything the lesson panel needs, precomputed so the component tree
/// stays free of service lookups.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct LessonPanelVm {
    pub title: String,
    pub index_label: String,
    pub is_video: bool,
    pub body_html: Option<String>,
    pub resources: Vec<(String, String)>,
    pub completed: bool,
    pub pending: bool,
    pub has_prev: bool,
    pub has_next: bool,
    pub watermark: String,
}

#[component]
pub fn LearnView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let player_service = ctx.player();
    let link_opener = ctx.link_opener();
    let watermark = ctx.learner_label().to_string();
    let course_id = ctx.course_id();

    let player = use_signal(|| None::<Player>);
    let pending_for = use_signal(|| None::<LessonId>);
    let mut review_open = use_signal(|| false);

    let resource = {
        let catalog = catalog.clone();
        let progress = ctx.progress();
        let player_service = player_service.clone();
        use_resource(move || {
            let catalog = catalog.clone();
            let progress = progress.clone();
            let player_service = player_service.clone();
            let course_id = course_id.clone();
            let mut player = player;

            async move {
                // Curriculum and progress both land before the initial
                // selection, so completion state is never misreported.
                let curriculum = catalog
                    .load_curriculum(&course_id)
                    .await
                    .map_err(|_| ViewError::CourseUnavailable)?;
                progress
                    .refresh()
                    .await
                    .map_err(|_| ViewError::CourseUnavailable)?;
                player.set(Some(player_service.initialize(Arc::new(curriculum))));
                Ok::<_, ViewError>(())
            }
        })
    };
    let state = view_state_from_resource(&resource);

    let dispatch_intent = {
        let player_service = player_service.clone();
        let link_opener = link_opener.clone();
        use_callback(move |intent: LearnIntent| {
            let mut player = player;
            let mut pending_for = pending_for;

            match intent {
                LearnIntent::Select(lesson_id) => {
                    if let Some(player) = player.write().as_mut() {
                        let _ = player_service.select_lesson(player, &lesson_id);
                    }
                }
                LearnIntent::Navigate(direction) => {
                    if let Some(player) = player.write().as_mut() {
                        player_service.navigate(player, direction);
                    }
                }
                LearnIntent::ToggleSection(index) => {
                    if let Some(player) = player.write().as_mut() {
                        player.toggle_section(index);
                    }
                }
                LearnIntent::OpenResource(url) => link_opener.open_url(&url),
                LearnIntent::PlaybackError => {
                    player_service.report_playback_error("media engine error");
                }
                LearnIntent::CompleteCurrent => {
                    let Some((lesson_id, watch_secs)) = player.read().as_ref().and_then(|p| {
                        let lesson = p.current_lesson()?;
                        Some((lesson.id().clone(), lesson.duration_secs().unwrap_or(0)))
                    }) else {
                        return;
                    };
                    // Replay guard plus the per-lesson pending guard; the
                    // service enforces both again underneath.
                    if player_service.progress().is_complete(&lesson_id) {
                        return;
                    }
                    if pending_for.read().as_ref() == Some(&lesson_id) {
                        return;
                    }
                    pending_for.set(Some(lesson_id.clone()));
                    let player_service = player_service.clone();
                    spawn(async move {
                        // The outcome lands in the progress cache either
                        // way; a result that arrives after the learner moved
                        // to another lesson has no UI left to update.
                        let _ = player_service.complete_lesson(&lesson_id, watch_secs).await;
                        if pending_for.read().as_ref() == Some(&lesson_id) {
                            pending_for.set(None);
                        }
                    });
                }
            }
        })
    };

    // Arm context-menu/shortcut friction once per page.
    use_effect(move || {
        let _ = eval(&deterrence_script());
    });

    // Keep the media element in sync with the live playback session.
    {
        let player_service = player_service.clone();
        let watermark = watermark.clone();
        use_effect(move || {
            let guard = player.read();
            let is_video = guard
                .as_ref()
                .and_then(Player::current_lesson)
                .is_some_and(|lesson| lesson.kind() == LessonKind::Video);
            let js = if is_video {
                match player_service.current_session() {
                    Some(session) => player_mount_script(
                        &session.id().to_string(),
                        session.playback_url().as_str(),
                        &watermark,
                    ),
                    None => player_teardown_script(),
                }
            } else {
                player_teardown_script()
            };
            let _ = eval(&js);
        });
    }

    let on_key = use_callback(move |evt: KeyboardEvent| {
        if review_open() {
            return;
        }
        match evt.data.key().to_string().as_str() {
            "ArrowRight" => {
                evt.prevent_default();
                dispatch_intent.call(LearnIntent::Navigate(Direction::Next));
            }
            "ArrowLeft" => {
                evt.prevent_default();
                dispatch_intent.call(LearnIntent::Navigate(Direction::Prev));
            }
            _ => {}
        }
    });

    // Project the owned state into render data before any rsx borrows.
    let guard = player.read();
    let progress = player_service.progress();
    let sections = guard
        .as_ref()
        .map(|p| map_sections(p, progress))
        .unwrap_or_default();
    let course_title = guard
        .as_ref()
        .map(|p| p.curriculum().course().title().to_string())
        .unwrap_or_default();
    let footer_label = guard.as_ref().map(|p| {
        progress_label(
            progress.percentage(),
            p.curriculum()
                .flatten()
                .iter()
                .filter(|lesson| progress.is_complete(lesson.id()))
                .count(),
            p.curriculum().len(),
        )
    });
    let phase = guard.as_ref().map(Player::phase);
    let panel = guard.as_ref().and_then(|p| build_panel_vm(p, &ctx, &pending_for));
    drop(guard);

    rsx! {
        div { class: "page learn-page", id: "learn-root", tabindex: "0", onkeydown: on_key,
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { class: "learn-loading", "Loading course..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "learn-error",
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
                    }
                },
                ViewState::Ready(()) => rsx! {
                    header { class: "learn-header",
                        h2 { class: "learn-header__title", "{course_title}" }
                        div { class: "learn-header__meta",
                            if let Some(label) = footer_label.clone() {
                                span { class: "learn-header__progress", "{label}" }
                            }
                            button {
                                class: "btn btn-ghost",
                                id: "learn-review-open",
                                r#type: "button",
                                onclick: move |_| review_open.set(true),
                                "Leave a review"
                            }
                        }
                    }
                    div { class: "learn-body",
                        CurriculumSidebar { sections, on_intent: dispatch_intent }
                        match (phase, panel.clone()) {
                            (Some(PlayerPhase::LessonActive), Some(panel)) => rsx! {
                                LessonPanel { vm: panel, on_intent: dispatch_intent }
                            },
                            _ => rsx! {
                                div { class: "learn-empty",
                                    p { "No lessons are published for this course yet." }
                                }
                            },
                        }
                    }
                    if review_open() {
                        ReviewModal { on_close: move |()| review_open.set(false) }
                    }
                },
            }
        }
    }
}

fn build_panel_vm(
    player: &Player,
    ctx: &AppContext,
    pending_for: &Signal<Option<LessonId>>,
) -> Option<LessonPanelVm> {
    let lesson = player.current_lesson()?;
    let lesson_id = lesson.id().clone();
    let progress = ctx.progress();

    let index_label = match (player.current_index(), player.curriculum().len()) {
        (Some(index), total) if total > 0 => format!("Lesson {} of {total}", index + 1),
        _ => String::new(),
    };
    let body_html = match lesson.content() {
        LessonContent::Text { body } => Some(markdown_to_html(body)),
        LessonContent::Video { .. } => None,
    };
    let resources = lesson
        .resources()
        .iter()
        .map(|link| (link.label().to_string(), link.url().to_string()))
        .collect();
    let title = match lesson.duration_secs() {
        Some(secs) => format!("{} ({})", lesson.title(), format_duration(secs)),
        None => lesson.title().to_string(),
    };

    Some(LessonPanelVm {
        title,
        index_label,
        is_video: lesson.kind() == LessonKind::Video,
        body_html,
        resources,
        completed: progress.is_complete(&lesson_id),
        pending: pending_for.read().as_ref() == Some(&lesson_id),
        has_prev: player
            .curriculum()
            .neighbor(&lesson_id, Direction::Prev)
            .is_some(),
        has_next: player
            .curriculum()
            .neighbor(&lesson_id, Direction::Next)
            .is_some(),
        watermark: ctx.learner_label().to_string(),
    })
}
