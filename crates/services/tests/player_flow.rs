use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use api::{ApiError, CredentialStore, InMemoryApi, ProgressApi};
use course_core::Direction;
use course_core::model::{
    Course, CourseId, Lesson, LessonId, ProgressSnapshot, Section, SectionId, StreamLocator,
};
use services::{
    AppServices, CompletionStatus, MediaGateway, MediaSessionManager, NullNotifier, Player,
    PlayerError, PlayerPhase, PlayerService, ProgressService, ReviewError,
};

fn video(id: &str) -> Lesson {
    let stream =
        StreamLocator::parse(format!("https://media.example.com/{id}/master.m3u8")).unwrap();
    Lesson::video(
        LessonId::new(id),
        format!("Lesson {id}"),
        120,
        stream,
        Vec::new(),
    )
    .unwrap()
}

fn text(id: &str) -> Lesson {
    Lesson::text(LessonId::new(id), format!("Lesson {id}"), "# Notes", Vec::new()).unwrap()
}

fn course(lessons_by_section: Vec<(&str, Vec<Lesson>)>) -> Course {
    let sections = lessons_by_section
        .into_iter()
        .map(|(id, lessons)| Section::new(SectionId::new(id), format!("Section {id}"), lessons))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    Course::new(CourseId::new("c1"), "Rust in Practice", sections).unwrap()
}

fn default_course() -> Course {
    course(vec![
        ("s1", vec![video("L1"), video("L2")]),
        ("s2", vec![video("L3")]),
    ])
}

async fn services_over(api: InMemoryApi) -> AppServices {
    AppServices::new_in_memory(api, CourseId::new("c1"), Arc::new(NullNotifier))
        .await
        .expect("app services")
}

async fn load_player(services: &AppServices) -> Player {
    let curriculum = services
        .catalog()
        .load_curriculum(services.course_id())
        .await
        .expect("curriculum");
    services.progress().refresh().await.expect("progress");
    services.player().initialize(Arc::new(curriculum))
}

#[tokio::test(flavor = "multi_thread")]
async fn initial_load_selects_the_first_lesson_and_opens_media() {
    let services = services_over(InMemoryApi::new(default_course())).await;
    let player = load_player(&services).await;

    assert_eq!(player.phase(), PlayerPhase::LessonActive);
    assert_eq!(player.current_id(), Some(&LessonId::new("L1")));

    let session = services.player().current_session().expect("media session");
    assert_eq!(session.lesson_id(), &LessonId::new("L1"));
    assert_eq!(services.media().live_sessions(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn navigation_walks_the_sequence_and_stops_at_the_edges() {
    let services = services_over(InMemoryApi::new(default_course())).await;
    let mut player = load_player(&services).await;
    let svc = services.player();

    svc.navigate(&mut player, Direction::Next);
    assert_eq!(player.current_id(), Some(&LessonId::new("L2")));

    svc.navigate(&mut player, Direction::Next);
    assert_eq!(player.current_id(), Some(&LessonId::new("L3")));

    svc.navigate(&mut player, Direction::Next);
    assert_eq!(player.current_id(), Some(&LessonId::new("L3")));

    svc.navigate(&mut player, Direction::Prev);
    svc.navigate(&mut player, Direction::Prev);
    assert_eq!(player.current_id(), Some(&LessonId::new("L1")));

    svc.navigate(&mut player, Direction::Prev);
    assert_eq!(player.current_id(), Some(&LessonId::new("L1")));
}

#[tokio::test(flavor = "multi_thread")]
async fn switching_lessons_never_leaves_two_sessions() {
    let services = services_over(InMemoryApi::new(default_course())).await;
    let mut player = load_player(&services).await;
    let svc = services.player();

    for _ in 0..3 {
        svc.navigate(&mut player, Direction::Next);
        assert_eq!(services.media().live_sessions(), 1);
        let session = svc.current_session().expect("session");
        assert_eq!(Some(session.lesson_id()), player.current_id());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn reselecting_the_current_lesson_keeps_the_session() {
    let services = services_over(InMemoryApi::new(default_course())).await;
    let mut player = load_player(&services).await;
    let svc = services.player();

    let before = svc.current_session().expect("session");
    svc.select_lesson(&mut player, &LessonId::new("L1")).unwrap();
    let after = svc.current_session().expect("session");

    assert_eq!(before.id(), after.id());
}

#[tokio::test(flavor = "multi_thread")]
async fn text_lessons_close_the_media_session() {
    let api = InMemoryApi::new(course(vec![("s1", vec![video("L1"), text("L2")])]));
    let services = services_over(api).await;
    let mut player = load_player(&services).await;
    let svc = services.player();

    assert_eq!(services.media().live_sessions(), 1);

    svc.navigate(&mut player, Direction::Next);
    assert_eq!(player.current_id(), Some(&LessonId::new("L2")));
    assert!(svc.current_session().is_none());
    assert_eq!(services.media().live_sessions(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_curriculum_selects_nothing() {
    let api = InMemoryApi::new(course(Vec::new()));
    let services = services_over(api).await;
    let mut player = load_player(&services).await;
    let svc = services.player();

    assert_eq!(player.phase(), PlayerPhase::NoLessonSelected);
    assert!(player.current_id().is_none());
    assert!(svc.current_session().is_none());

    // Navigation degrades to a no-op rather than failing.
    svc.navigate(&mut player, Direction::Next);
    assert!(player.current_id().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn selecting_an_unknown_lesson_is_rejected() {
    let services = services_over(InMemoryApi::new(default_course())).await;
    let mut player = load_player(&services).await;

    let err = services
        .player()
        .select_lesson(&mut player, &LessonId::new("ghost"))
        .unwrap_err();
    assert!(matches!(err, PlayerError::UnknownLesson(_)));
    assert_eq!(player.current_id(), Some(&LessonId::new("L1")));
}

#[tokio::test(flavor = "multi_thread")]
async fn resume_prefers_the_first_incomplete_lesson() {
    let api = InMemoryApi::new(default_course());
    api.complete_lesson(&LessonId::new("L1"), 120).await.unwrap();

    let services = services_over(api).await;
    let player = load_player(&services).await;

    assert_eq!(player.current_id(), Some(&LessonId::new("L2")));
}

#[tokio::test(flavor = "multi_thread")]
async fn completion_is_confirmed_by_the_server_snapshot() {
    let api = InMemoryApi::new(default_course());
    let services = services_over(api.clone()).await;
    let player = load_player(&services).await;
    let svc = services.player();
    let lesson = player.current_id().cloned().unwrap();

    let status = svc.complete_lesson(&lesson, 115).await.unwrap();

    assert_eq!(status, CompletionStatus::Recorded);
    assert!(svc.progress().is_complete(&lesson));
    assert!(!svc.is_completion_pending(&lesson));
    let expected = 100.0 / 3.0;
    assert!((svc.progress().percentage() - expected).abs() < 0.01);
}

#[tokio::test(flavor = "multi_thread")]
async fn replay_of_a_completed_lesson_does_not_resubmit() {
    let api = InMemoryApi::new(default_course());
    let services = services_over(api.clone()).await;
    let player = load_player(&services).await;
    let svc = services.player();
    let lesson = player.current_id().cloned().unwrap();

    svc.complete_lesson(&lesson, 120).await.unwrap();
    let second = svc.complete_lesson(&lesson, 120).await.unwrap();

    assert_eq!(second, CompletionStatus::AlreadyComplete);
    assert_eq!(api.completion_calls(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn selection_seq_moves_on_when_the_lesson_changes() {
    let services = services_over(InMemoryApi::new(default_course())).await;
    let mut player = load_player(&services).await;
    let svc = services.player();

    let seq = player.selection_seq();
    let lesson = player.current_id().cloned().unwrap();

    svc.navigate(&mut player, Direction::Next);

    // A caller holding (lesson, seq) from before the switch can tell its
    // async result is stale and must be discarded.
    assert_ne!(player.selection_seq(), seq);
    assert_ne!(player.current_id(), Some(&lesson));
}

#[tokio::test(flavor = "multi_thread")]
async fn review_rating_is_validated_before_the_network() {
    let api = InMemoryApi::new(default_course());
    let services = services_over(api.clone()).await;

    let err = services
        .reviews()
        .submit(services.course_id(), 0, "nope")
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::Rating(_)));
    assert!(api.reviews().is_empty());

    services
        .reviews()
        .submit(services.course_id(), 5, "excellent")
        .await
        .unwrap();
    assert_eq!(api.reviews().len(), 1);
}

// ─── concurrent completion handling ────────────────────────────────────────────

/// Progress backend whose completions block until released, to observe
/// in-flight behavior.
struct GatedProgressApi {
    gate: Arc<tokio::sync::Notify>,
    calls: AtomicU32,
}

impl GatedProgressApi {
    fn new() -> Self {
        Self {
            gate: Arc::new(tokio::sync::Notify::new()),
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn release_one(&self) {
        self.gate.notify_one();
    }
}

#[async_trait::async_trait]
impl ProgressApi for GatedProgressApi {
    async fn progress(&self, _course_id: &CourseId) -> Result<ProgressSnapshot, ApiError> {
        Ok(ProgressSnapshot::default())
    }

    async fn complete_lesson(
        &self,
        _lesson_id: &LessonId,
        _watch_time_secs: u32,
    ) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(())
    }
}

async fn gated_player_service(api: Arc<GatedProgressApi>) -> PlayerService {
    let progress = Arc::new(ProgressService::new(
        CourseId::new("c1"),
        api as Arc<dyn ProgressApi>,
    ));
    let gateway = MediaGateway::start(CredentialStore::new())
        .await
        .expect("gateway");
    let media = Arc::new(MediaSessionManager::new(gateway));
    PlayerService::new(progress, media, Arc::new(NullNotifier))
}

async fn wait_for_calls(api: &GatedProgressApi, expected: u32) {
    for _ in 0..200 {
        if api.calls() >= expected {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("backend never saw {expected} completion call(s)");
}

#[tokio::test(flavor = "multi_thread")]
async fn a_second_completion_for_the_same_lesson_is_suppressed_while_pending() {
    let api = Arc::new(GatedProgressApi::new());
    let svc = gated_player_service(Arc::clone(&api)).await;
    let lesson = LessonId::new("L1");

    let first = {
        let svc = svc.clone();
        let lesson = lesson.clone();
        tokio::spawn(async move { svc.complete_lesson(&lesson, 100).await })
    };
    wait_for_calls(&api, 1).await;
    assert!(svc.is_completion_pending(&lesson));

    // The rapid repeat is dropped, not queued: only one submission goes out.
    let second = svc.complete_lesson(&lesson, 100).await.unwrap();
    assert_eq!(second, CompletionStatus::Suppressed);
    assert_eq!(api.calls(), 1);

    api.release_one();
    let first = first.await.unwrap().unwrap();
    assert_eq!(first, CompletionStatus::Recorded);
    assert!(!svc.is_completion_pending(&lesson));
}

#[tokio::test(flavor = "multi_thread")]
async fn completions_for_distinct_lessons_may_run_concurrently() {
    let api = Arc::new(GatedProgressApi::new());
    let svc = gated_player_service(Arc::clone(&api)).await;

    let first = {
        let svc = svc.clone();
        tokio::spawn(async move { svc.complete_lesson(&LessonId::new("L1"), 100).await })
    };
    let second = {
        let svc = svc.clone();
        tokio::spawn(async move { svc.complete_lesson(&LessonId::new("L2"), 100).await })
    };

    wait_for_calls(&api, 2).await;
    assert!(svc.is_completion_pending(&LessonId::new("L1")));
    assert!(svc.is_completion_pending(&LessonId::new("L2")));

    api.release_one();
    api.release_one();
    assert_eq!(
        first.await.unwrap().unwrap(),
        CompletionStatus::Recorded
    );
    assert_eq!(
        second.await.unwrap().unwrap(),
        CompletionStatus::Recorded
    );
}
