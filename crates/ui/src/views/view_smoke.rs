use api::{InMemoryApi, ProgressApi};
use course_core::model::{
    Course, CourseId, Lesson, LessonId, Section, SectionId, StreamLocator,
};

use super::test_harness::{ViewKind, setup_view_harness};

fn video(id: &str, title: &str) -> Lesson {
    let stream =
        StreamLocator::parse(format!("https://media.example.com/{id}/master.m3u8")).unwrap();
    Lesson::video(LessonId::new(id), title, 300, stream, Vec::new()).unwrap()
}

fn sample_course() -> Course {
    let s1 = Section::new(
        SectionId::new("s1"),
        "Getting Started",
        vec![
            video("L1", "Welcome"),
            Lesson::text(LessonId::new("L2"), "Reading Notes", "# Notes", Vec::new()).unwrap(),
        ],
    )
    .unwrap();
    let s2 = Section::new(SectionId::new("s2"), "Going Deeper", vec![video("L3", "Ownership")])
        .unwrap();
    Course::new(CourseId::new("c1"), "Rust in Practice", vec![s1, s2]).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn learn_view_smoke_renders_curriculum_and_current_lesson() {
    let mut harness = setup_view_harness(ViewKind::Learn, InMemoryApi::new(sample_course())).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Rust in Practice"), "missing course title in {html}");
    assert!(html.contains("Getting Started"), "missing section in {html}");
    assert!(html.contains("Welcome"), "missing lesson title in {html}");
    assert!(html.contains("Lesson 1 of 3"), "missing position in {html}");
    assert!(html.contains("lesson-row--current"), "missing current row in {html}");
    assert!(html.contains("Mark as complete"), "missing completion cta in {html}");
    assert!(html.contains("learn-video-mount"), "missing player mount in {html}");
    assert!(html.contains("Test Learner"), "missing watermark in {html}");
}

#[tokio::test(flavor = "multi_thread")]
async fn learn_view_smoke_renders_empty_state() {
    let course = Course::new(CourseId::new("c1"), "Empty Course", Vec::new()).unwrap();
    let mut harness = setup_view_harness(ViewKind::Learn, InMemoryApi::new(course)).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("No lessons are published"),
        "missing empty state in {html}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn learn_view_smoke_resumes_past_completed_lessons() {
    let api = InMemoryApi::new(sample_course());
    api.complete_lesson(&LessonId::new("L1"), 300).await.unwrap();

    let mut harness = setup_view_harness(ViewKind::Learn, api).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    // L1 is done, so the player resumes on the text lesson after it.
    assert!(html.contains("Lesson 2 of 3"), "missing resume position in {html}");
    assert!(html.contains("✓"), "missing completed badge in {html}");
    assert!(html.contains("Reading Notes"), "missing text lesson in {html}");
}

#[tokio::test(flavor = "multi_thread")]
async fn home_view_smoke_renders_course_card() {
    let mut harness = setup_view_harness(ViewKind::Home, InMemoryApi::new(sample_course())).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Rust in Practice"), "missing title in {html}");
    assert!(html.contains("3 lessons"), "missing lesson count in {html}");
    assert!(html.contains("Continue learning"), "missing cta in {html}");
}
