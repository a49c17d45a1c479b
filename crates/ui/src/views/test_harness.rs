use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use api::InMemoryApi;
use course_core::model::CourseId;
use services::{
    AppServices, CatalogService, NotifierRef, PlayerService, ProgressService, ReviewService,
};

use crate::context::{UiApp, build_app_context};
use crate::platform::{LinkOpenerRef, UiLinkOpener};
use crate::views::{HomeView, LearnView, ToastBus};

struct NoopLinkOpener;

impl UiLinkOpener for NoopLinkOpener {
    fn open_url(&self, _url: &str) {}
}

#[derive(Clone)]
struct TestApp {
    course_id: CourseId,
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressService>,
    player: Arc<PlayerService>,
    reviews: Arc<ReviewService>,
    toasts: ToastBus,
}

impl UiApp for TestApp {
    fn course_id(&self) -> CourseId {
        self.course_id.clone()
    }

    fn learner_label(&self) -> String {
        "Test Learner".to_string()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    fn player(&self) -> Arc<PlayerService> {
        Arc::clone(&self.player)
    }

    fn reviews(&self) -> Arc<ReviewService> {
        Arc::clone(&self.reviews)
    }

    fn toasts(&self) -> ToastBus {
        self.toasts.clone()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(NoopLinkOpener)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Learn,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Learn => rsx! { LearnView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: AppServices,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drives queued async work (resource loads) to quiescence.
    pub async fn settle(&mut self) {
        for _ in 0..5 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub async fn setup_view_harness(view: ViewKind, api: InMemoryApi) -> ViewHarness {
    let toasts = ToastBus::new();
    let notifier: NotifierRef = Arc::new(toasts.clone());
    let services = AppServices::new_in_memory(api, CourseId::new("c1"), notifier)
        .await
        .expect("app services");

    let app = Arc::new(TestApp {
        course_id: services.course_id().clone(),
        catalog: services.catalog(),
        progress: services.progress(),
        player: services.player(),
        reviews: services.reviews(),
        toasts,
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, services }
}
