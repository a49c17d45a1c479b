use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use tracing_subscriber::EnvFilter;

use api::CredentialStore;
use course_core::model::CourseId;
use services::{
    AppServices, CatalogService, NotifierRef, PlayerService, ProgressService, ReviewService,
};
use ui::platform::{DesktopLinkOpener, LinkOpenerRef};
use ui::views::ToastBus;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingApiUrl,
    MissingCourseId,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingApiUrl => {
                write!(f, "no API url given (--api or COURSES_API_URL)")
            }
            ArgsError::MissingCourseId => {
                write!(f, "no course id given (--course-id or COURSES_COURSE_ID)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api <url>] [--course-id <id>] [--token <bearer>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COURSES_API_URL    backend base url");
    eprintln!("  COURSES_COURSE_ID  course to open");
    eprintln!("  COURSES_TOKEN      bearer token for the learner session");
    eprintln!("  COURSES_LEARNER    label shown in the playback watermark");
}

struct Args {
    api_url: String,
    course_id: CourseId,
    token: Option<String>,
    learner_label: String,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api_url = std::env::var("COURSES_API_URL").ok();
        let mut course_id = std::env::var("COURSES_COURSE_ID").ok();
        let mut token = std::env::var("COURSES_TOKEN").ok();
        let mut learner_label = std::env::var("COURSES_LEARNER")
            .ok()
            .unwrap_or_else(|| "Learner".to_string());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => api_url = Some(require_value(args, "--api")?),
                "--course-id" => course_id = Some(require_value(args, "--course-id")?),
                "--token" => token = Some(require_value(args, "--token")?),
                "--learner" => learner_label = require_value(args, "--learner")?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let api_url = api_url.ok_or(ArgsError::MissingApiUrl)?;
        let course_id = course_id
            .filter(|value| !value.trim().is_empty())
            .map(CourseId::new)
            .ok_or(ArgsError::MissingCourseId)?;

        Ok(Self {
            api_url,
            course_id,
            token,
            learner_label,
        })
    }
}

struct DesktopApp {
    course_id: CourseId,
    learner_label: String,
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressService>,
    player: Arc<PlayerService>,
    reviews: Arc<ReviewService>,
    toasts: ToastBus,
}

impl UiApp for DesktopApp {
    fn course_id(&self) -> CourseId {
        self.course_id.clone()
    }

    fn learner_label(&self) -> String {
        self.learner_label.clone()
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
        Arc::new(DesktopLinkOpener)
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let credentials = match parsed.token {
        Some(token) => CredentialStore::with_token(token),
        None => {
            tracing::warn!("no bearer token configured; media requests go out unauthenticated");
            CredentialStore::new()
        }
    };

    let toasts = ToastBus::new();
    let notifier: NotifierRef = Arc::new(toasts.clone());
    let app_services = AppServices::new_rest(
        &parsed.api_url,
        credentials,
        parsed.course_id.clone(),
        notifier,
    )
    .await?;

    let app = DesktopApp {
        course_id: parsed.course_id,
        learner_label: parsed.learner_label,
        catalog: app_services.catalog(),
        progress: app_services.progress(),
        player: app_services.player(),
        reviews: app_services.reviews(),
        toasts,
    };

    let context = build_app_context(&(Arc::new(app) as Arc<dyn UiApp>));

    // Keep the window a plain app window; some dev setups default to
    // always-on-top and make it behave like a modal.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Courses")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
