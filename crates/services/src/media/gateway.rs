use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use tokio::net::TcpListener;
use url::Url;
use uuid::Uuid;

use api::CredentialStore;
use course_core::model::PlaybackSessionId;

use super::manifest::{SessionRoutes, rewrite_manifest};
use crate::error::MediaError;

/// Loopback proxy that authenticates every manifest and segment fetch.
///
/// The webview's media engine cannot attach credentials to its own segment
/// requests, so playback is pointed here instead. Each upstream fetch
/// re-reads the bearer token from the credential store, never caching it,
/// so a token refresh takes effect on the very next segment without
/// touching the running session.
pub struct MediaGateway {
    local_addr: SocketAddr,
    base_url: Url,
    client: reqwest::Client,
    credentials: CredentialStore,
    sessions: Mutex<HashMap<Uuid, Url>>,
}

#[derive(Deserialize)]
struct UpstreamQuery {
    u: Option<String>,
}

impl MediaGateway {
    /// Binds an ephemeral loopback port and starts serving.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Bind` if the listener cannot be set up.
    pub async fn start(credentials: CredentialStore) -> Result<Arc<Self>, MediaError> {
        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .map_err(|e| MediaError::Bind(e.to_string()))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| MediaError::Bind(e.to_string()))?;
        let base_url = Url::parse(&format!("http://{local_addr}/"))
            .map_err(|e| MediaError::Bind(e.to_string()))?;

        let gateway = Arc::new(Self {
            local_addr,
            base_url,
            client: reqwest::Client::new(),
            credentials,
            sessions: Mutex::new(HashMap::new()),
        });

        let app = Router::new()
            .route("/session/{session_id}/manifest.m3u8", get(manifest_handler))
            .route("/session/{session_id}/seg", get(segment_handler))
            .with_state(Arc::clone(&gateway));

        tracing::info!(%local_addr, "media gateway listening");
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!(error = %err, "media gateway stopped");
            }
        });

        Ok(gateway)
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Local manifest URL the media element should play.
    #[must_use]
    pub fn playback_url(&self, id: PlaybackSessionId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .push("session")
                .push(&id.to_string())
                .push("manifest.m3u8");
        }
        url
    }

    /// Number of registered (live) sessions. At most one under the session
    /// manager's ownership.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.lock_sessions().len()
    }

    pub(crate) fn register_session(&self, id: PlaybackSessionId, source: Url) {
        tracing::debug!(session = %id, "registering playback session");
        self.lock_sessions().insert(id.value(), source);
    }

    /// Unregisters synchronously: requests already in flight for the id
    /// answer `410 Gone` from this point on.
    pub(crate) fn remove_session(&self, id: PlaybackSessionId) {
        tracing::debug!(session = %id, "disposing playback session");
        self.lock_sessions().remove(&id.value());
    }

    fn session_source(&self, id: Uuid) -> Option<Url> {
        self.lock_sessions().get(&id).cloned()
    }

    fn session_routes(&self, id: Uuid) -> SessionRoutes {
        let mut manifest = self.base_url.clone();
        let mut segment = self.base_url.clone();
        let id = id.to_string();
        if let Ok(mut segments) = manifest.path_segments_mut() {
            segments.push("session").push(&id).push("manifest.m3u8");
        }
        if let Ok(mut segments) = segment.path_segments_mut() {
            segments.push("session").push(&id).push("seg");
        }
        SessionRoutes::new(manifest, segment)
    }

    async fn fetch_upstream(&self, upstream: &Url) -> Result<UpstreamResponse, reqwest::Error> {
        let mut request = self.client.get(upstream.clone());
        // Token is read here, per request, not captured at session open.
        if let Some(token) = self.credentials.bearer_token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?.to_vec();
        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<Uuid, Url>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

struct UpstreamResponse {
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
}

fn passthrough_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}

/// Resolves the upstream target for a request, enforcing that it stays on
/// the registered source's origin. The gateway is not an open proxy.
fn resolve_upstream(source: &Url, query: &UpstreamQuery) -> Result<Url, StatusCode> {
    let Some(raw) = query.u.as_deref() else {
        return Ok(source.clone());
    };
    let upstream = Url::parse(raw).map_err(|_| StatusCode::BAD_REQUEST)?;
    if upstream.origin() != source.origin() {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(upstream)
}

async fn manifest_handler(
    State(gateway): State<Arc<MediaGateway>>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<UpstreamQuery>,
) -> Response {
    let Some(source) = gateway.session_source(session_id) else {
        return StatusCode::GONE.into_response();
    };
    let upstream = match resolve_upstream(&source, &query) {
        Ok(url) => url,
        Err(status) => return status.into_response(),
    };

    match gateway.fetch_upstream(&upstream).await {
        Ok(response) if (200..300).contains(&response.status) => {
            let body = String::from_utf8_lossy(&response.body);
            let routes = gateway.session_routes(session_id);
            let rewritten = rewrite_manifest(&body, &upstream, &routes);
            (
                [(header::CONTENT_TYPE, "application/vnd.apple.mpegurl")],
                rewritten,
            )
                .into_response()
        }
        Ok(response) => passthrough_status(response.status).into_response(),
        Err(err) => {
            tracing::warn!(%upstream, error = %err, "manifest fetch failed");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

async fn segment_handler(
    State(gateway): State<Arc<MediaGateway>>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<UpstreamQuery>,
) -> Response {
    let Some(source) = gateway.session_source(session_id) else {
        return StatusCode::GONE.into_response();
    };
    if query.u.is_none() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let upstream = match resolve_upstream(&source, &query) {
        Ok(url) => url,
        Err(status) => return status.into_response(),
    };

    match gateway.fetch_upstream(&upstream).await {
        Ok(response) if (200..300).contains(&response.status) => {
            let content_type = response
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string());
            ([(header::CONTENT_TYPE, content_type)], response.body).into_response()
        }
        Ok(response) => passthrough_status(response.status).into_response(),
        Err(err) => {
            tracing::warn!(%upstream, error = %err, "segment fetch failed");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}
