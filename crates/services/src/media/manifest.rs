//! HLS manifest rewriting.
//!
//! Every URI in a playlist — variant playlists, segments, keys, init maps —
//! is resolved against the upstream manifest URL and redirected through the
//! local gateway, so the media engine never fetches the backend directly.

use url::Url;

/// Local gateway endpoints for one playback session.
pub(crate) struct SessionRoutes {
    manifest: Url,
    segment: Url,
}

impl SessionRoutes {
    pub(crate) fn new(manifest: Url, segment: Url) -> Self {
        Self { manifest, segment }
    }

    fn route_for(&self, upstream: &Url) -> Url {
        let base = if is_playlist(upstream) {
            &self.manifest
        } else {
            &self.segment
        };
        let mut url = base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("u", upstream.as_str());
        url
    }
}

fn is_playlist(url: &Url) -> bool {
    let path = url.path();
    path.ends_with(".m3u8") || path.ends_with(".m3u")
}

/// Rewrites a playlist body so every reference routes through the gateway.
///
/// Lines that do not resolve to a URL are kept untouched — a malformed
/// entry degrades that one reference, never the whole playlist.
pub(crate) fn rewrite_manifest(body: &str, upstream: &Url, routes: &SessionRoutes) -> String {
    let mut out = String::with_capacity(body.len());
    for line in body.lines() {
        let rewritten = rewrite_line(line, upstream, routes);
        out.push_str(&rewritten);
        out.push('\n');
    }
    out
}

fn rewrite_line(line: &str, upstream: &Url, routes: &SessionRoutes) -> String {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return line.to_string();
    }
    if trimmed.starts_with('#') {
        return rewrite_tag_uri(line, upstream, routes);
    }
    match upstream.join(trimmed) {
        Ok(resolved) => routes.route_for(&resolved).to_string(),
        Err(_) => line.to_string(),
    }
}

/// Rewrites the `URI="..."` attribute carried by tags such as `#EXT-X-KEY`,
/// `#EXT-X-MAP` and `#EXT-X-MEDIA`. Tags without one pass through.
fn rewrite_tag_uri(line: &str, upstream: &Url, routes: &SessionRoutes) -> String {
    const ATTR: &str = "URI=\"";
    let Some(start) = line.find(ATTR) else {
        return line.to_string();
    };
    let value_start = start + ATTR.len();
    let Some(value_len) = line[value_start..].find('"') else {
        return line.to_string();
    };
    let value = &line[value_start..value_start + value_len];
    let Ok(resolved) = upstream.join(value) else {
        return line.to_string();
    };
    let routed = routes.route_for(&resolved);
    format!(
        "{}{}{}",
        &line[..value_start],
        routed,
        &line[value_start + value_len..]
    )
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
