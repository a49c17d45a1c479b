//! Page scripts for the learning view.
//!
//! The media element is owned by a window-keyed JS state machine so an
//! unrelated re-render never recreates it; events bridge back into Rust by
//! clicking hidden buttons. Deterrence here is best-effort UX friction —
//! the authenticated per-segment fetch in the media gateway is the actual
//! protection.

/// Mounts (or re-keys) the video element for one playback session.
pub(super) fn player_mount_script(
    session_key: &str,
    playback_url: &str,
    watermark: &str,
) -> String {
    format!(
        r#"(function() {{
                    const mount = document.getElementById("learn-video-mount");
                    const state = window.__coursePlayer || (window.__coursePlayer = {{
                        key: null,
                        video: null,
                    }});
                    const release = () => {{
                        if (!state.video) return;
                        try {{
                            state.video.pause();
                            state.video.removeAttribute("src");
                            state.video.load();
                        }} catch (_) {{}}
                        if (state.video.parentNode) {{
                            state.video.parentNode.removeChild(state.video);
                        }}
                        state.video = null;
                    }};
                    if (!mount) {{
                        release();
                        state.key = null;
                        return;
                    }}
                    const key = {session_key:?};
                    if (state.key === key && state.video && mount.contains(state.video)) {{
                        return;
                    }}
                    release();
                    state.key = key;
                    const video = document.createElement("video");
                    video.id = "learn-video";
                    video.controls = true;
                    video.playsInline = true;
                    video.disablePictureInPicture = true;
                    video.setAttribute("controlsList", "nodownload noremoteplayback");
                    video.src = {playback_url:?};
                    video.addEventListener("ended", () => {{
                        const btn = document.getElementById("learn-complete-auto");
                        if (btn) btn.click();
                    }});
                    video.addEventListener("error", () => {{
                        const btn = document.getElementById("learn-playback-error");
                        if (btn) btn.click();
                    }});
                    video.addEventListener("contextmenu", (e) => e.preventDefault());
                    mount.appendChild(video);
                    const mark = document.getElementById("learn-watermark");
                    if (mark) mark.textContent = {watermark:?};
                }})();"#,
        session_key = session_key,
        playback_url = playback_url,
        watermark = watermark,
    )
}

/// Releases the media element when the current lesson has no video.
pub(super) fn player_teardown_script() -> String {
    r#"(function() {
                    const state = window.__coursePlayer;
                    if (!state || !state.video) return;
                    try {
                        state.video.pause();
                        state.video.removeAttribute("src");
                        state.video.load();
                    } catch (_) {}
                    if (state.video.parentNode) {
                        state.video.parentNode.removeChild(state.video);
                    }
                    state.video = null;
                    state.key = null;
                })();"#
        .to_string()
}

/// Casual-extraction friction: context menu and common inspect shortcuts.
/// Listeners no-op once the learn page is gone, and any failure here must
/// never break playback.
pub(super) fn deterrence_script() -> String {
    r#"(function() {
                    const state = window.__courseShield || (window.__courseShield = { armed: false });
                    if (state.armed) return;
                    state.armed = true;
                    try {
                        document.addEventListener("contextmenu", (e) => {
                            if (document.getElementById("learn-root")) e.preventDefault();
                        });
                        document.addEventListener("keydown", (e) => {
                            if (!document.getElementById("learn-root")) return;
                            const k = (e.key || "").toLowerCase();
                            const combo = e.ctrlKey || e.metaKey;
                            const blocked = e.key === "F12"
                                || (combo && e.shiftKey && (k === "i" || k === "j" || k === "c"))
                                || (combo && (k === "s" || k === "u"));
                            if (blocked) e.preventDefault();
                        });
                    } catch (_) {}
                })();"#
        .to_string()
}
