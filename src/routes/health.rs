//! Health check endpoint for container orchestration.
//!
//! Liveness only: it never touches the upstream, so an unreachable upstream
//! does not get the relay restarted.

/// Returns "ok" while the process can answer HTTP.
pub async fn health() -> &'static str {
    "ok"
}
