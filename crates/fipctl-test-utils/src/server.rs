//! Mock FIP control plane — axum router over a Unix domain socket.
//!
//! Implements the client's endpoint contract against an in-memory
//! address table so the real [`fipctl_core::FipClient`] can be exercised
//! end to end without a running control plane. Test infrastructure only;
//! it defines nothing about the real server.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::extract::{Path as UrlPath, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use serde::Deserialize;
use tempfile::TempDir;
use tokio::net::UnixListener;
use tracing::info;

use fipctl_core::fip::{FipResource, NameRequest};

/// In-memory address table shared by all route handlers.
#[derive(Default)]
pub struct PlaneState {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    /// ip → name. BTreeMap so listings come out in a stable order.
    fips: BTreeMap<String, String>,
    /// Total addresses ever allocated; drives address generation.
    allocated: u32,
}

impl PlaneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State pre-seeded with the given `(ip, name)` pairs.
    pub fn seeded(fips: &[(&str, &str)]) -> Self {
        let state = Self::default();
        {
            let mut inner = state.inner.lock().unwrap();
            for (ip, name) in fips {
                inner.fips.insert((*ip).to_string(), (*name).to_string());
            }
        }
        state
    }

    /// Number of addresses currently held.
    pub fn held(&self) -> usize {
        self.inner.lock().unwrap().fips.len()
    }
}

#[derive(Deserialize)]
struct AllocateParams {
    #[serde(default = "default_count")]
    count: u32,
}

fn default_count() -> u32 {
    1
}

/// Build the axum router with the FIP routes.
pub fn router(state: Arc<PlaneState>) -> axum::Router {
    axum::Router::new()
        .route("/fips", get(handle_list).post(handle_allocate))
        .route(
            "/fips/{ip}",
            get(handle_get).post(handle_name).delete(handle_release),
        )
        .with_state(state)
}

/// A mock control plane served on a Unix socket in an owned temp
/// directory. The directory (and socket) is deleted on drop, and the
/// serve task is aborted.
pub struct MockControlPlane {
    socket_path: PathBuf,
    handle: tokio::task::JoinHandle<()>,
    _temp_dir: TempDir,
}

impl MockControlPlane {
    /// Spawn a fresh, empty control plane.
    pub async fn spawn() -> Self {
        Self::spawn_with_state(Arc::new(PlaneState::new())).await
    }

    /// Spawn a control plane over the given (possibly pre-seeded) state.
    pub async fn spawn_with_state(state: Arc<PlaneState>) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let socket_path = temp_dir.path().join("fipd.sock");

        // Bind before spawning so callers can connect immediately.
        let listener =
            UnixListener::bind(&socket_path).expect("failed to bind mock control-plane socket");
        info!(path = %socket_path.display(), "mock control plane listening");

        let app = router(state);
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::warn!(error = %e, "mock control plane exited");
            }
        });

        Self {
            socket_path,
            handle,
            _temp_dir: temp_dir,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for MockControlPlane {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ── Route handlers ──────────────────────────────────────────────────────

async fn handle_allocate(
    State(state): State<Arc<PlaneState>>,
    Query(params): Query<AllocateParams>,
) -> (StatusCode, Json<Vec<FipResource>>) {
    let mut inner = state.inner.lock().unwrap();
    let mut allocated = Vec::with_capacity(params.count as usize);
    for _ in 0..params.count {
        inner.allocated += 1;
        let ip = format!("10.4.0.{}", inner.allocated);
        inner.fips.insert(ip.clone(), String::new());
        allocated.push(FipResource {
            ip,
            name: String::new(),
        });
    }
    (StatusCode::CREATED, Json(allocated))
}

async fn handle_list(State(state): State<Arc<PlaneState>>) -> Json<Vec<FipResource>> {
    let inner = state.inner.lock().unwrap();
    let fips = inner
        .fips
        .iter()
        .map(|(ip, name)| FipResource {
            ip: ip.clone(),
            name: name.clone(),
        })
        .collect();
    Json(fips)
}

async fn handle_get(
    State(state): State<Arc<PlaneState>>,
    UrlPath(ip): UrlPath<String>,
) -> Result<Json<FipResource>, StatusCode> {
    let inner = state.inner.lock().unwrap();
    inner
        .fips
        .get(&ip)
        .map(|name| {
            Json(FipResource {
                ip: ip.clone(),
                name: name.clone(),
            })
        })
        .ok_or(StatusCode::NOT_FOUND)
}

async fn handle_name(
    State(state): State<Arc<PlaneState>>,
    UrlPath(ip): UrlPath<String>,
    Json(req): Json<NameRequest>,
) -> StatusCode {
    let mut inner = state.inner.lock().unwrap();
    match inner.fips.get_mut(&ip) {
        Some(name) => {
            *name = req.name;
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn handle_release(
    State(state): State<Arc<PlaneState>>,
    UrlPath(ip): UrlPath<String>,
) -> StatusCode {
    let mut inner = state.inner.lock().unwrap();
    if inner.fips.remove(&ip).is_some() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn allocate_creates_count_addresses() {
        let app = router(Arc::new(PlaneState::new()));
        let req = Request::post("/fips?count=3").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let fips: Vec<FipResource> = body_json(resp).await;
        assert_eq!(fips.len(), 3);
        assert!(fips.iter().all(|f| !f.ip.is_empty()));
    }

    #[tokio::test]
    async fn list_reports_seeded_addresses() {
        let state = Arc::new(PlaneState::seeded(&[("1.1.1.1", "a"), ("2.2.2.2", "")]));
        let app = router(state);
        let req = Request::get("/fips").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let fips: Vec<FipResource> = body_json(resp).await;
        assert_eq!(fips.len(), 2);
        assert_eq!(fips[0].ip, "1.1.1.1");
        assert_eq!(fips[0].name, "a");
    }

    #[tokio::test]
    async fn get_unknown_address_is_not_found() {
        let app = router(Arc::new(PlaneState::new()));
        let req = Request::get("/fips/9.9.9.9").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn name_then_get_reflects_the_label() {
        let state = Arc::new(PlaneState::seeded(&[("1.1.1.1", "")]));
        let app = router(state);

        let req = Request::post("/fips/1.1.1.1")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"edge-lb"}"#))
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = Request::get("/fips/1.1.1.1").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let fip: FipResource = body_json(resp).await;
        assert_eq!(fip.name, "edge-lb");
    }

    #[tokio::test]
    async fn release_removes_the_address() {
        crate::tracing_setup::init_test_tracing();
        let state = Arc::new(PlaneState::seeded(&[("1.1.1.1", "")]));
        let app = router(state.clone());

        let req = Request::delete("/fips/1.1.1.1").body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.held(), 0);

        let req = Request::delete("/fips/1.1.1.1").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
