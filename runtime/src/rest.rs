// Copyright 2026 Stockwatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP read API and ingest endpoint.
//!
//! Every handler goes through the shared [`AppState`]; none of them can
//! mutate the cache except `POST /api/upload`, which applies the same
//! emptiness gate as the ingestion loop.

use crate::state::AppState;
use crate::view;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use stockwatch::{try_normalize, ItemShape, Payload};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Build the axum Router with all endpoints.
pub fn router<T: ItemShape>(state: Arc<AppState<T>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::<T>))
        .route("/api/upload", post(upload::<T>))
        .route("/api/data", get(read_stock::<T>))
        .route("/api/stock", get(read_stock::<T>))
        .route("/api/weather", get(read_weather::<T>))
        .route("/view", get(view_page::<T>))
        .layer(cors)
        .with_state(state)
}

/// Serve the API until the process exits.
pub async fn start<T: ItemShape>(addr: SocketAddr, state: Arc<AppState<T>>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("stock API listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────

async fn health<T: ItemShape>(State(state): State<Arc<AppState<T>>>) -> Json<Value> {
    let gens = state.cache.generations();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
        "loop_enabled": state.loop_enabled,
        "merge_policy": state.cache.policy(),
        "item_shape": T::SHAPE,
        "current_items": gens.current.total_items(),
        "previous_items": gens.previous.total_items(),
        "loop": state.status.snapshot(),
    }))
}

async fn upload<T: ItemShape>(
    State(state): State<Arc<AppState<T>>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(raw) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!("rejected upload: {}", rejection.body_text());
            return bad_request(rejection.body_text());
        }
    };

    let received_items = raw.as_object().map(|m| m.len()).unwrap_or(0);
    let payload: Payload<T> = match try_normalize(&raw) {
        Ok(p) => p,
        Err(e) => {
            warn!("rejected upload: {e}");
            return bad_request(e.to_string());
        }
    };

    let outcome = state.cache.ingest(payload);
    info!(received_items, applied = outcome.applied(), "upload received");
    Json(json!({
        "status": "success",
        "received_items": received_items,
        "applied": outcome.applied(),
    }))
    .into_response()
}

async fn read_stock<T: ItemShape>(State(state): State<Arc<AppState<T>>>) -> Json<Payload<T>> {
    Json(state.cache.read())
}

async fn read_weather<T: ItemShape>(State(state): State<Arc<AppState<T>>>) -> Json<Value> {
    Json(state.weather.read())
}

async fn view_page<T: ItemShape>(State(state): State<Arc<AppState<T>>>) -> Response {
    let (payload, sample) = state.view_payload();
    view_response(view::render_page(&payload, &state.weather.read(), sample))
}

/// A rendered page, or the static error page on a render fault.
fn view_response(rendered: Result<String, view::ViewError>) -> Response {
    match rendered {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            warn!("view render failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(view::ERROR_PAGE)).into_response()
        }
    }
}

fn bad_request(error: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "status": "error", "error": error })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use stockwatch::{Category, MergePolicy, StockCache, StockItem, WeatherState};
    use tower::ServiceExt;

    fn state<T: ItemShape>(policy: MergePolicy) -> Arc<AppState<T>> {
        Arc::new(AppState::new(
            Arc::new(StockCache::new(policy)),
            Arc::new(WeatherState::new()),
        ))
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, String) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_read_on_fresh_cache_is_empty_shape() {
        let app = router(state::<String>(MergePolicy::Merge));
        let (status, body) = call(app, get_req("/api/data")).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_json_eq!(v, json!({"gear": [], "seeds": [], "eggs": []}));
    }

    #[tokio::test]
    async fn test_upload_then_read() {
        let st = state::<String>(MergePolicy::Merge);
        let (status, body) = call(
            router(Arc::clone(&st)),
            post(
                "/api/upload",
                r#"{"seeds": ["Carrot **x21**"], "gears": [], "eggs": []}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_json_eq!(
            v,
            json!({"status": "success", "received_items": 3, "applied": true})
        );

        let (_, body) = call(router(st), get_req("/api/stock")).await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_json_eq!(v, json!({"gear": [], "seeds": ["Carrot **x21**"], "eggs": []}));
    }

    #[tokio::test]
    async fn test_empty_upload_not_applied() {
        let st = state::<StockItem>(MergePolicy::Merge);
        st.cache.ingest(
            Payload::empty().with(Category::Eggs, vec![StockItem::new("Bug Egg", "x1")]),
        );

        let (status, body) = call(
            router(Arc::clone(&st)),
            post("/api/upload", r#"{"gears": [], "seeds": [], "eggs": []}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""applied":false"#));
        assert_eq!(st.cache.read().eggs, vec![StockItem::new("Bug Egg", "x1")]);
    }

    #[tokio::test]
    async fn test_malformed_upload_is_400() {
        let app = router(state::<String>(MergePolicy::Merge));
        let (status, body) = call(app.clone(), post("/api/upload", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["status"], "error");

        let (status, body) = call(app, post("/api/upload", r#"["Carrot"]"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("must be a JSON object"));
    }

    #[tokio::test]
    async fn test_weather_sentinel() {
        let app = router(state::<String>(MergePolicy::Merge));
        let (_, body) = call(app, get_req("/api/weather")).await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_json_eq!(v, json!({"status": "unknown"}));
    }

    #[tokio::test]
    async fn test_placeholder_only_on_view() {
        let sample = Payload::empty().with(Category::Seeds, vec!["Sample Seed **x1**".to_string()]);
        let st = Arc::new(
            AppState::new(
                Arc::new(StockCache::<String>::default()),
                Arc::new(WeatherState::new()),
            )
            .with_placeholder(Some(sample)),
        );

        let (status, html) = call(router(Arc::clone(&st)), get_req("/view")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Sample Seed"));
        assert!(html.contains("sample data"));

        let (_, body) = call(router(st), get_req("/api/data")).await;
        assert!(!body.contains("Sample Seed"));
    }

    #[tokio::test]
    async fn test_view_fault_serves_error_page() {
        let resp = view_response(Err(view::ViewError::Format(std::fmt::Error)));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            resp.headers()["content-type"],
            "text/html; charset=utf-8"
        );
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(html, view::ERROR_PAGE);
    }

    #[tokio::test]
    async fn test_health_reports_generations() {
        let st = state::<String>(MergePolicy::Replace);
        st.cache
            .ingest(Payload::empty().with(Category::Gear, vec!["Trowel **x2**".to_string()]));
        let (status, body) = call(router(st), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["merge_policy"], "replace");
        assert_eq!(v["item_shape"], "encoded");
        assert_eq!(v["current_items"], 1);
        assert_eq!(v["previous_items"], 0);
        assert_eq!(v["loop_enabled"], false);
    }
}
