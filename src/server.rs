//! HTTP surface (Axum) over the snapshot cache.
//!
//! Handlers only ever read the cache; they never reach the upstream source.

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::FreshError;
use crate::storage::SnapshotCache;

pub fn create_router(cache: SnapshotCache) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/", get(ranking_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(cache)
}

pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}

#[tracing::instrument(skip(cache))]
pub async fn ranking_handler(State(cache): State<SnapshotCache>) -> Response {
    // Startup fills the cache before the listener is bound, so this only
    // shows up when the router is mounted on an empty cache.
    let Some(snapshot) = cache.read() else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Ranking not available yet").into_response();
    };

    match serde_json::to_vec(&snapshot.ranking) {
        Ok(body) => {
            let mut response = (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response();
            if let Ok(value) = HeaderValue::from_str(&http_date(snapshot.timestamp)) {
                response.headers_mut().insert(header::LAST_MODIFIED, value);
            }
            response
        }
        Err(e) => {
            let error = FreshError::from(e);
            error!("{error}");
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
        }
    }
}

fn http_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ranking::{rank, Item, Snapshot};
    use axum::body::Body;
    use axum::http::Request;
    use chrono::TimeZone;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn cache_with(items: &[Item]) -> SnapshotCache {
        let cache = SnapshotCache::new();
        cache.write(Snapshot {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap(),
            generation: 1,
            ranking: rank(items),
        });
        cache
    }

    async fn get(cache: SnapshotCache, uri: &str) -> Response {
        create_router(cache)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[tokio::test]
    async fn health_is_ok_with_empty_cache() {
        let response = get(SnapshotCache::new(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn health_is_ok_with_populated_cache() {
        let response = get(cache_with(&[Item::new("X", 50)]), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ranking_is_served_as_json_in_ranked_order() {
        let cache = cache_with(&[
            Item::new("Movie B", 60),
            Item::new("Movie A", 90),
            Item::new("Movie C", 75),
        ]);

        let response = get(cache, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(
            response.headers()[header::LAST_MODIFIED],
            "Fri, 01 Mar 2024 12:30:05 GMT"
        );
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(
            body,
            serde_json::json!([
                {"name": "Movie A", "score": 90},
                {"name": "Movie C", "score": 75},
                {"name": "Movie B", "score": 60}
            ])
        );
    }

    #[tokio::test]
    async fn empty_ranking_is_an_empty_array() {
        let response = get(cache_with(&[]), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"[]");
    }

    #[tokio::test]
    async fn ranking_before_first_refresh_is_unavailable() {
        let response = get(SnapshotCache::new(), "/").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = get(cache_with(&[]), "/top").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
