//! HTTP server for the Civic Integrity Log.
//!
//! Exposes the chain over a JSON API in the exact wire shape existing
//! explorer consumers read, plus on-demand verification and a server-sent
//! stream of appended blocks.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::CilServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::util::ServiceExt;

    use cil_ledger::ChainReader;

    fn test_state() -> AppState {
        AppState::new(ServerConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn info_endpoint() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/info")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn submitted_report_lands_on_the_chain() {
        let state = test_state();
        let app = build_router(state.clone());

        let body = serde_json::json!({
            "text": r#"{"id":"r1","title":"stolen bicycle"}"#,
            "media_links": ["a.jpg"],
            "user_id": "anonymous",
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/report")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // Bootstrap genesis + the new report.
        assert_eq!(state.chain.len().unwrap(), 2);
        let block = state.chain.get(1).unwrap();
        assert!(block.data.submitter.is_anonymous());
        assert!(block.hash_is_valid().unwrap());
    }

    #[tokio::test]
    async fn submission_publishes_a_fabric_event() {
        let state = test_state();
        let mut rx = state.fabric.subscribe(cil_fabric::EventFilter::default());
        let app = build_router(state.clone());

        let body = serde_json::json!({ "text": "{}" });
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/report")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(event.payload.block_index(), Some(1));
    }

    #[tokio::test]
    async fn chain_listing_respects_min_index() {
        let state = test_state();
        let app = build_router(state.clone());

        // min_index above the tip: empty page, still a 200.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/chain?min_index=5&order=desc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let plain = app
            .oneshot(Request::builder().uri("/chain").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(plain.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_block_is_not_found() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/chain/blocks/99")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn verify_endpoint_reports_data() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/chain/verify")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
