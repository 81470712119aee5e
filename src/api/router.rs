use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::trace::TraceLayer;

use super::middleware::logging_middleware;
use super::path::{resolve, RouteError};
use super::state::AppState;
use super::teams;
use super::types::ApiError;

/// Create the router with application state.
///
/// Every request lands in a single fallback that resolves the path itself.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    match resolve(&method, uri.path()) {
        Ok(route) => match teams::handle(&state, route, body).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        },
        Err(RouteError::NotFound) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        Err(RouteError::MethodNotAllowed { allowed }) => {
            ApiError::method_not_allowed(allowed).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::{KeyIdentityResolver, TeamStore};
    use crate::infrastructure::openpgp::testutil::{armored_key, armored_key_ring};
    use crate::infrastructure::openpgp::OpenPgpKeyRingParser;
    use crate::infrastructure::team::{InMemoryTeamStore, TeamService};

    fn test_app() -> (Router, InMemoryTeamStore) {
        let store = InMemoryTeamStore::new();
        let resolver = KeyIdentityResolver::new(Arc::new(OpenPgpKeyRingParser::new()));
        let service = TeamService::new(Arc::new(store.clone()), resolver);

        (create_router(AppState::new(Arc::new(service))), store)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let body = match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };

        app.clone()
            .oneshot(Request::builder().method(method).uri(uri).body(body).unwrap())
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Bytes {
        to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn provision(app: &Router, name: &str, key: &str) -> String {
        let response = send(
            app,
            Method::POST,
            "/teams",
            Some(json!({ "teamName": name, "publicKey": key })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        body_json(response).await["teamUuid"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_create_get_and_summary() {
        let (app, _) = test_app();
        let uuid = provision(&app, "Kiffix", &armored_key(1, "a")).await;

        let response = send(&app, Method::GET, &format!("/teams/{}", uuid), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let team = body_json(response).await;
        assert_eq!(team["teamName"], "Kiffix");
        assert_eq!(team["uuid"], uuid.as_str());
        assert!(team["id"].is_string());

        let response = send(&app, Method::GET, &format!("/teams/{}/summary", uuid), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "teamName": "Kiffix" }));

        let response = send(&app, Method::GET, "/teams", None).await;
        let teams = body_json(response).await;
        assert_eq!(teams.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_members() {
        let (app, _) = test_app();
        let key = armored_key(4, "a");
        let uuid = provision(&app, "Kiffix", &key).await;

        let response = send(&app, Method::GET, &format!("/teams/{}/members", uuid), None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!([{ "publicKey": key, "isAdmin": true }])
        );
    }

    #[tokio::test]
    async fn test_join_request() {
        let (app, store) = test_app();
        let uuid = provision(&app, "Kiffix", &armored_key(1, "a")).await;
        let path = format!("/teams/{}/request", uuid);
        let body = json!({ "publicKey": armored_key(2, "b") });

        let response = send(&app, Method::POST, &path, Some(body.clone())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(body_bytes(response).await.is_empty());

        let team_id = store.list_teams().await.unwrap()[0].id();
        assert_eq!(store.join_requests(team_id).len(), 1);

        let response = send(&app, Method::POST, &path, Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(store.join_requests(team_id).len(), 2);
    }

    #[tokio::test]
    async fn test_join_request_unknown_team() {
        let (app, _) = test_app();
        let path = format!("/teams/{}/request", uuid::Uuid::new_v4());

        let response = send(
            &app,
            Method::POST,
            &path,
            Some(json!({ "publicKey": armored_key(2, "b") })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (app, store) = test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/teams")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["message"].is_string());
        assert_eq!(store.team_count(), 0);
    }

    #[tokio::test]
    async fn test_two_identities_rejected() {
        let (app, store) = test_app();

        let response = send(
            &app,
            Method::POST,
            "/teams",
            Some(json!({ "teamName": "Pair", "publicKey": armored_key_ring(&[1, 2]) })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "expected 1 openpgp entity, got 2" })
        );
        assert_eq!(store.team_count(), 0);
        assert_eq!(store.public_key_count(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_is_500() {
        let (app, store) = test_app();
        store.fail_memberships(true);

        let response = send(
            &app,
            Method::POST,
            "/teams",
            Some(json!({ "teamName": "Doomed", "publicKey": armored_key(1, "a") })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.team_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_team_is_404() {
        let (app, _) = test_app();

        let response = send(&app, Method::GET, &format!("/teams/{}", uuid::Uuid::new_v4()), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, "/teams/not-a-uuid/summary", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unmatched_path() {
        let (app, _) = test_app();

        for uri in ["/", "/nope", "/teams/abc/nope"] {
            let response = send(&app, Method::GET, uri, None).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(body_bytes(response).await, "Not Found");
        }
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let (app, _) = test_app();

        let response = send(&app, Method::DELETE, "/teams", None).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, POST");
        assert!(body_json(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let (app, _) = test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/teams")
                    .header("x-request-id", "req-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-1");
    }
}
