mod extract;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

use crate::api::API;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{categories, sessions};

type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router<T: API + Sync + Send + 'static>(api: Arc<T>) -> Router {
    let api = api as DynAPI;

    Router::new()
        .route("/categories", get(categories::list))
        .route("/sessions", post(sessions::create))
        .route("/sessions/:id", get(sessions::find).delete(sessions::close))
        .route("/sessions/:id/inputs", patch(sessions::update_inputs))
        .route("/sessions/:id/directions", post(sessions::request_directions))
        .route("/sessions/:id/category", patch(sessions::select_category))
        .route("/sessions/:id/view", get(sessions::render))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: Arc<T>, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "server stopped");
            unexpected_error()
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tokio_test::block_on;
    use tower::ServiceExt;

    use super::router;
    use crate::config::MapSettings;
    use crate::engine::Engine;
    use crate::external::mock::{MockPlaces, MockRouting};

    fn app() -> Router {
        let engine = Engine::with_providers(
            Arc::new(MockRouting::new()),
            Arc::new(MockPlaces::new()),
            MapSettings::default(),
        );

        router(Arc::new(engine))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn create_session_test() {
        let app = app();

        let (status, session) = block_on(send(&app, Method::POST, "/sessions", None));

        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["category"], "hospital");
        assert!(session["id"].is_string());
    }

    #[test]
    fn unknown_category_is_json_error_test() {
        let app = app();

        let (status, body) = block_on(async {
            let (_, session) = send(&app, Method::POST, "/sessions", None).await;
            let uri = format!("/sessions/{}/category", session["id"].as_str().unwrap());

            send(&app, Method::PATCH, &uri, Some(r#"{"category":"pharmacy"}"#)).await
        });

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 101);
        assert!(body["error"].is_string());
    }

    #[test]
    fn malformed_session_id_is_json_error_test() {
        let app = app();

        let (status, body) = block_on(send(&app, Method::GET, "/sessions/not-a-uuid", None));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 101);
    }

    #[test]
    fn missing_session_is_not_found_test() {
        let app = app();
        let uri = format!("/sessions/{}/view", uuid::Uuid::new_v4());

        let (status, body) = block_on(send(&app, Method::GET, &uri, None));

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 102);
    }
}
