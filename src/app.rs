use axum::{routing::get, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::AppConfig;
use crate::routes::{page_routes, submit_routes};

/// Build the complete Axum application:
/// - GET  /          index page
/// - GET  /messages  message form page
/// - GET  <other>    static file under base_dir, 404 error page otherwise
/// - POST <any path> relay body as a datagram, 302 to /messages
///
/// `cfg` is the only state; handlers read paths and the datagram
/// target from it.
pub fn build_app(cfg: AppConfig) -> Router {
    Router::new()
        .route(
            "/",
            get(page_routes::index).post(submit_routes::submit),
        )
        .route(
            "/messages",
            get(page_routes::messages).post(submit_routes::submit),
        )
        // Everything else: static lookup on GET, relay on POST.
        .fallback_service(
            get(page_routes::static_asset)
                .post(submit_routes::submit)
                .with_state(cfg.clone()),
        )
        // Logging middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    fn test_app() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::write(dir.path().join("message.html"), "<h1>leave a message</h1>").unwrap();
        std::fs::write(dir.path().join("error.html"), "<h1>not found</h1>").unwrap();
        std::fs::write(dir.path().join("style.css"), "body { margin: 0 }").unwrap();

        let cfg = AppConfig {
            base_dir: dir.path().to_str().unwrap().to_string(),
            ..AppConfig::default()
        };
        (dir, build_app(cfg))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn index_is_served_as_html() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(body_text(response).await, "<h1>home</h1>");
    }

    #[tokio::test]
    async fn messages_page_is_served_as_html() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/messages").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
    }

    #[tokio::test]
    async fn static_file_is_served_with_inferred_type() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/style.css").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        assert_eq!(body_text(response).await, "body { margin: 0 }");
    }

    #[tokio::test]
    async fn missing_path_gets_error_page() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/no-such-file").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(body_text(response).await, "<h1>not found</h1>");
    }

    #[tokio::test]
    async fn traversal_path_gets_error_page() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/../outside.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_redirects_to_messages() {
        let (_dir, app) = test_app();
        let payload = "name=Alice&msg=Hi+there";

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/message")
                    .header(header::CONTENT_LENGTH, payload.len().to_string())
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/messages");
    }

    #[tokio::test]
    async fn post_to_any_path_is_accepted() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_LENGTH, "3")
                    .body(Body::from("a=b"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn post_without_content_length_fails() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/message")
                    .body(Body::from("a=b"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::LENGTH_REQUIRED);
    }

    #[tokio::test]
    async fn unhandled_method_gets_default_answer() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
