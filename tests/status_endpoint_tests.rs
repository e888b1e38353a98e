// tests/status_endpoint_tests.rs
use health_registry::server::{serve_listener, StatusHandler};
use health_registry::{register_func, CheckResult, Registry, Status, StatusUpdater, Updater};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Body, Client, Method, Request, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn request(method: Method, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn all_healthy_returns_200() {
    let registry = Arc::new(Registry::new());
    registry.register_func("a", CheckResult::default);
    registry.register_func("b", CheckResult::default);

    let response = StatusHandler::new(registry)
        .oneshot(request(Method::GET, "/debug/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    assert_eq!(
        body_string(response).await,
        r#"{"a":{"healthy":true,"message":""},"b":{"healthy":true,"message":""}}"#
    );
}

#[tokio::test]
async fn any_unhealthy_returns_503() {
    let registry = Arc::new(Registry::new());
    registry.register_func("a", CheckResult::default);
    registry.register_func("b", || CheckResult::unhealthy("disk full"));

    let response = StatusHandler::new(registry)
        .oneshot(request(Method::GET, "/debug/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_string(response).await;
    assert!(body.contains(r#""b":{"healthy":false,"message":"disk full"}"#));
}

#[tokio::test]
async fn default_registry_handler_serves_ambient_registrations() {
    register_func("status-endpoint-default-cache", || {
        CheckResult::unhealthy("cache unreachable")
    });

    let response = StatusHandler::with_default_registry()
        .oneshot(request(Method::GET, "/debug/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let status: Status = serde_json::from_str(&body_string(response).await).unwrap();
    let cache = status.get("status-endpoint-default-cache").unwrap();
    assert!(!cache.healthy);
    assert_eq!(cache.message, "cache unreachable");
}

#[tokio::test]
async fn empty_registry_is_healthy() {
    let response = StatusHandler::new(Arc::new(Registry::new()))
        .oneshot(request(Method::GET, "/debug/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "{}");
}

#[tokio::test]
async fn non_get_methods_return_404() {
    let registry = Arc::new(Registry::new());
    registry.register_func("a", || CheckResult::unhealthy("down"));
    let handler = StatusHandler::new(registry);

    for method in [Method::POST, Method::PUT, Method::DELETE, Method::HEAD] {
        let response = handler
            .clone()
            .oneshot(request(method.clone(), "/debug/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", method);
        assert!(body_string(response).await.is_empty());
    }
}

#[tokio::test]
async fn other_paths_return_404() {
    let handler = StatusHandler::new(Arc::new(Registry::new())).with_path("/healthz");

    let response = handler
        .clone()
        .oneshot(request(Method::GET, "/debug/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = handler
        .oneshot(request(Method::GET, "/healthz"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn updater_state_drives_response_code() {
    let registry = Arc::new(Registry::new());
    let updater = StatusUpdater::new();
    registry.register("replication", updater.clone());
    let handler = StatusHandler::new(registry);

    let response = handler
        .clone()
        .oneshot(request(Method::GET, "/debug/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    updater.update(CheckResult::unhealthy("lagging"));
    let response = handler
        .oneshot(request(Method::GET, "/debug/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let status: Status = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(status.get("replication").unwrap().message, "lagging");
}

#[tokio::test]
async fn check_timeout_reports_slow_checks() {
    let registry = Arc::new(Registry::new());
    registry.register_func("slow", || {
        std::thread::sleep(Duration::from_millis(500));
        CheckResult::default()
    });

    let response = StatusHandler::new(registry)
        .with_check_timeout(Duration::from_millis(20))
        .oneshot(request(Method::GET, "/debug/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_string(response)
        .await
        .contains("check timed out after 20ms"));
}

#[tokio::test]
async fn periodic_checks_start_healthy_over_http() {
    let registry = Arc::new(Registry::new());
    registry.register_periodic_func("warmup", Duration::from_secs(3600), || {
        CheckResult::unhealthy("not yet")
    });

    let response = StatusHandler::new(registry)
        .oneshot(request(Method::GET, "/debug/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_string(response).await,
        r#"{"warmup":{"healthy":true,"message":""}}"#
    );
}

#[tokio::test]
async fn serves_over_tcp_with_content_length() {
    let registry = Arc::new(Registry::new());
    registry.register_func("db", || CheckResult::unhealthy("disk full"));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(serve_listener(
        listener,
        StatusHandler::new(registry),
        async {
            let _ = stop_rx.await;
        },
    ));

    let uri = format!("http://{}/debug/health", addr).parse().unwrap();
    let response = Client::new().get(uri).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let expected = r#"{"db":{"healthy":false,"message":"disk full"}}"#;
    assert_eq!(
        response.headers()[CONTENT_LENGTH],
        expected.len().to_string().as_str()
    );
    assert_eq!(body_string(response).await, expected);

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
