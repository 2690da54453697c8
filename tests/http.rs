use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    routing::get,
};
use injectra::prelude::*;
use tower::ServiceExt;

#[derive(Clone)]
struct AppState {
    container: Arc<Container>,
}

impl HasContainer for AppState {
    fn get_container(&self) -> &Container {
        &self.container
    }
}

#[derive(Injectable)]
#[injectable(scope = "singleton")]
struct Counter {
    #[inject(default = String::from("hits"))]
    name: String,
}

#[derive(Injectable)]
struct RequestInfo {
    headers: HeaderMap,
    counter: Arc<Counter>,
}

#[derive(Injectable)]
#[injectable(scope = "singleton")]
struct Leaky {
    headers: HeaderMap,
}

async fn whoami(Inject(info): Inject<RequestInfo>) -> String {
    let caller = info
        .headers
        .get("x-caller")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("anonymous")
        .to_string();
    format!("{}:{}", info.counter.name, caller)
}

async fn leaky(Inject(_leaky): Inject<Leaky>) -> &'static str {
    "unreachable"
}

fn app() -> Router {
    let container = ContainerBuilder::new()
        .provide::<Counter>()
        .provide::<Leaky>()
        .build()
        .unwrap();

    Router::new()
        .route("/whoami", get(whoami))
        .route("/leaky", get(leaky))
        .with_state(AppState {
            container: Arc::new(container),
        })
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_request_headers_reach_constructors() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("x-caller", "alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "hits:alice");
}

#[tokio::test]
async fn test_request_values_cannot_leak_into_singletons() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/leaky")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("singleton-scoped"));
}
