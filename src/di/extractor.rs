use crate::di::{Container, Context, Injectable};
use axum::{
    extract::FromRequestParts,
    http::{StatusCode as HttpStatusCode, request::Parts},
};
use std::sync::Arc;

/// Context key for the request method (`axum::http::Method`).
pub const METHOD_KEY: &str = "method";
/// Context key for the request URI (`axum::http::Uri`).
pub const URI_KEY: &str = "uri";
/// Context key for the request headers (`axum::http::HeaderMap`).
pub const HEADERS_KEY: &str = "headers";

/// Axum extractor for dependency injection
///
/// This extractor allows you to inject services directly into handler function parameters,
/// similar to FastAPI's `Depends()`. The request's method, URI and headers are passed to
/// the resolution as context values, together with any [`Context`] a middleware stored in
/// the request extensions.
///
/// # Example
/// ```ignore
/// use injectra::Inject;
/// use axum::{Json, extract::Path};
///
/// async fn get_user(
///     Inject(service): Inject<UserService>,
///     Path(id): Path<String>,
/// ) -> Result<Json<User>, ApiError> {
///     let user = service.find_one(id).await?;
///     Ok(Json(user))
/// }
/// ```
pub struct Inject<T>(pub Arc<T>);

/// Trait that AppState must implement to provide the DI container
pub trait HasContainer {
    fn get_container(&self) -> &Container;
}

/// Build the resolution context for one request.
pub fn request_context(parts: &Parts) -> Context {
    let mut context = Context::new()
        .with(METHOD_KEY, parts.method.clone())
        .with(URI_KEY, parts.uri.clone())
        .with(HEADERS_KEY, parts.headers.clone());

    if let Some(extra) = parts.extensions.get::<Context>() {
        context.merge(extra);
    }
    context
}

impl<S, T> FromRequestParts<S> for Inject<T>
where
    S: Send + Sync + HasContainer,
    T: Injectable,
{
    type Rejection = (HttpStatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let container = state.get_container();
        let context = request_context(parts);

        container.resolve_with::<T>(&context).map(Inject).map_err(|e| {
            (
                HttpStatusCode::INTERNAL_SERVER_ERROR,
                format!("Dependency injection failed: {}", e),
            )
        })
    }
}

/// Deref implementation for convenient access to the inner service
impl<T> std::ops::Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Clone implementation to allow sharing the Arc
impl<T> Clone for Inject<T> {
    fn clone(&self) -> Self {
        Inject(Arc::clone(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, Method, Request, Uri};

    #[test]
    fn test_request_context_carries_request_data() {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri("/hash?algorithm=md5")
            .header("x-request-id", "abc")
            .body(())
            .unwrap();
        request
            .extensions_mut()
            .insert(Context::new().with("tenant", String::from("acme")));
        let (parts, _) = request.into_parts();

        let context = request_context(&parts);
        assert_eq!(*context.get::<Method>(METHOD_KEY).unwrap(), Method::POST);
        assert_eq!(context.get::<Uri>(URI_KEY).unwrap().path(), "/hash");
        assert_eq!(
            context.get::<HeaderMap>(HEADERS_KEY).unwrap()["x-request-id"],
            "abc"
        );
        assert_eq!(*context.get::<String>("tenant").unwrap(), "acme");
    }
}
