use thiserror::Error;

pub type Result<T> = std::result::Result<T, InjectError>;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error(
        "Cannot resolve dependency for parameter '{parameter}' in {type_name}: type hint is missing"
    )]
    MissingTypeHint {
        type_name: String,
        parameter: String,
    },

    #[error("Cannot inject transient-scoped dependency '{dependency}' into singleton-scoped '{consumer}'")]
    ScopeViolation { consumer: String, dependency: String },

    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    #[error(
        "Cannot resolve {type_name} required by {required_by}: not registered, no default and not supplied by context"
    )]
    UnresolvableDependency {
        type_name: String,
        required_by: String,
    },

    #[error("Failed to downcast type: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("{type_name} has no parameter named '{parameter}'")]
    UnknownParameter {
        type_name: String,
        parameter: String,
    },

    #[error("Failed to construct {type_name}: {source}")]
    Construction {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid container configuration: {0}")]
    InvalidConfig(String),
}

impl InjectError {
    /// Wrap a constructor failure for `T`.
    pub fn construction<T: ?Sized>(source: impl Into<anyhow::Error>) -> Self {
        Self::Construction {
            type_name: std::any::type_name::<T>().to_string(),
            source: source.into(),
        }
    }
}

impl axum::response::IntoResponse for InjectError {
    fn into_response(self) -> axum::response::Response {
        // Every resolution failure is a server-side wiring fault.
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("Dependency injection failed: {}", self),
        )
            .into_response()
    }
}
