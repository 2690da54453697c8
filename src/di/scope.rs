use crate::di::descriptor::TypeRef;
use crate::error::{InjectError, Result};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifetime policy of a resolved instance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// One instance per container, built on first resolution.
    Singleton,
    /// A fresh instance for every resolution.
    #[default]
    Transient,
}

impl Scope {
    /// Whether a consumer with this scope may hold a dependency with `dependency` scope.
    ///
    /// Only a singleton capturing a transient is unsafe: the transient would be
    /// pinned for the lifetime of the container.
    pub fn can_consume(self, dependency: Scope) -> bool {
        !matches!((self, dependency), (Scope::Singleton, Scope::Transient))
    }
}

/// Check a single consumer -> dependency edge of the graph.
pub fn validate_edge(
    consumer: TypeRef,
    consumer_scope: Scope,
    dependency: &str,
    dependency_scope: Scope,
) -> Result<()> {
    if consumer_scope.can_consume(dependency_scope) {
        return Ok(());
    }

    Err(InjectError::ScopeViolation {
        consumer: consumer.name().to_string(),
        dependency: dependency.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    struct Consumer;

    #[test]
    fn test_scope_matrix() {
        assert!(Scope::Singleton.can_consume(Scope::Singleton));
        assert!(!Scope::Singleton.can_consume(Scope::Transient));
        assert!(Scope::Transient.can_consume(Scope::Singleton));
        assert!(Scope::Transient.can_consume(Scope::Transient));
    }

    #[test]
    fn test_violation_names_both_endpoints() {
        let err = validate_edge(
            TypeRef::of::<Consumer>(),
            Scope::Singleton,
            "app::Cache",
            Scope::Transient,
        )
        .unwrap_err();

        match err {
            InjectError::ScopeViolation {
                consumer,
                dependency,
            } => {
                assert!(consumer.ends_with("Consumer"));
                assert_eq!(dependency, "app::Cache");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Scope::from_str("SINGLETON").unwrap(), Scope::Singleton);
        assert_eq!(Scope::from_str("transient").unwrap(), Scope::Transient);
        assert_eq!(Scope::Singleton.to_string(), "singleton");
        assert_eq!(Scope::default(), Scope::Transient);
    }
}
