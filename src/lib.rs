//! # Injectra
//!
//! A runtime dependency injection container for Rust services.
//!
//! Injectra builds fully wired object graphs on demand from constructor
//! descriptions, manages their lifetime, and refuses graphs that are unsafe:
//!
//! - **Scopes**: `Singleton` (one per container) and `Transient` (fresh per resolution)
//! - **Scope safety**: a singleton may never capture a transient
//! - **Cycle detection**: `A -> B -> A` is reported with its full path
//! - **Plain objects**: unregistered injectable types are built on demand as transients
//! - **Context values**: per-call values (e.g. request headers) bypass the registry
//! - **Axum integration**: `Inject<T>` resolves services inside handlers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use injectra::prelude::*;
//!
//! #[derive(Injectable)]
//! #[injectable(scope = "singleton")]
//! pub struct Config {
//!     #[inject(default = String::from("sqlite::memory:"))]
//!     dsn: String,
//! }
//!
//! #[derive(Injectable)]
//! #[injectable(scope = "singleton")]
//! pub struct Repo {
//!     config: Arc<Config>,
//! }
//!
//! #[derive(Injectable)]
//! pub struct Service {
//!     repo: Arc<Repo>,
//! }
//!
//! #[module(providers = [Config, Repo, Service])]
//! pub struct AppModule;
//!
//! let container = AppModule::create_container()?;
//! let first = container.resolve::<Service>()?;
//! let second = container.resolve::<Service>()?;
//! assert!(!Arc::ptr_eq(&first, &second));
//! assert!(Arc::ptr_eq(&first.repo, &second.repo));
//! ```

pub mod config;
pub mod di;
pub mod error;
pub mod module;

// Re-export core types
pub use config::ContainerConfig;
pub use di::{
    Arguments, ByName, ByNameOrType, ByType, ClassMetadata, Container, ContainerBuilder, Context,
    ContextMatcher, ContextMatching, DeclaredType, Dependency, Factory, HasContainer, Inject,
    Injectable, Instance, Scope, TypeRef,
};
pub use error::{InjectError, Result};
pub use module::Module;

// Re-export macros
pub use injectra_macro::{Injectable as DeriveInjectable, module};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use injectra::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::ContainerConfig;
    pub use crate::di::{
        Arguments, Container, ContainerBuilder, Context, ContextMatcher, Dependency, Factory,
        HasContainer, Inject, Injectable, Scope,
    };
    pub use crate::error::{InjectError, Result};
    pub use crate::module::Module;
    pub use crate::{DeriveInjectable as Injectable, module};
    pub use std::sync::Arc;
}
