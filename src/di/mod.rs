mod builder;
mod cache;
mod container;
mod context;
mod descriptor;
mod extractor;
mod factory;
mod injectable;
mod metadata;
mod registry;
mod scope;
mod stack;

pub use builder::ContainerBuilder;
pub use container::Container;
pub use context::{ByName, ByNameOrType, ByType, Context, ContextMatcher, ContextMatching};
pub use descriptor::{DeclaredType, Dependency, Deriver, Instance, TypeRef};
pub use extractor::{HEADERS_KEY, HasContainer, Inject, METHOD_KEY, URI_KEY, request_context};
pub use factory::Factory;
pub use injectable::Injectable;
pub use metadata::{Arguments, ClassMetadata};
pub use scope::{Scope, validate_edge};
