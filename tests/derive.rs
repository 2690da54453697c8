use injectra::prelude::*;
use injectra::{ByType, InjectError};

#[derive(Injectable)]
#[injectable(scope = "singleton")]
struct Config {
    #[inject(default = String::from("sqlite::memory:"))]
    dsn: String,
}

#[derive(Injectable)]
#[injectable(scope = "singleton")]
struct Repo {
    config: Arc<Config>,
}

#[derive(Injectable)]
struct Service {
    repo: Arc<Repo>,
}

#[derive(Injectable)]
struct Cache;

#[derive(Injectable)]
#[injectable(scope = "singleton")]
struct App {
    cache: Arc<Cache>,
}

#[module(providers = [Config, Repo, Service])]
struct AppModule;

#[module(imports = [AppModule], providers = [Cache, App => transient])]
struct RootModule;

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

#[derive(Injectable)]
struct Stamper {
    clock: Arc<dyn Clock>,
    #[inject(name = "prefix", default = String::from("id"))]
    label: String,
    #[inject(value)]
    tenant: Arc<String>,
}

#[derive(Injectable)]
struct RequestScoped {
    request_id: u64,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_layered_scopes_share_singletons() {
    init_tracing();
    let container = AppModule::create_container().unwrap();

    let first = container.resolve::<Service>().unwrap();
    let second = container.resolve::<Service>().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.repo, &second.repo));
    assert!(Arc::ptr_eq(&first.repo.config, &second.repo.config));
    assert_eq!(first.repo.config.dsn, "sqlite::memory:");
}

#[test]
fn test_declared_scope_drives_registration() {
    let container = AppModule::create_container().unwrap();
    assert_eq!(
        container.metadata::<Config>().unwrap().scope(),
        Scope::Singleton
    );
    assert_eq!(
        container.metadata::<Service>().unwrap().scope(),
        Scope::Transient
    );
}

#[test]
fn test_singleton_app_with_transient_cache_is_rejected() {
    let mut container = Container::new();
    container.register_declared::<Cache>().unwrap();
    container.register_declared::<App>().unwrap();

    let err = container.resolve::<App>().err().unwrap();
    assert!(matches!(err, InjectError::ScopeViolation { .. }));
}

#[test]
fn test_module_scope_override_and_imports() {
    let container = RootModule::create_container().unwrap();
    assert!(container.contains::<Repo>());
    assert_eq!(container.metadata::<App>().unwrap().scope(), Scope::Transient);

    let app = container.resolve::<App>().unwrap();
    let other = container.resolve::<App>().unwrap();
    assert!(!Arc::ptr_eq(&app.cache, &other.cache));
}

#[test]
fn test_plain_type_ignores_declared_scope() {
    let container = Container::new();
    let first = container.resolve::<Config>().unwrap();
    let second = container.resolve::<Config>().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(
        container.metadata::<Config>().unwrap().scope(),
        Scope::Transient
    );
}

#[test]
fn test_trait_objects_names_and_values() {
    let container = ContainerBuilder::new()
        .instance::<Arc<dyn Clock>>(Arc::new(FixedClock(42)))
        .instance(Arc::new(String::from("acme")))
        .build()
        .unwrap();

    let stamper = container.resolve::<Stamper>().unwrap();
    assert_eq!(stamper.clock.now(), 42);
    assert_eq!(stamper.label, "id");
    assert_eq!(stamper.tenant.as_str(), "acme");

    let context = Context::new().with("prefix", String::from("req"));
    let stamper = container.resolve_with::<Stamper>(&context).unwrap();
    assert_eq!(stamper.label, "req");
}

#[test]
fn test_context_supplies_request_values() {
    let container = Container::new();
    let err = container.resolve::<RequestScoped>().err().unwrap();
    assert!(matches!(err, InjectError::UnresolvableDependency { .. }));

    let context = Context::new().with("request_id", 7u64);
    assert_eq!(
        container
            .resolve_with::<RequestScoped>(&context)
            .unwrap()
            .request_id,
        7
    );
}

#[test]
fn test_context_by_type_through_builder() {
    let container = ContainerBuilder::new()
        .context_matcher(ByType)
        .build()
        .unwrap();

    let context = Context::new().with("anything", 11u64);
    assert_eq!(
        container
            .resolve_with::<RequestScoped>(&context)
            .unwrap()
            .request_id,
        11
    );
}
