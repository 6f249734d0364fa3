//! 容器跨 crate 集成测试：Injectable 组件与并发解析

use di_abstractions::{
    ComponentDescriptor, ComponentResolver, DependencySpec, Injectable, ResolvedDependencies,
};
use component_macros::Injectable;
use di_impl::DependencyContainer;
use infrastructure_common::{ArgumentError, BoxError, DependencyError, Lifetime, TypeInfo};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
struct DatabaseSettings {
    url: String,
}

impl Injectable for DatabaseSettings {
    fn dependencies() -> Vec<DependencySpec> {
        Vec::new()
    }

    fn inject(_: &mut ResolvedDependencies) -> Result<Self, BoxError> {
        Ok(Self {
            url: "memory://".to_string(),
        })
    }

    fn default_lifetime() -> Lifetime {
        Lifetime::Singleton
    }
}

struct Repository {
    settings: Arc<DatabaseSettings>,
}

impl Injectable for Repository {
    fn dependencies() -> Vec<DependencySpec> {
        vec![DependencySpec::of::<DatabaseSettings>("settings")]
    }

    fn inject(deps: &mut ResolvedDependencies) -> Result<Self, BoxError> {
        Ok(Self {
            settings: deps.take("settings")?,
        })
    }
}

struct Reporter {
    primary: Arc<Repository>,
    secondary: Arc<Repository>,
}

impl Injectable for Reporter {
    fn dependencies() -> Vec<DependencySpec> {
        vec![
            DependencySpec::of::<Repository>("primary"),
            DependencySpec::of::<Repository>("secondary"),
        ]
    }

    fn inject(deps: &mut ResolvedDependencies) -> Result<Self, BoxError> {
        Ok(Self {
            primary: deps.take("primary")?,
            secondary: deps.take("secondary")?,
        })
    }
}

#[test]
fn test_injectable_components_wire_by_parameter_name() -> anyhow::Result<()> {
    let mut container = DependencyContainer::new();
    container.register_injectable::<DatabaseSettings>()?;
    container.register_type::<Repository>(Lifetime::Transient)?;
    container.register_type::<Reporter>(Lifetime::Singleton)?;

    let reporter = container.resolve::<Reporter>()?;
    // 同一接口的两个参数各自解析，瞬时组件得到不同实例
    assert!(!Arc::ptr_eq(&reporter.primary, &reporter.secondary));
    assert!(Arc::ptr_eq(
        &reporter.primary.settings,
        &reporter.secondary.settings
    ));
    assert_eq!(reporter.primary.settings.url, "memory://");
    Ok(())
}

#[test]
fn test_factory_argument_mismatch_is_construction_failure() {
    let mut container = DependencyContainer::new();
    container
        .register(ComponentDescriptor::builder::<DatabaseSettings>().factory(|_| {
            Ok(DatabaseSettings {
                url: String::new(),
            })
        }))
        .unwrap();
    container
        .register(
            ComponentDescriptor::builder::<Repository>()
                .depends_on::<DatabaseSettings>("database")
                .factory(|deps| {
                    Ok(Repository {
                        settings: deps.take("settings")?,
                    })
                }),
        )
        .unwrap();

    match container.resolve::<Repository>() {
        Err(DependencyError::ConstructionFailure { type_name, source }) => {
            assert_eq!(type_name, "Repository");
            assert_eq!(
                source.downcast_ref::<ArgumentError>(),
                Some(&ArgumentError::Missing {
                    name: "settings".to_string()
                })
            );
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

struct Expensive;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_resolution_builds_singleton_once() -> anyhow::Result<()> {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = builds.clone();

    let mut container = DependencyContainer::new();
    container.register(ComponentDescriptor::builder::<Expensive>().singleton().factory(
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            Ok(Expensive)
        },
    ))?;
    let container = Arc::new(container);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let container = container.clone();
            tokio::task::spawn_blocking(move || container.resolve::<Expensive>())
        })
        .collect();

    let mut instances = Vec::new();
    for handle in handles {
        instances.push(handle.await??);
    }

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    Ok(())
}

#[tokio::test]
async fn test_container_is_usable_as_shared_resolver() -> anyhow::Result<()> {
    let mut container = DependencyContainer::new();
    container.register_type::<DatabaseSettings>(Lifetime::Singleton)?;
    container.register_type::<Repository>(Lifetime::Singleton)?;

    let resolver: Arc<dyn ComponentResolver> = Arc::new(container);
    let ordered = tokio::task::spawn_blocking(move || {
        resolver.resolve_with_order(&[
            TypeInfo::of::<Repository>(),
            TypeInfo::of::<DatabaseSettings>(),
        ])
    })
    .await??;

    assert!(ordered[0].clone().downcast::<DatabaseSettings>().is_ok());
    assert!(ordered[1].clone().downcast::<Repository>().is_ok());
    Ok(())
}

#[derive(Injectable)]
#[injectable(singleton)]
struct Clock {
    #[inject(default)]
    ticks: AtomicUsize,
}

#[derive(Injectable)]
#[injectable(transient)]
struct Request {
    clock: Arc<Clock>,
}

#[test]
fn test_declared_lifetime_drives_registration() -> anyhow::Result<()> {
    let mut container = DependencyContainer::new();
    container.register_injectable::<Clock>()?;
    container.register_injectable::<Request>()?;

    assert!(container.descriptor(&TypeInfo::of::<Clock>()).unwrap().is_singleton());
    assert!(!container.descriptor(&TypeInfo::of::<Request>()).unwrap().is_singleton());

    let first = container.resolve::<Request>()?;
    let second = container.resolve::<Request>()?;
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.clock, &second.clock));

    first.clock.ticks.fetch_add(1, Ordering::SeqCst);
    assert_eq!(second.clock.ticks.load(Ordering::SeqCst), 1);
    assert_eq!(container.stats().active_singletons, 1);
    Ok(())
}
