//! 组件清单
//!
//! 清单由启动流程独占，按类别收集配置、控制器和服务类型。
//! 清单移交给 [`crate::ApplicationBuilder`] 之后不再接受新的注册。

use crate::controller::Controller;
use config_impl::ConfigLoader;
use di_abstractions::{Category, ComponentDescriptor, Injectable, Instance, Registrant, TypeRegistry};
use infrastructure_common::{Configuration, Lifetime, RegistryError, Service};
use std::any::Any;
use std::sync::Arc;

/// 配置类别
#[derive(Debug)]
pub struct ConfigurationCategory;

impl Category for ConfigurationCategory {
    const NAME: &'static str = "Configuration";
    type Capability = dyn Any + Send + Sync;
}

impl ConfigurationCategory {
    /// 配置工厂依赖的参数名
    pub const LOADER: &'static str = "loader";

    /// 配置类型的成员：实例由 [`ConfigLoader`] 绑定
    pub fn registrant<T: Configuration>() -> Registrant<Self> {
        Registrant::new::<T>(configuration_descriptor::<T>, Some)
    }
}

fn configuration_descriptor<T: Configuration>(lifetime: Lifetime) -> ComponentDescriptor {
    ComponentDescriptor::builder::<T>()
        .depends_on::<ConfigLoader>(ConfigurationCategory::LOADER)
        .lifetime(lifetime)
        .factory(|deps| {
            let loader = deps.take::<ConfigLoader>(ConfigurationCategory::LOADER)?;
            Ok(loader.bind::<T>()?)
        })
}

/// 控制器类别
#[derive(Debug)]
pub struct ControllerCategory;

impl Category for ControllerCategory {
    const NAME: &'static str = "Controller";
    type Capability = dyn Controller;
}

impl ControllerCategory {
    pub fn registrant<T: Injectable + Controller>() -> Registrant<Self> {
        Registrant::new::<T>(ComponentDescriptor::injectable::<T>, |instance: Instance| {
            instance
                .downcast::<T>()
                .ok()
                .map(|controller| controller as Arc<dyn Controller>)
        })
    }
}

/// 服务类别
#[derive(Debug)]
pub struct ServiceCategory;

impl Category for ServiceCategory {
    const NAME: &'static str = "Service";
    type Capability = dyn Service;
}

impl ServiceCategory {
    pub fn registrant<T: Injectable + Service>() -> Registrant<Self> {
        Registrant::new::<T>(ComponentDescriptor::injectable::<T>, |instance: Instance| {
            instance
                .downcast::<T>()
                .ok()
                .map(|service| service as Arc<dyn Service>)
        })
    }
}

/// 组件清单
#[derive(Debug, Default)]
pub struct ComponentManifest {
    configurations: TypeRegistry<ConfigurationCategory>,
    controllers: TypeRegistry<ControllerCategory>,
    services: TypeRegistry<ServiceCategory>,
}

impl ComponentManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册配置类型
    pub fn configuration<T: Configuration>(mut self) -> Result<Self, RegistryError> {
        self.configurations
            .register(ConfigurationCategory::registrant::<T>())?;
        Ok(self)
    }

    /// 注册控制器类型
    pub fn controller<T: Injectable + Controller>(mut self) -> Result<Self, RegistryError> {
        self.controllers
            .register(ControllerCategory::registrant::<T>())?;
        Ok(self)
    }

    /// 注册服务类型
    pub fn service<T: Injectable + Service>(mut self) -> Result<Self, RegistryError> {
        self.services.register(ServiceCategory::registrant::<T>())?;
        Ok(self)
    }

    pub fn configurations(&self) -> &TypeRegistry<ConfigurationCategory> {
        &self.configurations
    }

    pub fn configurations_mut(&mut self) -> &mut TypeRegistry<ConfigurationCategory> {
        &mut self.configurations
    }

    pub fn controllers(&self) -> &TypeRegistry<ControllerCategory> {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut TypeRegistry<ControllerCategory> {
        &mut self.controllers
    }

    pub fn services(&self) -> &TypeRegistry<ServiceCategory> {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut TypeRegistry<ServiceCategory> {
        &mut self.services
    }

    /// 三个类别的成员总数
    pub fn len(&self) -> usize {
        self.configurations.len() + self.controllers.len() + self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::RouteTable;
    use async_trait::async_trait;
    use di_abstractions::{Candidate, DependencySpec, ResolvedDependencies};
    use infrastructure_common::{BoxError, InvalidReason, TypeInfo};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Settings {}

    impl Configuration for Settings {}

    struct Worker;

    impl Injectable for Worker {
        fn dependencies() -> Vec<DependencySpec> {
            Vec::new()
        }

        fn inject(_: &mut ResolvedDependencies) -> Result<Self, BoxError> {
            Ok(Self)
        }
    }

    #[async_trait]
    impl Service for Worker {}

    impl Controller for Worker {
        fn router(self: Arc<Self>) -> RouteTable {
            RouteTable::new("/worker")
        }
    }

    #[test]
    fn test_manifest_collects_by_category() {
        let manifest = ComponentManifest::new()
            .configuration::<Settings>()
            .unwrap()
            .service::<Worker>()
            .unwrap()
            .controller::<Worker>()
            .unwrap();

        assert_eq!(manifest.len(), 3);
        assert!(manifest.services().contains(&TypeInfo::of::<Worker>()));
        assert!(manifest.controllers().contains(&TypeInfo::of::<Worker>()));
        assert_eq!(manifest.configurations().category(), "Configuration");
    }

    #[test]
    fn test_duplicate_service_is_rejected() {
        let result = ComponentManifest::new()
            .service::<Worker>()
            .unwrap()
            .service::<Worker>();

        assert!(matches!(
            result,
            Err(RegistryError::AlreadyRegistered { ref category, .. }) if category == "Service"
        ));
    }

    #[test]
    fn test_controller_candidate_lacks_service_capability() {
        let mut manifest = ComponentManifest::new();
        let candidate = ControllerCategory::registrant::<Worker>().into_candidate();

        let err = manifest.services_mut().register_candidate(candidate).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidRegistrant {
                reason: InvalidReason::MissingCapability,
                ..
            }
        ));

        let passed = manifest
            .services_mut()
            .register_candidate(Candidate::Function("helper"))
            .unwrap();
        assert!(matches!(passed, Candidate::Function("helper")));
        assert!(manifest.is_empty());
    }
}
