//! 应用启动器
//!
//! 负责把清单中的类型注册进容器、检查依赖图、
//! 按依赖顺序取出服务并收集控制器的路由表。

use crate::application::ServiceEntry;
use crate::controller::RouteTable;
use crate::manifest::ComponentManifest;
use crate::options::ApplicationOptions;
use config_impl::ConfigLoader;
use di_abstractions::{Category, Registrant, TypeRegistry};
use di_impl::DependencyContainer;
use infrastructure_common::{InfrastructureError, Lifetime};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 启动结果
#[derive(Debug)]
pub struct Bootstrapped {
    pub container: Arc<DependencyContainer>,
    /// 按依赖顺序排列的服务
    pub services: Vec<ServiceEntry>,
    pub routes: Vec<RouteTable>,
}

/// 应用启动器
#[derive(Debug)]
pub struct Bootstrapper {
    manifest: ComponentManifest,
    loader: Arc<ConfigLoader>,
    options: Arc<ApplicationOptions>,
    container: DependencyContainer,
}

impl Bootstrapper {
    /// 创建启动器，清单的所有权移交给启动器
    pub fn new(
        manifest: ComponentManifest,
        loader: Arc<ConfigLoader>,
        options: Arc<ApplicationOptions>,
        container: DependencyContainer,
    ) -> Self {
        Self {
            manifest,
            loader,
            options,
            container,
        }
    }

    /// 执行启动流程
    pub fn bootstrap(mut self) -> Result<Bootstrapped, InfrastructureError> {
        info!(
            "开始装配组件: 配置 {} 个, 控制器 {} 个, 服务 {} 个",
            self.manifest.configurations().len(),
            self.manifest.controllers().len(),
            self.manifest.services().len()
        );

        // 第一步：注册基础实例和清单中的类型
        self.container.register_instance(self.loader.clone())?;
        self.container.register_instance(self.options.clone())?;
        Self::register_category(&mut self.container, self.manifest.configurations())?;
        Self::register_category(&mut self.container, self.manifest.controllers())?;
        Self::register_category(&mut self.container, self.manifest.services())?;

        // 第二步：依赖图必须无环
        self.container.ensure_acyclic().map_err(|e| {
            error!("依赖图检查失败: {}", e);
            e
        })?;

        // 第三步：按依赖顺序解析服务
        let services = self.resolve_services()?;

        // 第四步：构造控制器并收集路由
        let routes = self.bind_controllers()?;

        info!(
            "组件装配完成: 服务 {} 个, 路由表 {} 个",
            services.len(),
            routes.len()
        );
        Ok(Bootstrapped {
            container: Arc::new(self.container),
            services,
            routes,
        })
    }

    fn register_category<C: Category>(
        container: &mut DependencyContainer,
        registry: &TypeRegistry<C>,
    ) -> Result<(), InfrastructureError> {
        for registrant in registry.iter() {
            debug!("注册{}: {}", C::NAME, registrant.type_info());
            container.register(registrant.descriptor(Lifetime::Singleton))?;
        }
        Ok(())
    }

    fn resolve_services(&self) -> Result<Vec<ServiceEntry>, InfrastructureError> {
        let registry = self.manifest.services();
        let instances = self.container.resolve_with_order(&registry.type_infos())?;

        instances
            .iter()
            .map(|instance| -> Result<ServiceEntry, InfrastructureError> {
                let registrant =
                    registry
                        .find(instance)
                        .ok_or_else(|| InfrastructureError::BootstrapFailed {
                            message: "解析结果中出现未注册的服务实例".to_string(),
                        })?;
                let service = registrant
                    .upcast(instance.clone())
                    .ok_or_else(|| capability_missing(registrant))?;
                Ok(ServiceEntry::new(registrant.type_info(), service))
            })
            .collect()
    }

    fn bind_controllers(&self) -> Result<Vec<RouteTable>, InfrastructureError> {
        let mut tables = Vec::with_capacity(self.manifest.controllers().len());

        for registrant in self.manifest.controllers().iter() {
            let instance = self.container.resolve_instance(registrant.type_info())?;
            let controller = registrant
                .upcast(instance)
                .ok_or_else(|| capability_missing(registrant))?;

            let table = controller.router();
            for route in table.routes() {
                info!(
                    "绑定路由: {} {} -> {}",
                    route.method(),
                    table.full_path(route),
                    registrant.type_info()
                );
            }
            tables.push(table);
        }

        Ok(tables)
    }
}

fn capability_missing<C: Category>(registrant: &Registrant<C>) -> InfrastructureError {
    InfrastructureError::BootstrapFailed {
        message: format!("{} 实例不具备 {} 能力", registrant.type_info(), C::NAME),
    }
}
