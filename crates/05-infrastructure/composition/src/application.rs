//! 应用主入口

use crate::builder::ApplicationBuilder;
use crate::controller::RouteTable;
use crate::logging::LoggingHandle;
use crate::options::ApplicationOptions;
use di_impl::DependencyContainer;
use infrastructure_common::{
    DependencyError, InfrastructureError, LifecycleError, LifecyclePhase, Service,
    TypeInfo,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// 已解析的服务
#[derive(Clone)]
pub struct ServiceEntry {
    type_info: TypeInfo,
    service: Arc<dyn Service>,
}

impl ServiceEntry {
    pub fn new(type_info: TypeInfo, service: Arc<dyn Service>) -> Self {
        Self { type_info, service }
    }

    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    pub fn service(&self) -> &Arc<dyn Service> {
        &self.service
    }

    async fn run(&self, phase: LifecyclePhase) -> Result<(), LifecycleError> {
        info!("服务 {} 执行 {}", self.type_info, phase);
        let result = match phase {
            LifecyclePhase::Init => self.service.init().await,
            LifecyclePhase::Start => self.service.start().await,
            LifecyclePhase::Stop => self.service.stop().await,
        };

        result.map_err(|source| {
            error!("服务 {} 在 {} 阶段失败: {}", self.type_info, phase, source);
            LifecycleError::HookFailed {
                service: self.type_info.short_name().to_string(),
                phase,
                source,
            }
        })
    }
}

impl std::fmt::Debug for ServiceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceEntry")
            .field("type_info", &self.type_info)
            .finish()
    }
}

/// 应用
///
/// 服务按依赖顺序启动，按相反顺序停止。
pub struct Application {
    options: Arc<ApplicationOptions>,
    container: Arc<DependencyContainer>,
    services: Vec<ServiceEntry>,
    routes: Vec<RouteTable>,
    logging: Option<LoggingHandle>,
    /// 运行状态
    status: RwLock<ApplicationStatus>,
    /// 统计信息
    metrics: RwLock<ApplicationMetrics>,
}

impl Application {
    /// 创建应用构建器
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    /// 内部构造函数
    pub(crate) fn new(
        options: Arc<ApplicationOptions>,
        container: Arc<DependencyContainer>,
        services: Vec<ServiceEntry>,
        routes: Vec<RouteTable>,
        logging: Option<LoggingHandle>,
    ) -> Self {
        let metrics = ApplicationMetrics {
            registered_components_count: container.stats().registered_components,
            services_count: services.len(),
            routes_count: routes.iter().map(|table| table.routes().len()).sum(),
            ..ApplicationMetrics::default()
        };

        Self {
            options,
            container,
            services,
            routes,
            logging,
            status: RwLock::new(ApplicationStatus::Initialized),
            metrics: RwLock::new(metrics),
        }
    }

    /// 启动应用：依次执行所有服务的 init，再依次执行 start
    pub async fn start(&self) -> Result<(), InfrastructureError> {
        {
            let mut status = self.status.write().await;
            if !matches!(*status, ApplicationStatus::Initialized | ApplicationStatus::Stopped) {
                return Err(LifecycleError::LifecycleManagementFailed {
                    message: format!("当前状态 {:?} 不能启动", *status),
                }
                .into());
            }
            *status = ApplicationStatus::Starting;
        }

        info!("启动应用: {} {}", self.options.app_name, self.options.version);

        for phase in [LifecyclePhase::Init, LifecyclePhase::Start] {
            for entry in &self.services {
                if let Err(e) = entry.run(phase).await {
                    *self.status.write().await = ApplicationStatus::Failed;
                    return Err(e.into());
                }
            }
        }

        *self.status.write().await = ApplicationStatus::Running;
        {
            let mut metrics = self.metrics.write().await;
            metrics.start_time = Some(chrono::Utc::now());
            metrics.stop_time = None;
        }

        info!("应用启动完成，共 {} 个服务", self.services.len());
        Ok(())
    }

    /// 停止应用：按启动的相反顺序执行 stop
    ///
    /// 单个服务失败不会中断其余服务的停止，返回第一个错误。
    pub async fn stop(&self) -> Result<(), InfrastructureError> {
        {
            let mut status = self.status.write().await;
            if !matches!(*status, ApplicationStatus::Running | ApplicationStatus::Failed) {
                warn!("当前状态 {:?} 无需停止", *status);
                return Ok(());
            }
            *status = ApplicationStatus::Stopping;
        }

        info!("停止应用");
        let mut first_error = None;
        for entry in self.services.iter().rev() {
            if let Err(e) = entry.run(LifecyclePhase::Stop).await {
                first_error.get_or_insert(e);
            }
        }

        self.metrics.write().await.stop_time = Some(chrono::Utc::now());
        match first_error {
            Some(e) => {
                *self.status.write().await = ApplicationStatus::Failed;
                Err(e.into())
            }
            None => {
                *self.status.write().await = ApplicationStatus::Stopped;
                info!("应用停止完成");
                Ok(())
            }
        }
    }

    /// 启动应用并等待 Ctrl-C，然后停止
    pub async fn run_until_shutdown(&self) -> Result<(), InfrastructureError> {
        self.start().await?;
        info!("应用运行中，按 Ctrl-C 退出");

        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("等待退出信号失败: {}", e);
        }

        self.stop().await
    }

    /// 解析组件
    pub fn resolve<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        self.container.resolve::<T>()
    }

    pub fn options(&self) -> &ApplicationOptions {
        &self.options
    }

    /// 获取依赖注入容器引用
    pub fn container(&self) -> &Arc<DependencyContainer> {
        &self.container
    }

    /// 按启动顺序排列的服务
    pub fn services(&self) -> &[ServiceEntry] {
        &self.services
    }

    pub fn routes(&self) -> &[RouteTable] {
        &self.routes
    }

    /// 日志句柄，未初始化日志时为 `None`
    pub fn logging(&self) -> Option<&LoggingHandle> {
        self.logging.as_ref()
    }

    /// 获取运行状态
    pub async fn status(&self) -> ApplicationStatus {
        *self.status.read().await
    }

    /// 获取统计信息
    pub async fn metrics(&self) -> ApplicationMetrics {
        self.metrics.read().await.clone()
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("options", &self.options)
            .field("services", &self.services)
            .field("routes", &self.routes)
            .finish()
    }
}

/// 应用运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// 已初始化
    Initialized,
    /// 启动中
    Starting,
    /// 运行中
    Running,
    /// 停止中
    Stopping,
    /// 已停止
    Stopped,
    /// 失败
    Failed,
}

/// 应用统计信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationMetrics {
    /// 启动时间
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    /// 停止时间
    pub stop_time: Option<chrono::DateTime<chrono::Utc>>,
    /// 已注册的组件数量
    pub registered_components_count: usize,
    /// 服务数量
    pub services_count: usize,
    /// 路由数量
    pub routes_count: usize,
}

impl ApplicationMetrics {
    /// 计算运行时间
    pub fn uptime(&self) -> Option<chrono::Duration> {
        match (self.start_time, self.stop_time) {
            (Some(start), Some(stop)) => Some(stop - start),
            (Some(start), None) => Some(chrono::Utc::now() - start),
            _ => None,
        }
    }
}
