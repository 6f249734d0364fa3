//! 应用构建器

use crate::application::Application;
use crate::bootstrapper::Bootstrapper;
use crate::logging::{init_logging, LoggingConfig};
use crate::manifest::ComponentManifest;
use crate::options::ApplicationOptions;
use config_abstractions::ConfigProvider;
use config_impl::{ConfigLoader, EnvironmentConfigProvider, TomlConfigProvider};
use di_abstractions::{ComponentDescriptor, ContainerConfig};
use di_impl::DependencyContainer;
use infrastructure_common::InfrastructureError;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 应用构建器
///
/// 使用建造者模式组装配置源、组件清单和日志
pub struct ApplicationBuilder {
    /// 配置加载器
    loader: ConfigLoader,
    /// 组件清单
    manifest: ComponentManifest,
    /// 容器配置
    container_config: ContainerConfig,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 显式指定的日志配置，未指定时从应用选项推导
    logging_config: Option<LoggingConfig>,
    /// 预先构造好的实例
    instances: Vec<ComponentDescriptor>,
}

impl ApplicationBuilder {
    /// 创建新的应用构建器
    pub fn new() -> Self {
        Self {
            loader: ConfigLoader::new(),
            manifest: ComponentManifest::new(),
            container_config: ContainerConfig::default(),
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: None,
            instances: Vec::new(),
        }
    }

    /// 设置组件清单
    pub fn with_manifest(mut self, manifest: ComponentManifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// 添加 TOML 配置文件
    pub fn add_config_toml<P: AsRef<Path>>(self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加 TOML 配置文件: {}", path.display());
        self.add_config_provider(TomlConfigProvider::new(path))
    }

    /// 添加环境变量配置源
    pub fn add_config_env_vars(self) -> Result<Self, InfrastructureError> {
        self.add_config_provider(EnvironmentConfigProvider::new())
    }

    /// 添加带前缀的环境变量配置源
    pub fn add_config_env_prefix<S: Into<String>>(self, prefix: S) -> Result<Self, InfrastructureError> {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.add_config_provider(EnvironmentConfigProvider::with_prefix(prefix))
    }

    /// 添加自定义配置提供者
    pub fn add_config_provider<T: ConfigProvider + 'static>(
        mut self,
        provider: T,
    ) -> Result<Self, InfrastructureError> {
        self.loader.add_provider(provider)?;
        Ok(self)
    }

    /// 注册一个已构造的实例，组件可以像依赖其他组件一样依赖它
    pub fn with_instance<T>(mut self, instance: Arc<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.instances.push(ComponentDescriptor::instance(instance));
        self
    }

    /// 设置容器配置
    pub fn with_container_config(mut self, config: ContainerConfig) -> Self {
        self.container_config = config;
        self
    }

    /// 按应用选项中的级别和格式初始化日志
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 构建应用
    pub fn build(self) -> Result<Application, InfrastructureError> {
        let options = Arc::new(self.loader.bind::<ApplicationOptions>()?);

        // 只有在明确配置了日志时才初始化日志
        // 避免在测试环境中重复初始化
        let logging = if self.logging_enabled {
            let config = self
                .logging_config
                .unwrap_or_else(|| LoggingConfig::from_options(&options));
            Some(init_logging(&config)?)
        } else {
            None
        };

        info!("开始构建应用: {}", options.app_name);
        let mut container = DependencyContainer::with_config(self.container_config);
        for descriptor in self.instances {
            container.register(descriptor)?;
        }

        let bootstrapped = Bootstrapper::new(
            self.manifest,
            Arc::new(self.loader),
            options.clone(),
            container,
        )
        .bootstrap()?;

        Ok(Application::new(
            options,
            bootstrapped.container,
            bootstrapped.services,
            bootstrapped.routes,
            logging,
        ))
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
