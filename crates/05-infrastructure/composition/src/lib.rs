//! # 基础设施组合层
//!
//! 这个 crate 把配置、依赖注入容器和服务生命周期组合成一个可运行的应用。
//!
//! ## 主要功能
//!
//! - **组件清单**: 按类别（配置、控制器、服务）收集组件类型
//! - **应用构建器**: 组装配置源、清单和日志
//! - **启动器**: 注册组件、检查依赖图、按依赖顺序解析服务
//! - **生命周期管理**: 按依赖顺序启动服务，按相反顺序停止
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::{Application, ComponentManifest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manifest = ComponentManifest::new();
//!
//!     let application = Application::builder()
//!         .add_config_env_vars()?
//!         .with_manifest(manifest)
//!         .enable_logging(true)
//!         .build()?;
//!
//!     application.run_until_shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod bootstrapper;
pub mod builder;
pub mod controller;
pub mod logging;
pub mod manifest;
pub mod options;

// 重新导出主要类型
pub use application::{Application, ApplicationMetrics, ApplicationStatus, ServiceEntry};
pub use bootstrapper::{Bootstrapped, Bootstrapper};
pub use builder::ApplicationBuilder;
pub use controller::{Controller, Handler, HandlerFuture, HttpMethod, Route, RouteTable};
pub use logging::{init_logging, LoggingConfig, LoggingHandle};
pub use manifest::{ComponentManifest, ConfigurationCategory, ControllerCategory, ServiceCategory};
pub use options::{ApplicationOptions, LogFormat};

// 重新导出派生宏
pub use component_macros::Injectable;

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
