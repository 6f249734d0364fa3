//! # Infrastructure Common
//!
//! 这个 crate 提供了组件容器各层共享的基础类型。
//!
//! ## 核心组件
//!
//! - [`TypeInfo`] - 组件接口标识
//! - [`Lifetime`] - 组件生命周期（单例 / 瞬时）
//! - [`Service`] - 带 init / start / stop 钩子的长生命周期服务
//! - [`Configuration`] - 可从键值配置源加载的配置类型
//! - [`ApiError`] - 面向调用方的错误模型
//!
//! ## 设计原则
//!
//! - 依赖关系显式声明，不依赖运行时反射
//! - 注册阶段与解析阶段严格分离
//! - 所有错误同步返回，由启动流程统一处理

pub mod api_error;
pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use api_error::*;
pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
