//! # Configuration Implementation
//!
//! 配置的具体实现，提供配置源和类型化绑定。
//!
//! ## 主要组件
//!
//! - [`ConfigLoader`] - 合并配置源并绑定到配置类型
//! - [`TomlConfigProvider`] - TOML 配置提供者
//! - [`EnvironmentConfigProvider`] - 环境变量配置提供者
//! - [`MapConfigProvider`] - 内存配置提供者

pub mod loader;
pub mod providers;

pub use loader::*;
pub use providers::*;
