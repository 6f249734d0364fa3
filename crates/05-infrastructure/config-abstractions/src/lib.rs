//! # Configuration Abstractions
//!
//! 配置抽象层，定义配置源的统一接口。
//!
//! ## 核心接口
//!
//! - [`ConfigProvider`] - 带名称和优先级的扁平键值配置源
//! - [`ConfigSnapshot`] - 某一时刻从配置源收集到的键值

pub mod provider;

pub use provider::*;
