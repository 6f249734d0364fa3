//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件描述符、依赖声明和类别注册表。
//!
//! ## 核心接口
//!
//! - [`ComponentDescriptor`] - 接口 → 工厂 + 生命周期 + 依赖列表
//! - [`Injectable`] - 声明自身依赖并可由容器构造的组件
//! - [`ResolvedDependencies`] - 按参数名绑定的已解析依赖
//! - [`TypeRegistry`] - 按类别收集被标记类型的注册表

pub mod container;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use container::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
