//! # 依赖注入具体实现
//!
//! 提供依赖注入容器：描述符注册、递归解析、单例缓存、
//! 循环依赖检测以及按依赖顺序的批量解析。

mod container;
mod graph;

pub use container::DependencyContainer;
