//! 依赖注入容器抽象接口
//!
//! 注册与解析分为两个 trait：注册需要独占访问，解析只需共享访问，
//! 因此容器构建完成后可以在多个线程之间共享。

use crate::factory::ComponentDescriptor;
use crate::resolver::Instance;
use infrastructure_common::{DependencyError, TypeInfo};
use std::any::TypeId;

/// 组件注册表 trait
pub trait ComponentRegistry {
    /// 注册组件描述符，同一接口只能注册一次
    fn register(&mut self, descriptor: ComponentDescriptor) -> Result<(), DependencyError>;

    /// 检查组件是否已注册（通过 TypeId）
    fn is_registered_by_type_id(&self, type_id: TypeId) -> bool;

    /// 按注册顺序获取所有已注册的组件描述符
    fn registered_components(&self) -> Vec<&ComponentDescriptor>;
}

/// 组件解析器 trait
pub trait ComponentResolver: Send + Sync {
    /// 解析接口的实例
    fn resolve_instance(&self, interface: TypeInfo) -> Result<Instance, DependencyError>;

    /// 按依赖顺序解析一组接口，依赖方排在被依赖方之后
    fn resolve_with_order(&self, targets: &[TypeInfo]) -> Result<Vec<Instance>, DependencyError>;

    /// 检查已注册组件之间是否存在循环依赖
    fn check_circular(&self) -> Result<bool, DependencyError>;
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// 嵌套解析的最大深度，超出时报告 `ResolutionDepthExceeded`
    pub max_resolution_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 100,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerStats {
    /// 已注册组件数量
    pub registered_components: usize,
    /// 已创建的单例数量
    pub active_singletons: usize,
}
