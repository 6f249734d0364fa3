//! 已解析依赖
//!
//! 容器把每个依赖解析为实例后按参数名放入 [`ResolvedDependencies`]，
//! 工厂再按名称和类型取出。

use infrastructure_common::ArgumentError;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// 类型擦除后的组件实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 按参数名绑定的已解析依赖
#[derive(Default)]
pub struct ResolvedDependencies {
    values: HashMap<&'static str, Instance>,
}

impl ResolvedDependencies {
    /// 创建空的依赖集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 绑定一个参数
    pub fn insert(&mut self, name: &'static str, instance: Instance) {
        self.values.insert(name, instance);
    }

    /// 是否包含参数
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 取出参数并转换为具体类型
    pub fn take<T>(&mut self, name: &str) -> Result<Arc<T>, ArgumentError>
    where
        T: Send + Sync + 'static,
    {
        let instance = self.values.remove(name).ok_or_else(|| ArgumentError::Missing {
            name: name.to_string(),
        })?;
        Self::downcast(name, instance)
    }

    /// 读取参数（不移除）
    pub fn get<T>(&self, name: &str) -> Result<Arc<T>, ArgumentError>
    where
        T: Send + Sync + 'static,
    {
        let instance = self.values.get(name).cloned().ok_or_else(|| ArgumentError::Missing {
            name: name.to_string(),
        })?;
        Self::downcast(name, instance)
    }

    fn downcast<T>(name: &str, instance: Instance) -> Result<Arc<T>, ArgumentError>
    where
        T: Send + Sync + 'static,
    {
        instance.downcast::<T>().map_err(|_| ArgumentError::TypeMismatch {
            name: name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
        })
    }
}

impl std::fmt::Debug for ResolvedDependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedDependencies")
            .field("names", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
