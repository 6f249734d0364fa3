//! 配置提供者抽象接口

use infrastructure_common::ConfigError;
use std::collections::HashMap;

/// 从配置源收集到的扁平键值
///
/// 嵌套路径使用 `.` 分隔，例如 `server.port`。
pub type ConfigSnapshot = HashMap<String, String>;

/// 配置提供者 trait
///
/// 定义从不同数据源获取配置的统一接口。多个提供者按优先级升序合并，
/// 优先级高的覆盖优先级低的，优先级相同时后添加的覆盖先添加的。
pub trait ConfigProvider: Send + Sync {
    /// 获取提供者名称，同一加载器内必须唯一
    fn name(&self) -> &str;

    /// 获取提供者优先级
    fn priority(&self) -> i32 {
        0
    }

    /// 收集当前的全部键值
    fn collect(&self) -> Result<ConfigSnapshot, ConfigError>;
}

impl<P: ConfigProvider + ?Sized> ConfigProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn priority(&self) -> i32 {
        (**self).priority()
    }

    fn collect(&self) -> Result<ConfigSnapshot, ConfigError> {
        (**self).collect()
    }
}
