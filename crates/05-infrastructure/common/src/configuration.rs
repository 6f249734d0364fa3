//! 配置相关的基础接口定义

use crate::errors::ValidationError;
use serde::de::DeserializeOwned;

/// 配置类型 trait
///
/// 配置类型通过 serde 声明字段、默认值与必需字段，由配置加载器
/// 从键值配置源绑定。键名不区分大小写，`APP_NAME` 对应字段 `app_name`。
pub trait Configuration: DeserializeOwned + Send + Sync + 'static {
    /// 配置节路径；为 `None` 时从配置根绑定
    fn section() -> Option<&'static str> {
        None
    }

    /// 绑定后的额外验证
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
