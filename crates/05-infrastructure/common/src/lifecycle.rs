//! 组件生命周期管理

use crate::errors::BoxError;
use async_trait::async_trait;
use std::fmt;

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// 单例模式 - 容器生命周期内只创建一个实例
    Singleton,
    /// 瞬时模式 - 每次解析都创建新实例
    #[default]
    Transient,
}

impl Lifetime {
    /// 是否为单例
    pub fn is_singleton(self) -> bool {
        matches!(self, Self::Singleton)
    }
}

/// 服务生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// 启动前初始化（例如建立连接、加载缓存）
    Init,
    /// 启动
    Start,
    /// 关闭前停止
    Stop,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::Start => f.write_str("start"),
            Self::Stop => f.write_str("stop"),
        }
    }
}

/// 长生命周期服务 trait
///
/// 服务按依赖拓扑顺序依次执行 `init`，再依次执行 `start`；
/// 关闭时按相反顺序执行 `stop`。所有钩子默认为空操作。
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// 启动前初始化
    async fn init(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// 启动
    async fn start(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// 停止
    async fn stop(&self) -> Result<(), BoxError> {
        Ok(())
    }
}
