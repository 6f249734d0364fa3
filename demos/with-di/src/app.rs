//! 演示组件

use async_trait::async_trait;
use infrastructure_common::{ApiError, BoxError, Configuration, Service, ValidationError};
use infrastructure_composition::{Controller, Injectable, RouteTable};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// 演示配置，`APP_NAME` 环境变量覆盖应用名
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub app_name: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            app_name: "SprintApiDemo".to_string(),
        }
    }
}

impl Configuration for DemoConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.app_name.trim().is_empty() {
            return Err(ValidationError::required_field_missing("app_name"));
        }
        if self.app_name.chars().any(char::is_control) {
            return Err(ValidationError::invalid_field_value(
                "app_name",
                self.app_name.escape_debug().to_string(),
                "不能包含控制字符",
            ));
        }
        Ok(())
    }
}

/// 应用管理服务
#[derive(Injectable)]
pub struct AppManager {
    config: Arc<DemoConfig>,
    #[inject(default)]
    lookups: AtomicU64,
}

impl AppManager {
    pub fn app_name(&self) -> &str {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        &self.config.app_name
    }
}

#[async_trait]
impl Service for AppManager {
    async fn start(&self) -> Result<(), BoxError> {
        info!("AppManager 已启动: {}", self.config.app_name);
        Ok(())
    }

    async fn stop(&self) -> Result<(), BoxError> {
        info!(
            "AppManager 已停止，共查询 {} 次",
            self.lookups.load(Ordering::Relaxed)
        );
        Ok(())
    }
}

/// `/app` 控制器
#[derive(Injectable)]
pub struct AppController {
    manager: Arc<AppManager>,
}

impl Controller for AppController {
    fn router(self: Arc<Self>) -> RouteTable {
        RouteTable::new("/app").get("/name", move |_| {
            let controller = self.clone();
            async move { Ok::<_, ApiError>(json!({ "name": controller.manager.app_name() })) }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_config_validation() {
        assert!(DemoConfig::default().validate().is_ok());

        let blank = DemoConfig {
            app_name: "  ".to_string(),
        };
        assert!(matches!(
            blank.validate(),
            Err(ValidationError::RequiredFieldMissing { .. })
        ));

        let control = DemoConfig {
            app_name: "Sprint\nDemo".to_string(),
        };
        match control.validate() {
            Err(ValidationError::InvalidFieldValue { field_name, value, .. }) => {
                assert_eq!(field_name, "app_name");
                assert_eq!(value, "Sprint\\nDemo");
            }
            other => panic!("期望字段值无效，实际: {other:?}"),
        }
    }
}
