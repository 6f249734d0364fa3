//! 应用选项

use infrastructure_common::{Configuration, ValidationError};
use serde::{Deserialize, Serialize};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// 应用选项
///
/// 从配置节 `application` 绑定，例如环境变量 `APPLICATION__PORT`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationOptions {
    pub app_name: String,
    pub version: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ApplicationOptions {
    fn default() -> Self {
        Self {
            app_name: "sprint-application".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Plain,
        }
    }
}

impl ApplicationOptions {
    /// 监听地址
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Configuration for ApplicationOptions {
    fn section() -> Option<&'static str> {
        Some("application")
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.app_name.trim().is_empty() {
            return Err(ValidationError::required_field_missing("app_name"));
        }
        if self.host.trim().is_empty() {
            return Err(ValidationError::required_field_missing("host"));
        }
        if self.port == 0 {
            return Err(ValidationError::value_out_of_range(
                "port",
                self.port.to_string(),
                "1-65535",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_impl::{ConfigLoader, MapConfigProvider};

    #[test]
    fn test_defaults_when_section_is_absent() {
        let loader = ConfigLoader::new()
            .with_provider(MapConfigProvider::new("empty"))
            .unwrap();

        let options = loader.bind::<ApplicationOptions>().unwrap();
        assert_eq!(options, ApplicationOptions::default());
        assert_eq!(options.address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_section_overrides() {
        let loader = ConfigLoader::new()
            .with_provider(
                MapConfigProvider::new("app")
                    .set("application.port", "9090")
                    .set("application.log_format", "json"),
            )
            .unwrap();

        let options = loader.bind::<ApplicationOptions>().unwrap();
        assert_eq!(options.port, 9090);
        assert_eq!(options.log_format, LogFormat::Json);
    }

    #[test]
    fn test_zero_port_is_invalid() {
        let options = ApplicationOptions {
            port: 0,
            ..ApplicationOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
