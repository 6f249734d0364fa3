//! 日志初始化
//!
//! `WARN` 及以上级别写入 stderr，其余写入 stdout。过滤器放在 reload 层后面，
//! 运行时可以通过 [`LoggingHandle::set_level`] 切换级别。

use crate::options::{ApplicationOptions, LogFormat};
use infrastructure_common::InfrastructureError;
use tracing::{info, Level};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// 日志级别或过滤指令，例如 `info`、`debug,di_impl=trace`
    pub level: String,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 按应用选项中的级别和格式创建
    pub fn from_options(options: &ApplicationOptions) -> Self {
        Self {
            level: options.log_level.clone(),
            json_format: options.log_format == LogFormat::Json,
            ..Self::default()
        }
    }
}

/// 日志句柄，用于运行时调整级别
#[derive(Debug, Clone)]
pub struct LoggingHandle {
    filter: reload::Handle<EnvFilter, Registry>,
}

impl LoggingHandle {
    /// 切换全局日志级别
    pub fn set_level(&self, level: &str) -> Result<(), InfrastructureError> {
        let filter = parse_filter(level)?;
        self.filter
            .reload(filter)
            .map_err(|e| InfrastructureError::BootstrapFailed {
                message: format!("日志级别切换失败: {e}"),
            })?;
        info!("日志级别已切换为 {}", level);
        Ok(())
    }

    /// 当前过滤指令
    pub fn current_level(&self) -> Option<String> {
        self.filter.with_current(|filter| filter.to_string()).ok()
    }
}

fn parse_filter(level: &str) -> Result<EnvFilter, InfrastructureError> {
    EnvFilter::try_new(level).map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("无效的日志级别 {level}: {e}"),
    })
}

/// 初始化全局日志系统
///
/// 全局订阅者只能设置一次，重复初始化返回错误。
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingHandle, InfrastructureError> {
    let (filter, handle) = reload::Layer::new(parse_filter(&config.level)?);
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    if config.json_format {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer).try_init()
    }
    .map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志初始化失败: {e}"),
    })?;

    info!("日志系统初始化完成");
    Ok(LoggingHandle { filter: handle })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_from_options() {
        let options = ApplicationOptions {
            log_level: "debug".to_string(),
            log_format: LogFormat::Json,
            ..ApplicationOptions::default()
        };

        let config = LoggingConfig::from_options(&options);
        assert_eq!(config.level, "debug");
        assert!(config.json_format);
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        assert!(parse_filter("info").is_ok());
        assert!(parse_filter("app=loud").is_err());
    }
}
