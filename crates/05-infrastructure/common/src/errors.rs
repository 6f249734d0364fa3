//! 错误类型定义

use std::fmt;
use thiserror::Error;

/// 通用的装箱错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("配置绑定失败: {type_name}, 原因: {source}")]
    BindingFailed { type_name: String, source: BoxError },

    #[error("配置验证失败: {type_name}, 原因: {source}")]
    ValidationFailed {
        type_name: String,
        source: ValidationError,
    },

    #[error("配置提供者重复: {name}")]
    DuplicateProvider { name: String },
}

/// 工厂参数绑定错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("缺少参数: {name}")]
    Missing { name: String },

    #[error("参数类型不匹配: {name}, 期望 {expected}")]
    TypeMismatch { name: String, expected: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件重复注册: {type_name}")]
    DuplicateRegistration { type_name: String },

    #[error("组件未注册: {type_name}")]
    UnregisteredDependency { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ConstructionFailure { type_name: String, source: BoxError },

    #[error("检测到循环依赖: {}", .members.join(", "))]
    CycleDetected { members: Vec<String> },

    #[error("依赖解析深度超出限制: {type_name} (最大深度 {max_depth})")]
    ResolutionDepthExceeded { type_name: String, max_depth: usize },
}

impl DependencyError {
    /// 创建组件创建失败错误
    pub fn construction(type_name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ConstructionFailure {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 创建组件未注册错误
    pub fn unregistered(type_name: impl Into<String>) -> Self {
        Self::UnregisteredDependency {
            type_name: type_name.into(),
        }
    }
}

/// 注册候选项无效的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// 候选项不是类型
    NotAType,
    /// 类型不满足类别要求的基础能力
    MissingCapability,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAType => f.write_str("不是类型"),
            Self::MissingCapability => f.write_str("不满足类别的基础能力"),
        }
    }
}

/// 类别注册表错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{category} 注册失败: {candidate} {reason}")]
    InvalidRegistrant {
        category: String,
        candidate: String,
        reason: InvalidReason,
    },

    #[error("{category} 类型 \"{type_name}\" 已注册")]
    AlreadyRegistered { category: String, type_name: String },
}

/// 验证错误类型
#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("验证失败: {message}")]
    ValidationFailed { message: String },

    #[error("必需字段缺失: {field_name}")]
    RequiredFieldMissing { field_name: String },

    #[error("字段值无效: {field_name}, 值: {value}, 原因: {reason}")]
    InvalidFieldValue {
        field_name: String,
        value: String,
        reason: String,
    },

    #[error("字段值超出范围: {field_name}, 值: {value}, 范围: {range}")]
    ValueOutOfRange {
        field_name: String,
        value: String,
        range: String,
    },
}

impl ValidationError {
    /// 创建新的验证错误
    pub fn new(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// 创建必需字段缺失错误
    pub fn required_field_missing(field_name: impl Into<String>) -> Self {
        Self::RequiredFieldMissing {
            field_name: field_name.into(),
        }
    }

    /// 创建字段值无效错误
    pub fn invalid_field_value(
        field_name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldValue {
            field_name: field_name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 创建值超出范围错误
    pub fn value_out_of_range(
        field_name: impl Into<String>,
        value: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self::ValueOutOfRange {
            field_name: field_name.into(),
            value: value.into(),
            range: range.into(),
        }
    }
}

/// 生命周期管理错误类型
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("服务 {service} 在 {phase} 阶段失败: {source}")]
    HookFailed {
        service: String,
        phase: crate::lifecycle::LifecyclePhase,
        source: BoxError,
    },

    #[error("生命周期管理失败: {message}")]
    LifecycleManagementFailed { message: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("类别注册错误: {source}")]
    RegistryError {
        #[from]
        source: RegistryError,
    },

    #[error("生命周期错误: {source}")]
    LifecycleError {
        #[from]
        source: LifecycleError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type RegistryResult<T> = Result<T, RegistryError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type LifecycleResult<T> = Result<T, LifecycleError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_detected_lists_members() {
        let err = DependencyError::CycleDetected {
            members: vec!["X".to_string(), "Y".to_string()],
        };
        assert_eq!(err.to_string(), "检测到循环依赖: X, Y");
    }

    #[test]
    fn test_construction_failure_names_interface() {
        let err = DependencyError::construction(
            "Manager",
            ArgumentError::Missing {
                name: "config".to_string(),
            },
        );
        let message = err.to_string();
        assert!(message.contains("Manager"));
        assert!(message.contains("config"));
    }

    #[test]
    fn test_infrastructure_error_from_registry_error() {
        let err: InfrastructureError = RegistryError::AlreadyRegistered {
            category: "service".to_string(),
            type_name: "AppManager".to_string(),
        }
        .into();
        assert!(matches!(err, InfrastructureError::RegistryError { .. }));
    }
}
