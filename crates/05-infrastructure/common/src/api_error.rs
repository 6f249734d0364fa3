//! 面向调用方的错误模型
//!
//! 错误代码沿用 gRPC 状态码编号，序列化为 `{"code": <整数>, "message": <文本>}`。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 错误代码，定义参照 gRPC 错误代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum ErrorCode {
    Ok = 0,
    Cancelled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl From<ErrorCode> for u8 {
    fn from(code: ErrorCode) -> Self {
        code as u8
    }
}

impl TryFrom<u8> for ErrorCode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Ok,
            1 => Self::Cancelled,
            2 => Self::Unknown,
            3 => Self::InvalidArgument,
            4 => Self::DeadlineExceeded,
            5 => Self::NotFound,
            6 => Self::AlreadyExists,
            7 => Self::PermissionDenied,
            8 => Self::ResourceExhausted,
            9 => Self::FailedPrecondition,
            10 => Self::Aborted,
            11 => Self::OutOfRange,
            12 => Self::Unimplemented,
            13 => Self::Internal,
            14 => Self::Unavailable,
            15 => Self::DataLoss,
            16 => Self::Unauthenticated,
            other => return Err(format!("未知的错误代码: {other}")),
        };
        Ok(code)
    }
}

/// 错误响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorModel {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorModel {
    /// 成功响应
    pub fn ok() -> Self {
        Self {
            code: ErrorCode::Ok,
            message: "Ok.".to_string(),
        }
    }
}

/// 处理器返回给调用方的错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    /// 创建新的错误
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn already_exists() -> Self {
        Self::new(ErrorCode::AlreadyExists, "Requested resource already exists.")
    }

    pub fn deadline_exceeded() -> Self {
        Self::new(ErrorCode::DeadlineExceeded, "Deadline exceeded.")
    }

    pub fn failed_precondition() -> Self {
        Self::new(
            ErrorCode::FailedPrecondition,
            "Resource is not in a valid state.",
        )
    }

    pub fn internal() -> Self {
        Self::new(ErrorCode::Internal, "Internal error.")
    }

    pub fn invalid_argument() -> Self {
        Self::new(ErrorCode::InvalidArgument, "Invalid argument.")
    }

    pub fn not_found() -> Self {
        Self::new(ErrorCode::NotFound, "Requested resource does not exist.")
    }

    pub fn permission_denied() -> Self {
        Self::new(ErrorCode::PermissionDenied, "Permission denied.")
    }

    /// 限流，对外表现为 `Unavailable`
    pub fn too_many_requests() -> Self {
        Self::new(ErrorCode::Unavailable, "Too many requests.")
    }

    pub fn unauthenticated() -> Self {
        Self::new(ErrorCode::Unauthenticated, "Unauthenticated request.")
    }

    pub fn unimplemented() -> Self {
        Self::new(ErrorCode::Unimplemented, "Unimplemented method.")
    }

    /// 替换默认消息
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// 转换为响应体
    pub fn model(&self) -> ErrorModel {
        ErrorModel {
            code: self.code,
            message: self.message.clone(),
        }
    }

    /// 序列化为 JSON 文本
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.model())
    }
}

impl From<ApiError> for ErrorModel {
    fn from(err: ApiError) -> Self {
        Self {
            code: err.code,
            message: err.message,
        }
    }
}
