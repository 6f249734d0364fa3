//! 配置提供者实现

use config_abstractions::{ConfigProvider, ConfigSnapshot};
use infrastructure_common::ConfigError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 环境变量配置提供者
///
/// 设置前缀后只收集 `<PREFIX>_` 开头的变量并去掉前缀；
/// 变量名中的 `__` 表示嵌套路径，例如 `SERVER__PORT` 对应 `server.port`。
#[derive(Debug, Clone)]
pub struct EnvironmentConfigProvider {
    prefix: Option<String>,
    priority: i32,
    source: Option<HashMap<String, String>>,
}

impl EnvironmentConfigProvider {
    /// 环境变量的默认优先级，高于文件与内存配置
    pub const DEFAULT_PRIORITY: i32 = 100;

    /// 读取全部环境变量
    pub fn new() -> Self {
        Self {
            prefix: None,
            priority: Self::DEFAULT_PRIORITY,
            source: None,
        }
    }

    /// 只读取指定前缀的环境变量
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::new()
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 以给定变量代替进程环境，主要用于测试
    pub fn with_source(mut self, source: HashMap<String, String>) -> Self {
        self.source = Some(source);
        self
    }

    fn translate(&self, key: &str) -> Option<String> {
        let key = match &self.prefix {
            Some(prefix) => {
                let rest = key.strip_prefix(prefix.as_str())?;
                rest.strip_prefix('_')?
            }
            None => key,
        };
        if key.is_empty() {
            return None;
        }
        Some(key.replace("__", "."))
    }
}

impl Default for EnvironmentConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigProvider for EnvironmentConfigProvider {
    fn name(&self) -> &str {
        "EnvironmentConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn collect(&self) -> Result<ConfigSnapshot, ConfigError> {
        let variables: Vec<(String, String)> = match &self.source {
            Some(source) => source.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            None => std::env::vars().collect(),
        };

        let snapshot: ConfigSnapshot = variables
            .into_iter()
            .filter_map(|(key, value)| self.translate(&key).map(|key| (key, value)))
            .collect();
        debug!("收集环境变量 {} 个", snapshot.len());
        Ok(snapshot)
    }
}

/// 内存配置提供者
#[derive(Debug, Clone)]
pub struct MapConfigProvider {
    name: String,
    priority: i32,
    values: ConfigSnapshot,
}

impl MapConfigProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            values: HashMap::new(),
        }
    }

    /// 设置一个键值
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigProvider for MapConfigProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn collect(&self) -> Result<ConfigSnapshot, ConfigError> {
        Ok(self.values.clone())
    }
}

/// TOML 配置提供者
///
/// 每次收集时重新读取文件，表展开为 `a.b` 形式的键，数组展开为 `a[0]`。
#[derive(Debug, Clone)]
pub struct TomlConfigProvider {
    file_path: PathBuf,
    priority: i32,
    required: bool,
}

impl TomlConfigProvider {
    /// 创建新的 TOML 配置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
            priority: 50,
            required: true,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 文件不存在时是否报错
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn flatten(prefix: &str, value: &toml::Value, output: &mut ConfigSnapshot) {
        match value {
            toml::Value::Table(table) => {
                for (key, nested) in table {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    Self::flatten(&path, nested, output);
                }
            }
            toml::Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    Self::flatten(&format!("{prefix}[{idx}]"), item, output);
                }
            }
            toml::Value::String(s) => {
                output.insert(prefix.to_string(), s.clone());
            }
            toml::Value::Integer(i) => {
                output.insert(prefix.to_string(), i.to_string());
            }
            toml::Value::Float(f) => {
                output.insert(prefix.to_string(), f.to_string());
            }
            toml::Value::Boolean(b) => {
                output.insert(prefix.to_string(), b.to_string());
            }
            toml::Value::Datetime(dt) => {
                output.insert(prefix.to_string(), dt.to_string());
            }
        }
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn name(&self) -> &str {
        "TomlConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn collect(&self) -> Result<ConfigSnapshot, ConfigError> {
        if !self.file_path.exists() {
            if self.required {
                return Err(ConfigError::FileNotFound {
                    path: self.file_path.display().to_string(),
                });
            }
            debug!("可选配置文件不存在，跳过: {}", self.file_path.display());
            return Ok(HashMap::new());
        }

        debug!("加载 TOML 配置文件: {}", self.file_path.display());
        let content = std::fs::read_to_string(&self.file_path)?;
        let table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

        let mut snapshot = HashMap::new();
        Self::flatten("", &toml::Value::Table(table), &mut snapshot);
        Ok(snapshot)
    }
}
