//! 配置加载器
//!
//! 按优先级合并配置源，并通过 `config` crate 绑定到配置类型。
//! 键名统一转为小写，字符串值在绑定时按目标字段类型转换。

use config_abstractions::{ConfigProvider, ConfigSnapshot};
use infrastructure_common::{ConfigError, Configuration};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 配置加载器
pub struct ConfigLoader {
    providers: Vec<Box<dyn ConfigProvider>>,
    /// 合并结果缓存，`reload` 或添加配置源时失效
    settings: RwLock<Option<Arc<config::Config>>>,
}

impl ConfigLoader {
    /// 创建没有配置源的加载器
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            settings: RwLock::new(None),
        }
    }

    /// 添加配置源
    pub fn add_provider<P>(&mut self, provider: P) -> Result<(), ConfigError>
    where
        P: ConfigProvider + 'static,
    {
        if self.providers.iter().any(|p| p.name() == provider.name()) {
            return Err(ConfigError::DuplicateProvider {
                name: provider.name().to_string(),
            });
        }

        debug!("添加配置源: {} (优先级 {})", provider.name(), provider.priority());
        self.providers.push(Box::new(provider));
        *self.settings.write() = None;
        Ok(())
    }

    /// 添加配置源（链式）
    pub fn with_provider<P>(mut self, provider: P) -> Result<Self, ConfigError>
    where
        P: ConfigProvider + 'static,
    {
        self.add_provider(provider)?;
        Ok(self)
    }

    /// 按合并顺序返回配置源名称
    pub fn provider_names(&self) -> Vec<&str> {
        self.ordered().iter().map(|p| p.name()).collect()
    }

    fn ordered(&self) -> Vec<&dyn ConfigProvider> {
        let mut providers: Vec<&dyn ConfigProvider> =
            self.providers.iter().map(|p| p.as_ref()).collect();
        // 稳定排序，同优先级保持添加顺序
        providers.sort_by_key(|p| p.priority());
        providers
    }

    /// 合并所有配置源，键名转为小写
    pub fn merged(&self) -> Result<ConfigSnapshot, ConfigError> {
        let mut merged = HashMap::new();
        for provider in self.ordered() {
            let snapshot = provider.collect().map_err(|e| {
                error!("配置源 {} 读取失败: {}", provider.name(), e);
                e
            })?;
            merged.extend(
                snapshot
                    .into_iter()
                    .map(|(key, value)| (key.to_lowercase(), value)),
            );
        }
        Ok(merged)
    }

    /// 获取合并后的配置，首次调用时构建
    pub fn settings(&self) -> Result<Arc<config::Config>, ConfigError> {
        if let Some(settings) = self.settings.read().as_ref() {
            return Ok(settings.clone());
        }

        let settings = Arc::new(self.build()?);
        *self.settings.write() = Some(settings.clone());
        Ok(settings)
    }

    /// 重新读取所有配置源
    pub fn reload(&self) -> Result<(), ConfigError> {
        let settings = Arc::new(self.build()?);
        *self.settings.write() = Some(settings);
        info!("配置已重新加载");
        Ok(())
    }

    fn build(&self) -> Result<config::Config, ConfigError> {
        let merged = self.merged()?;
        debug!("合并配置项 {} 个", merged.len());

        config::Config::builder()
            .add_source(config::Environment::default().source(Some(merged)))
            .build()
            .map_err(|e| {
                error!("配置构建失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })
    }

    /// 绑定配置类型并验证
    ///
    /// 配置类型声明了配置节时从该节绑定，配置节不存在时使用字段默认值。
    pub fn bind<T: Configuration>(&self) -> Result<T, ConfigError> {
        let type_name = std::any::type_name::<T>();
        let settings = self.settings()?;

        let bound = match T::section() {
            Some(section) => match settings.get::<T>(section) {
                Err(config::ConfigError::NotFound(_)) => {
                    debug!("配置节 {} 不存在，使用默认值", section);
                    Self::empty().and_then(|empty| empty.try_deserialize::<T>())
                }
                other => other,
            },
            None => Self::deserialize_root(&settings),
        };

        let value = bound.map_err(|e| {
            error!("配置绑定失败: {}, {}", type_name, e);
            ConfigError::BindingFailed {
                type_name: type_name.to_string(),
                source: Box::new(e),
            }
        })?;

        value
            .validate()
            .map_err(|source| ConfigError::ValidationFailed {
                type_name: type_name.to_string(),
                source,
            })?;

        debug!("配置绑定成功: {}", type_name);
        Ok(value)
    }

    /// 读取单个配置值
    pub fn get<V: DeserializeOwned>(&self, key: &str) -> Result<V, ConfigError> {
        self.settings()?
            .get::<V>(&key.to_lowercase())
            .map_err(|e| ConfigError::BindingFailed {
                type_name: key.to_string(),
                source: Box::new(e),
            })
    }

    fn deserialize_root<T: DeserializeOwned>(settings: &config::Config) -> Result<T, config::ConfigError> {
        settings.clone().try_deserialize::<T>()
    }

    fn empty() -> Result<config::Config, config::ConfigError> {
        config::Config::builder().build()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("providers", &self.provider_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{EnvironmentConfigProvider, MapConfigProvider};
    use infrastructure_common::ValidationError;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct AppSettings {
        #[serde(default = "default_name")]
        app_name: String,
        #[serde(default)]
        port: u16,
        #[serde(default)]
        verbose: bool,
    }

    fn default_name() -> String {
        "SprintApiDemo".to_string()
    }

    impl Configuration for AppSettings {
        fn validate(&self) -> Result<(), ValidationError> {
            if self.app_name.is_empty() {
                return Err(ValidationError::required_field_missing("app_name"));
            }
            Ok(())
        }
    }

    #[derive(Debug, Deserialize)]
    struct ServerSettings {
        host: String,
        #[serde(default)]
        port: u16,
    }

    impl Configuration for ServerSettings {
        fn section() -> Option<&'static str> {
            Some("server")
        }
    }

    fn env(vars: &[(&str, &str)]) -> EnvironmentConfigProvider {
        EnvironmentConfigProvider::new().with_source(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_bind_coerces_strings_and_ignores_case() {
        let loader = ConfigLoader::new()
            .with_provider(env(&[("APP_NAME", "Shop"), ("PORT", "8080"), ("VERBOSE", "true")]))
            .unwrap();

        let settings = loader.bind::<AppSettings>().unwrap();
        assert_eq!(settings.app_name, "Shop");
        assert_eq!(settings.port, 8080);
        assert!(settings.verbose);
    }

    #[test]
    fn test_defaults_apply_when_key_is_absent() {
        let loader = ConfigLoader::new().with_provider(env(&[])).unwrap();
        let settings = loader.bind::<AppSettings>().unwrap();
        assert_eq!(settings.app_name, "SprintApiDemo");
        assert_eq!(settings.port, 0);
    }

    #[test]
    fn test_higher_priority_overrides() {
        let loader = ConfigLoader::new()
            .with_provider(env(&[("APP_NAME", "FromEnv")]))
            .unwrap()
            .with_provider(MapConfigProvider::new("defaults").set("app_name", "FromMap"))
            .unwrap();

        assert_eq!(loader.provider_names(), ["defaults", "EnvironmentConfigProvider"]);
        assert_eq!(loader.bind::<AppSettings>().unwrap().app_name, "FromEnv");
        assert_eq!(loader.get::<String>("APP_NAME").unwrap(), "FromEnv");
    }

    #[test]
    fn test_section_binding() {
        let loader = ConfigLoader::new()
            .with_provider(
                MapConfigProvider::new("app")
                    .set("server.host", "0.0.0.0")
                    .set("server.port", "3000"),
            )
            .unwrap();

        let server = loader.bind::<ServerSettings>().unwrap();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3000);
    }

    #[test]
    fn test_missing_required_field_fails_binding() {
        let loader = ConfigLoader::new().with_provider(MapConfigProvider::new("empty")).unwrap();

        assert!(matches!(
            loader.bind::<ServerSettings>(),
            Err(ConfigError::BindingFailed { .. })
        ));
    }

    #[test]
    fn test_validation_failure() {
        let loader = ConfigLoader::new()
            .with_provider(MapConfigProvider::new("app").set("app_name", ""))
            .unwrap();

        assert!(matches!(
            loader.bind::<AppSettings>(),
            Err(ConfigError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_invalid_value_fails_binding() {
        let loader = ConfigLoader::new()
            .with_provider(MapConfigProvider::new("app").set("port", "not-a-number"))
            .unwrap();

        assert!(matches!(
            loader.bind::<AppSettings>(),
            Err(ConfigError::BindingFailed { .. })
        ));
    }

    #[test]
    fn test_duplicate_provider_name() {
        let mut loader = ConfigLoader::new();
        loader.add_provider(MapConfigProvider::new("app")).unwrap();

        assert!(matches!(
            loader.add_provider(MapConfigProvider::new("app")),
            Err(ConfigError::DuplicateProvider { ref name }) if name == "app"
        ));
    }
}
