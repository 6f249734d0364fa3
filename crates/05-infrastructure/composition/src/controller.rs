//! 控制器与路由表
//!
//! 控制器只产出路由表（HTTP 方法 + 路径 + 处理函数），
//! 挂载到具体 Web 框架由外层负责。

use futures::future::BoxFuture;
use futures::FutureExt;
use infrastructure_common::ApiError;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
            Self::Put => f.write_str("PUT"),
            Self::Delete => f.write_str("DELETE"),
        }
    }
}

/// 处理函数返回的 future
pub type HandlerFuture = BoxFuture<'static, Result<Value, ApiError>>;

/// 路由处理函数
pub type Handler = Arc<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

/// 单条路由
#[derive(Clone)]
pub struct Route {
    method: HttpMethod,
    path: String,
    handler: Handler,
}

impl Route {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// 相对于路由表前缀的路径
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 调用处理函数
    pub fn call(&self, payload: Value) -> HandlerFuture {
        (self.handler)(payload)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish()
    }
}

/// 路由表
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    prefix: String,
    routes: Vec<Route>,
}

impl RouteTable {
    /// 创建路由表，前缀末尾的一个 `/` 会被去掉
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.strip_suffix('/').unwrap_or(&prefix).to_string(),
            routes: Vec::new(),
        }
    }

    /// 添加路由，非空路径自动补齐开头的 `/`
    pub fn route<F, Fut>(mut self, method: HttpMethod, path: &str, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        let path = if path.is_empty() || path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        self.routes.push(Route {
            method,
            path,
            handler: Arc::new(move |payload| handler(payload).boxed()),
        });
        self
    }

    pub fn get<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        self.route(HttpMethod::Get, path, handler)
    }

    pub fn post<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        self.route(HttpMethod::Post, path, handler)
    }

    pub fn put<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        self.route(HttpMethod::Put, path, handler)
    }

    pub fn delete<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        self.route(HttpMethod::Delete, path, handler)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// 前缀与路由路径拼接后的完整路径
    pub fn full_path(&self, route: &Route) -> String {
        let path = format!("{}{}", self.prefix, route.path);
        if path.is_empty() {
            "/".to_string()
        } else {
            path
        }
    }
}

/// 控制器 trait
///
/// 控制器由容器构造，再由启动流程取出路由表。
pub trait Controller: Send + Sync + 'static {
    /// 生成路由表，处理函数可以持有 `self` 的克隆
    fn router(self: Arc<Self>) -> RouteTable;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo {
        greeting: String,
    }

    impl Controller for Echo {
        fn router(self: Arc<Self>) -> RouteTable {
            RouteTable::new("/echo/").post("say", move |payload| {
                let this = self.clone();
                async move { Ok(json!({ "greeting": this.greeting, "payload": payload })) }
            })
        }
    }

    #[test]
    fn test_paths_are_normalised() {
        let table = RouteTable::new("/api/")
            .get("items", |_| async { Ok(Value::Null) })
            .get("/items/one", |_| async { Ok(Value::Null) })
            .get("", |_| async { Ok(Value::Null) });

        assert_eq!(table.prefix(), "/api");
        let paths: Vec<String> = table.routes().iter().map(|r| table.full_path(r)).collect();
        assert_eq!(paths, ["/api/items", "/api/items/one", "/api"]);
    }

    #[test]
    fn test_only_one_trailing_slash_is_removed() {
        let table = RouteTable::new("/api//").get("items", |_| async { Ok(Value::Null) });

        assert_eq!(table.prefix(), "/api/");
        assert_eq!(table.full_path(&table.routes()[0]), "/api//items");
    }

    #[test]
    fn test_root_table_full_path() {
        let table = RouteTable::new("/").delete("", |_| async { Err(ApiError::unimplemented()) });
        assert_eq!(table.full_path(&table.routes()[0]), "/");
        assert_eq!(table.routes()[0].method(), HttpMethod::Delete);
    }

    #[tokio::test]
    async fn test_controller_handler_uses_instance() {
        let controller = Arc::new(Echo {
            greeting: "hi".to_string(),
        });
        let table = controller.router();

        assert_eq!(table.routes().len(), 1);
        let route = &table.routes()[0];
        assert_eq!(route.method(), HttpMethod::Post);
        assert_eq!(table.full_path(route), "/echo/say");

        let response = route.call(json!(1)).await.unwrap();
        assert_eq!(response, json!({"greeting": "hi", "payload": 1}));
    }
}
