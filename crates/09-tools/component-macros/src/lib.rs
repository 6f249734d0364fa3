//! # Component Macros
//!
//! 这个 crate 提供了在编译期生成依赖声明的过程宏。
//!
//! ## 核心宏
//!
//! - [`Injectable`](macro@Injectable) - 根据字段生成依赖列表和构造函数
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::Injectable;
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! #[injectable(singleton)]
//! pub struct AppManager {
//!     config: Arc<DemoConfig>,
//!     #[inject(default)]
//!     requests: AtomicU64,
//! }
//! ```
//!
//! 生成的代码引用 `di_abstractions` 和 `infrastructure_common`，
//! 使用方需要直接依赖这两个 crate。

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod utils;

// Re-exports are not allowed in proc-macro crates

/// 可注入组件派生宏
///
/// 为具名字段结构体实现 `di_abstractions::Injectable`：
///
/// - 每个 `Arc<T>` 字段声明一个依赖，参数名为字段名
/// - 标记 `#[inject(default)]` 的字段使用 `Default::default()` 填充
/// - 其他字段产生编译错误
///
/// 结构体属性 `#[injectable(singleton)]` 或 `#[injectable(transient)]`
/// 设置默认生命周期，未指定时为瞬时。`DependencyContainer::register_injectable`
/// 按这个生命周期注册组件。
#[proc_macro_derive(Injectable, attributes(injectable, inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_injectable_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
