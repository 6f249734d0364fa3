//! 组件描述符与工厂
//!
//! 每个组件在注册时显式声明一个有序的 `(参数名, 接口标识)` 列表，
//! 由构建器链式调用或 `#[derive(Injectable)]` 生成，替代运行时的签名反射。

use crate::resolver::{Instance, ResolvedDependencies};
use infrastructure_common::{BoxError, DependencyError, Lifetime, TypeInfo};
use std::marker::PhantomData;
use std::sync::Arc;

/// 类型擦除后的工厂函数
pub type FactoryFn = Arc<dyn Fn(ResolvedDependencies) -> Result<Instance, BoxError> + Send + Sync>;

/// 单个依赖声明
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencySpec {
    /// 工厂参数名
    pub name: &'static str,
    /// 依赖的接口
    pub interface: TypeInfo,
}

impl DependencySpec {
    /// 声明对类型 `T` 的依赖
    pub fn of<T: 'static>(name: &'static str) -> Self {
        Self {
            name,
            interface: TypeInfo::of::<T>(),
        }
    }
}

/// 可注入组件 trait
///
/// 组件声明自己的依赖列表，并从已解析依赖构造自身。
pub trait Injectable: Sized + Send + Sync + 'static {
    /// 依赖列表（参数名 + 接口）
    fn dependencies() -> Vec<DependencySpec>;

    /// 使用已解析依赖构造组件实例
    fn inject(dependencies: &mut ResolvedDependencies) -> Result<Self, BoxError>;

    /// 获取默认生命周期
    fn default_lifetime() -> Lifetime {
        Lifetime::Transient
    }
}

/// 组件描述符
///
/// 创建后不可修改，在容器生命周期内一直存在。
#[derive(Clone)]
pub struct ComponentDescriptor {
    interface: TypeInfo,
    lifetime: Lifetime,
    dependencies: Vec<DependencySpec>,
    factory: FactoryFn,
}

impl ComponentDescriptor {
    /// 为接口 `T` 创建描述符构建器
    pub fn builder<T>() -> DescriptorBuilder<T>
    where
        T: Send + Sync + 'static,
    {
        DescriptorBuilder {
            lifetime: Lifetime::default(),
            dependencies: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// 以 `T` 自身的构造函数作为工厂
    pub fn injectable<T: Injectable>(lifetime: Lifetime) -> Self {
        Self::builder::<T>()
            .with_dependencies(T::dependencies())
            .lifetime(lifetime)
            .factory(T::inject)
    }

    /// 以已有实例注册单例
    pub fn instance<T>(instance: Arc<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self {
            interface: TypeInfo::of::<T>(),
            lifetime: Lifetime::Singleton,
            dependencies: Vec::new(),
            factory: Arc::new(move |_| Ok(instance.clone() as Instance)),
        }
    }

    /// 接口标识
    pub fn interface(&self) -> TypeInfo {
        self.interface
    }

    /// 生命周期
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn is_singleton(&self) -> bool {
        self.lifetime.is_singleton()
    }

    /// 声明的依赖列表
    pub fn dependencies(&self) -> &[DependencySpec] {
        &self.dependencies
    }

    /// 直接依赖的接口集合（去重，保持声明顺序）
    pub fn direct_dependencies(&self) -> Vec<TypeInfo> {
        let mut interfaces: Vec<TypeInfo> = Vec::with_capacity(self.dependencies.len());
        for spec in &self.dependencies {
            if !interfaces.contains(&spec.interface) {
                interfaces.push(spec.interface);
            }
        }
        interfaces
    }

    /// 调用工厂，失败时以接口名报告
    pub fn create(&self, dependencies: ResolvedDependencies) -> Result<Instance, DependencyError> {
        (self.factory)(dependencies)
            .map_err(|source| DependencyError::construction(self.interface.short_name(), source))
    }
}

impl std::fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("interface", &self.interface)
            .field("lifetime", &self.lifetime)
            .field("dependencies", &self.dependencies)
            .field("factory", &"<function>")
            .finish()
    }
}

/// 描述符构建器
pub struct DescriptorBuilder<T> {
    lifetime: Lifetime,
    dependencies: Vec<DependencySpec>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> DescriptorBuilder<T>
where
    T: Send + Sync + 'static,
{
    /// 声明依赖：工厂参数 `name` 绑定接口 `D` 的实例
    pub fn depends_on<D: 'static>(mut self, name: &'static str) -> Self {
        self.dependencies.push(DependencySpec::of::<D>(name));
        self
    }

    /// 追加一组依赖声明
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = DependencySpec>) -> Self {
        self.dependencies.extend(dependencies);
        self
    }

    /// 设置生命周期
    pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn singleton(self) -> Self {
        self.lifetime(Lifetime::Singleton)
    }

    pub fn transient(self) -> Self {
        self.lifetime(Lifetime::Transient)
    }

    /// 设置工厂并完成构建
    pub fn factory<F>(self, factory: F) -> ComponentDescriptor
    where
        F: Fn(&mut ResolvedDependencies) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let factory: FactoryFn = Arc::new(move |mut dependencies: ResolvedDependencies| {
            factory(&mut dependencies).map(|value| Arc::new(value) as Instance)
        });

        ComponentDescriptor {
            interface: TypeInfo::of::<T>(),
            lifetime: self.lifetime,
            dependencies: self.dependencies,
            factory,
        }
    }
}
