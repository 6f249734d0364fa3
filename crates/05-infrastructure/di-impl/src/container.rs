//! 依赖注入容器实现

use crate::graph::DependencyGraph;
use di_abstractions::{
    ComponentDescriptor, ComponentRegistry, ComponentResolver, ContainerConfig, ContainerStats,
    DependencySpec, Injectable, Instance, ResolvedDependencies,
};
use infrastructure_common::{BoxError, DependencyError, Lifetime, TypeInfo};
use parking_lot::{ReentrantMutex, RwLock};
use std::any::TypeId;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 依赖注入容器
///
/// 注册阶段通过 `&mut self` 完成，解析阶段只需要 `&self`。
/// 单例的首次构造由一把可重入锁串行化，嵌套解析在同一线程上可以重复加锁，
/// 并发的首次解析只会构造一个实例。
pub struct DependencyContainer {
    config: ContainerConfig,
    /// 组件描述符
    descriptors: HashMap<TypeId, ComponentDescriptor>,
    /// 注册顺序
    order: Vec<TypeInfo>,
    /// 单例缓存
    singletons: RwLock<HashMap<TypeId, Instance>>,
    /// 单例构造锁
    construction: ReentrantMutex<()>,
}

impl DependencyContainer {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            descriptors: HashMap::new(),
            order: Vec::new(),
            singletons: RwLock::new(HashMap::new()),
            construction: ReentrantMutex::new(()),
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 注册组件描述符
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> Result<(), DependencyError> {
        let interface = descriptor.interface();
        if self.descriptors.contains_key(&interface.id()) {
            return Err(DependencyError::DuplicateRegistration {
                type_name: interface.short_name().to_string(),
            });
        }

        debug!(
            "注册组件: {} ({:?}, 依赖 {} 个)",
            interface,
            descriptor.lifetime(),
            descriptor.dependencies().len()
        );
        self.descriptors.insert(interface.id(), descriptor);
        self.order.push(interface);
        Ok(())
    }

    /// 以类型自身的构造函数注册组件
    pub fn register_type<T: Injectable>(&mut self, lifetime: Lifetime) -> Result<(), DependencyError> {
        self.register(ComponentDescriptor::injectable::<T>(lifetime))
    }

    /// 以类型声明的默认生命周期注册组件
    pub fn register_injectable<T: Injectable>(&mut self) -> Result<(), DependencyError> {
        self.register_type::<T>(T::default_lifetime())
    }

    /// 以显式依赖列表和工厂函数注册组件
    pub fn register_factory<T, F>(
        &mut self,
        dependencies: impl IntoIterator<Item = DependencySpec>,
        factory: F,
        lifetime: Lifetime,
    ) -> Result<(), DependencyError>
    where
        T: Send + Sync + 'static,
        F: Fn(&mut ResolvedDependencies) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.register(
            ComponentDescriptor::builder::<T>()
                .with_dependencies(dependencies)
                .lifetime(lifetime)
                .factory(factory),
        )
    }

    /// 注册已有实例（单例）
    pub fn register_instance<T>(&mut self, instance: Arc<T>) -> Result<(), DependencyError>
    where
        T: Send + Sync + 'static,
    {
        self.register(ComponentDescriptor::instance(instance))
    }

    /// 检查组件是否已注册
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.descriptors.contains_key(&TypeId::of::<T>())
    }

    /// 获取组件描述符
    pub fn descriptor(&self, interface: &TypeInfo) -> Option<&ComponentDescriptor> {
        self.descriptors.get(&interface.id())
    }

    /// 解析组件并转换为具体类型
    pub fn resolve<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        let interface = TypeInfo::of::<T>();
        self.resolve_instance(interface)?.downcast::<T>().map_err(|_| {
            DependencyError::construction(
                interface.short_name(),
                format!("类型转换失败: 期望 {}", interface.name()),
            )
        })
    }

    /// 解析接口的实例
    ///
    /// 先递归解析每个声明的依赖，再调用工厂。单例命中缓存时直接返回。
    /// 本方法不检测循环依赖，环上的解析会在达到最大深度时失败。
    pub fn resolve_instance(&self, interface: TypeInfo) -> Result<Instance, DependencyError> {
        self.resolve_at(interface, 0)
    }

    fn resolve_at(&self, interface: TypeInfo, depth: usize) -> Result<Instance, DependencyError> {
        if depth > self.config.max_resolution_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                type_name: interface.short_name().to_string(),
                max_depth: self.config.max_resolution_depth,
            });
        }

        let descriptor = self
            .descriptors
            .get(&interface.id())
            .ok_or_else(|| DependencyError::unregistered(interface.short_name()))?;

        if !descriptor.is_singleton() {
            return self.construct(descriptor, depth);
        }

        if let Some(instance) = self.cached(&interface) {
            return Ok(instance);
        }

        let _guard = self.construction.lock();
        // 等待锁期间其他线程可能已完成构造
        if let Some(instance) = self.cached(&interface) {
            return Ok(instance);
        }

        let instance = self.construct(descriptor, depth)?;
        self.singletons.write().insert(interface.id(), instance.clone());
        debug!("单例已创建: {}", interface);
        Ok(instance)
    }

    fn cached(&self, interface: &TypeInfo) -> Option<Instance> {
        self.singletons.read().get(&interface.id()).cloned()
    }

    fn construct(
        &self,
        descriptor: &ComponentDescriptor,
        depth: usize,
    ) -> Result<Instance, DependencyError> {
        let mut dependencies = ResolvedDependencies::new();
        for spec in descriptor.dependencies() {
            let instance = self.resolve_at(spec.interface, depth + 1)?;
            dependencies.insert(spec.name, instance);
        }
        descriptor.create(dependencies)
    }

    /// 检查已注册组件之间是否存在循环依赖
    ///
    /// 任一组件依赖未注册的接口时返回 `UnregisteredDependency`。
    pub fn check_circular(&self) -> Result<bool, DependencyError> {
        let graph = self.full_graph()?;
        Ok(graph.sweep().len() < graph.len())
    }

    /// 存在循环依赖时返回 `CycleDetected`
    pub fn ensure_acyclic(&self) -> Result<(), DependencyError> {
        let graph = self.full_graph()?;
        let visited = graph.sweep();
        if visited.len() == graph.len() {
            return Ok(());
        }

        let members: Vec<String> = graph
            .residual(&visited)
            .iter()
            .map(|node| node.short_name().to_string())
            .collect();
        warn!("检测到循环依赖: {}", members.join(", "));
        Err(DependencyError::CycleDetected { members })
    }

    fn full_graph(&self) -> Result<DependencyGraph, DependencyError> {
        let mut graph = DependencyGraph::new();
        for interface in &self.order {
            let dependencies = self.descriptors[&interface.id()].direct_dependencies();
            if let Some(missing) = dependencies
                .iter()
                .find(|dependency| !self.descriptors.contains_key(&dependency.id()))
            {
                return Err(DependencyError::unregistered(missing.short_name()));
            }
            graph.add_node(*interface, dependencies);
        }
        Ok(graph)
    }

    /// 按依赖顺序解析一组目标接口
    ///
    /// 目标的每个传递依赖都排在目标之前。非目标依赖参与排序但不出现在结果中。
    /// 本方法不检测循环：闭包有环时，环上的目标会被跳过并记录警告，
    /// 需要快速失败的调用方应先调用 [`Self::ensure_acyclic`]。
    pub fn resolve_with_order(&self, targets: &[TypeInfo]) -> Result<Vec<Instance>, DependencyError> {
        let mut target_ids = HashSet::new();
        let roots: Vec<TypeInfo> = targets
            .iter()
            .filter(|target| target_ids.insert(target.id()))
            .copied()
            .collect();

        let graph = self.closure(&roots)?;
        let visited = graph.sweep();
        if visited.len() < graph.len() {
            let skipped: Vec<String> = graph
                .residual(&visited)
                .iter()
                .map(|node| node.short_name().to_string())
                .collect();
            warn!("依赖闭包中存在循环，以下组件未参与排序: {}", skipped.join(", "));
        }

        let ordered: Vec<TypeInfo> = visited
            .into_iter()
            .rev()
            .filter(|node| target_ids.contains(&node.id()))
            .collect();
        info!(
            "解析顺序: [{}]",
            ordered
                .iter()
                .map(|node| node.short_name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        ordered
            .into_iter()
            .map(|interface| self.resolve_instance(interface))
            .collect()
    }

    /// 从根节点出发广度优先计算依赖闭包
    fn closure(&self, roots: &[TypeInfo]) -> Result<DependencyGraph, DependencyError> {
        let mut graph = DependencyGraph::new();
        let mut seen: HashSet<TypeId> = roots.iter().map(TypeInfo::id).collect();
        let mut queue: VecDeque<TypeInfo> = roots.iter().copied().collect();

        while let Some(interface) = queue.pop_front() {
            let descriptor = self
                .descriptors
                .get(&interface.id())
                .ok_or_else(|| DependencyError::unregistered(interface.short_name()))?;

            let dependencies = descriptor.direct_dependencies();
            for dependency in &dependencies {
                if seen.insert(dependency.id()) {
                    queue.push_back(*dependency);
                }
            }
            graph.add_node(interface, dependencies);
        }

        Ok(graph)
    }

    /// 获取统计信息
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            registered_components: self.descriptors.len(),
            active_singletons: self.singletons.read().len(),
        }
    }
}

impl Default for DependencyContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DependencyContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyContainer")
            .field("config", &self.config)
            .field("components", &self.order)
            .field("stats", &self.stats())
            .finish()
    }
}

impl ComponentRegistry for DependencyContainer {
    fn register(&mut self, descriptor: ComponentDescriptor) -> Result<(), DependencyError> {
        Self::register(self, descriptor)
    }

    fn is_registered_by_type_id(&self, type_id: TypeId) -> bool {
        self.descriptors.contains_key(&type_id)
    }

    fn registered_components(&self) -> Vec<&ComponentDescriptor> {
        self.order
            .iter()
            .map(|interface| &self.descriptors[&interface.id()])
            .collect()
    }
}

impl ComponentResolver for DependencyContainer {
    fn resolve_instance(&self, interface: TypeInfo) -> Result<Instance, DependencyError> {
        Self::resolve_instance(self, interface)
    }

    fn resolve_with_order(&self, targets: &[TypeInfo]) -> Result<Vec<Instance>, DependencyError> {
        Self::resolve_with_order(self, targets)
    }

    fn check_circular(&self) -> Result<bool, DependencyError> {
        Self::check_circular(self)
    }
}
