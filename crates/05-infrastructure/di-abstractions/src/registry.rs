//! 类别注册表
//!
//! 每个类别（配置、控制器、服务）维护一个只增不减的成员集合。
//! 成员在注册时携带两个函数：生成组件描述符，以及把解析出的实例
//! 转换为类别要求的基础能力（例如 `Arc<dyn Service>`）。

use crate::factory::ComponentDescriptor;
use crate::resolver::Instance;
use infrastructure_common::{InvalidReason, Lifetime, RegistryError, TypeInfo};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// 注册类别
pub trait Category: Send + Sync + 'static {
    /// 类别名称，用于日志和错误信息
    const NAME: &'static str;

    /// 类别成员必须具备的基础能力
    type Capability: ?Sized + Send + Sync + 'static;
}

/// 类别成员
pub struct Registrant<C: Category> {
    type_info: TypeInfo,
    descriptor: fn(Lifetime) -> ComponentDescriptor,
    upcast: fn(Instance) -> Option<Arc<C::Capability>>,
    _category: PhantomData<fn() -> C>,
}

impl<C: Category> Registrant<C> {
    /// 为类型 `T` 创建成员
    pub fn new<T: 'static>(
        descriptor: fn(Lifetime) -> ComponentDescriptor,
        upcast: fn(Instance) -> Option<Arc<C::Capability>>,
    ) -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            descriptor,
            upcast,
            _category: PhantomData,
        }
    }

    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// 以给定生命周期生成组件描述符
    pub fn descriptor(&self, lifetime: Lifetime) -> ComponentDescriptor {
        (self.descriptor)(lifetime)
    }

    /// 把实例转换为类别能力，类型不符时返回 `None`
    pub fn upcast(&self, instance: Instance) -> Option<Arc<C::Capability>> {
        (self.upcast)(instance)
    }

    /// 擦除类别，作为通用候选项
    pub fn into_candidate(self) -> Candidate {
        Candidate::Type(ErasedRegistrant {
            type_info: self.type_info,
            category: C::NAME,
            inner: Arc::new(self),
        })
    }
}

impl<C: Category> Clone for Registrant<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Category> Copy for Registrant<C> {}

impl<C: Category> std::fmt::Debug for Registrant<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registrant")
            .field("category", &C::NAME)
            .field("type_info", &self.type_info)
            .finish()
    }
}

/// 擦除类别后的成员
#[derive(Clone)]
pub struct ErasedRegistrant {
    type_info: TypeInfo,
    category: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ErasedRegistrant {
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// 创建时所属的类别
    pub fn category(&self) -> &'static str {
        self.category
    }

    fn downcast<C: Category>(&self) -> Option<Registrant<C>> {
        self.inner.downcast_ref::<Registrant<C>>().copied()
    }
}

impl std::fmt::Debug for ErasedRegistrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErasedRegistrant")
            .field("type_info", &self.type_info)
            .field("category", &self.category)
            .finish()
    }
}

/// 注册候选项
///
/// 只有类型会被收集；函数原样返回，其他值被拒绝。
#[derive(Debug, Clone)]
pub enum Candidate {
    /// 类型
    Type(ErasedRegistrant),
    /// 函数（不收集）
    Function(&'static str),
    /// 其他值
    Value(String),
}

impl Candidate {
    /// 候选项的显示名称
    pub fn display_name(&self) -> String {
        match self {
            Self::Type(registrant) => registrant.type_info.short_name().to_string(),
            Self::Function(name) => (*name).to_string(),
            Self::Value(value) => value.clone(),
        }
    }
}

/// 类别注册表
///
/// 保持注册顺序，同一类型只能注册一次。
pub struct TypeRegistry<C: Category> {
    members: Vec<Registrant<C>>,
    index: HashMap<TypeId, usize>,
}

impl<C: Category> TypeRegistry<C> {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// 类别名称
    pub fn category(&self) -> &'static str {
        C::NAME
    }

    /// 注册成员，返回其类型信息
    pub fn register(&mut self, registrant: Registrant<C>) -> Result<TypeInfo, RegistryError> {
        let type_info = registrant.type_info;
        if self.index.contains_key(&type_info.id()) {
            return Err(RegistryError::AlreadyRegistered {
                category: C::NAME.to_string(),
                type_name: type_info.short_name().to_string(),
            });
        }

        self.index.insert(type_info.id(), self.members.len());
        self.members.push(registrant);
        Ok(type_info)
    }

    /// 注册任意候选项
    ///
    /// 函数原样返回且不收集；非类型值和不具备类别能力的类型被拒绝。
    pub fn register_candidate(&mut self, candidate: Candidate) -> Result<Candidate, RegistryError> {
        match candidate {
            Candidate::Function(_) => Ok(candidate),
            Candidate::Value(value) => Err(RegistryError::InvalidRegistrant {
                category: C::NAME.to_string(),
                candidate: value,
                reason: InvalidReason::NotAType,
            }),
            Candidate::Type(erased) => {
                let registrant =
                    erased
                        .downcast::<C>()
                        .ok_or_else(|| RegistryError::InvalidRegistrant {
                            category: C::NAME.to_string(),
                            candidate: erased.type_info.short_name().to_string(),
                            reason: InvalidReason::MissingCapability,
                        })?;
                self.register(registrant)?;
                Ok(Candidate::Type(erased))
            }
        }
    }

    pub fn contains(&self, type_info: &TypeInfo) -> bool {
        self.index.contains_key(&type_info.id())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// 按注册顺序遍历成员
    pub fn iter(&self) -> impl Iterator<Item = &Registrant<C>> {
        self.members.iter()
    }

    /// 按注册顺序返回成员的类型信息
    pub fn type_infos(&self) -> Vec<TypeInfo> {
        self.members.iter().map(|r| r.type_info).collect()
    }

    pub fn get(&self, type_info: &TypeInfo) -> Option<&Registrant<C>> {
        self.index.get(&type_info.id()).map(|&idx| &self.members[idx])
    }

    /// 按实例的具体类型查找成员
    pub fn find(&self, instance: &Instance) -> Option<&Registrant<C>> {
        let any: &dyn Any = &**instance;
        self.index.get(&any.type_id()).map(|&idx| &self.members[idx])
    }

    /// 按实例的具体类型查找成员并转换为类别能力
    pub fn upcast(&self, instance: &Instance) -> Option<Arc<C::Capability>> {
        self.find(instance)?.upcast(instance.clone())
    }
}

impl<C: Category> Default for TypeRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Category> std::fmt::Debug for TypeRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("category", &C::NAME)
            .field("members", &self.type_infos())
            .finish()
    }
}
