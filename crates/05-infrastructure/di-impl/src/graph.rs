//! 依赖图与 Kahn 扫描
//!
//! 节点的入度定义为图内依赖它的节点数量。扫描从没有消费者的节点开始，
//! 每出队一个节点就递减其依赖的入度，因此访问顺序是"依赖方在前"。

use infrastructure_common::TypeInfo;
use std::any::TypeId;
use std::collections::{HashMap, HashSet, VecDeque};

/// 受限于一组节点的依赖图
#[derive(Debug, Default)]
pub(crate) struct DependencyGraph {
    nodes: Vec<TypeInfo>,
    edges: HashMap<TypeId, Vec<TypeInfo>>,
}

impl DependencyGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 加入节点及其直接依赖，重复加入的节点被忽略
    pub(crate) fn add_node(&mut self, node: TypeInfo, dependencies: Vec<TypeInfo>) {
        if self.edges.contains_key(&node.id()) {
            return;
        }
        self.nodes.push(node);
        self.edges.insert(node.id(), dependencies);
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 执行 Kahn 扫描，返回访问顺序
    ///
    /// 只统计两端都在图内的边。处在环上的节点以及只被环上节点依赖的节点
    /// 永远不会被访问。
    pub(crate) fn sweep(&self) -> Vec<TypeInfo> {
        let mut in_degree: HashMap<TypeId, usize> =
            self.nodes.iter().map(|node| (node.id(), 0)).collect();

        for dependencies in self.edges.values() {
            for dependency in dependencies {
                if let Some(degree) = in_degree.get_mut(&dependency.id()) {
                    *degree += 1;
                }
            }
        }

        let mut queue: VecDeque<TypeInfo> = self
            .nodes
            .iter()
            .filter(|node| in_degree[&node.id()] == 0)
            .copied()
            .collect();
        let mut visited = Vec::with_capacity(self.nodes.len());

        while let Some(node) = queue.pop_front() {
            visited.push(node);
            for dependency in &self.edges[&node.id()] {
                if let Some(degree) = in_degree.get_mut(&dependency.id()) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*dependency);
                    }
                }
            }
        }

        visited
    }

    /// 扫描后未被访问的节点，按加入顺序
    pub(crate) fn residual(&self, visited: &[TypeInfo]) -> Vec<TypeInfo> {
        let visited: HashSet<TypeId> = visited.iter().map(TypeInfo::id).collect();
        self.nodes
            .iter()
            .filter(|node| !visited.contains(&node.id()))
            .copied()
            .collect()
    }
}
