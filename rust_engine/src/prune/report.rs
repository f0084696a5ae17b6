//! 裁剪结果报告

use std::fmt;

use crate::model::NodeId;
use crate::PrunerError;

use super::VertexRemap;

/// 单个网格的处理阶段
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PruneStage {
    Idle,
    Resolving,
    Classifying,
    Compacting,
    EditingSkeleton,
    Done,
}

/// 可恢复的问题，不中断处理
#[derive(Clone, Debug, PartialEq)]
pub enum PruneWarning {
    /// 名称无法解析
    UnresolvedBone { name: String },
    /// 解析到的节点不是该网格骨骼中的骨骼
    NotInSkeleton { name: String, node: NodeId },
    /// 多个槽位引用同一目标骨骼（权重不累加）
    DuplicateInfluenceSlots { name: String, vertices: usize },
}

impl fmt::Display for PruneWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PruneWarning::UnresolvedBone { name } => {
                write!(f, "could not resolve bone `{}`", name)
            }
            PruneWarning::NotInSkeleton { name, node } => {
                write!(f, "bone `{}` resolved to node {} which is not in the skeleton", name, node.0)
            }
            PruneWarning::DuplicateInfluenceSlots { name, vertices } => {
                write!(f, "{} vertices reference bone `{}` in more than one slot", vertices, name)
            }
        }
    }
}

/// 单根骨骼删除失败
#[derive(Debug)]
pub struct BoneFailure {
    pub name: String,
    pub error: PrunerError,
}

/// 单个网格的裁剪结果
#[derive(Debug)]
pub struct PruneReport {
    pub mesh: String,
    pub removed_vertices: usize,
    pub removed_triangles: usize,
    /// 已从骨骼中删除的骨骼名（按删除顺序）
    pub removed_bones: Vec<String>,
    pub warnings: Vec<PruneWarning>,
    pub failures: Vec<BoneFailure>,
    /// 原顶点索引 -> 最终顶点索引
    pub vertex_remap: VertexRemap,
}

impl PruneReport {
    pub fn new(mesh: impl Into<String>, vertex_count: usize) -> Self {
        Self {
            mesh: mesh.into(),
            removed_vertices: 0,
            removed_triangles: 0,
            removed_bones: Vec::new(),
            warnings: Vec::new(),
            failures: Vec::new(),
            vertex_remap: VertexRemap::identity(vertex_count),
        }
    }

    /// 记录警告并输出日志
    pub(crate) fn warn(&mut self, warning: PruneWarning) {
        log::warn!("[{}] {}", self.mesh, warning);
        self.warnings.push(warning);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.failures.is_empty()
    }
}
