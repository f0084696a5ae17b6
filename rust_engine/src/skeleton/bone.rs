//! 骨骼节点

use crate::model::NodeId;

/// 骨骼节点
///
/// 父子关系以骨骼数组索引表示，不持有引用。
#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    pub name: String,
    /// 对应的场景节点
    pub node: NodeId,
    pub parent: Option<usize>,
    /// 有序子骨骼
    pub children: Vec<usize>,
}

impl Bone {
    pub fn new(name: impl Into<String>, node: NodeId) -> Self {
        Self {
            name: name.into(),
            node,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// 末端骨骼（无子骨骼）
    pub fn is_end(&self) -> bool {
        self.children.is_empty()
    }
}
