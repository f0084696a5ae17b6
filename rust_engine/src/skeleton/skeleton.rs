//! 骨骼层级

use glam::Mat4;
use std::collections::HashMap;

use crate::model::NodeId;
use crate::{PrunerError, Result};

use super::Bone;

/// 骨骼
///
/// `bones[i]` 与 `inverse_bind_matrices[i]` 一一对应，顶点的骨骼索引即数组下标。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Skeleton {
    bones: Vec<Bone>,
    inverse_bind_matrices: Vec<Mat4>,
    name_to_index: HashMap<String, usize>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从骨骼数组和逆绑定矩阵数组创建，并检查层级一致性
    pub fn from_parts(bones: Vec<Bone>, inverse_bind_matrices: Vec<Mat4>) -> Result<Self> {
        let mut skeleton = Self {
            bones,
            inverse_bind_matrices,
            name_to_index: HashMap::new(),
        };
        skeleton.validate()?;
        skeleton.rebuild_name_index();
        Ok(skeleton)
    }

    /// 添加骨骼，父骨骼必须已存在
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        node: NodeId,
        parent: Option<usize>,
        inverse_bind_matrix: Mat4,
    ) -> Result<usize> {
        let index = self.bones.len();
        if let Some(p) = parent {
            if p >= index {
                return Err(PrunerError::BoneIndexOutOfRange {
                    index: p,
                    bone_count: index,
                });
            }
            self.bones[p].children.push(index);
        }

        let mut bone = Bone::new(name, node);
        bone.parent = parent;
        self.name_to_index.entry(bone.name.clone()).or_insert(index);
        self.bones.push(bone);
        self.inverse_bind_matrices.push(inverse_bind_matrix);
        Ok(index)
    }

    /// 获取骨骼数量
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn inverse_bind_matrices(&self) -> &[Mat4] {
        &self.inverse_bind_matrices
    }

    /// 获取骨骼
    pub fn get_bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    /// 通过名称查找骨骼（同名时取第一个）
    pub fn find_bone_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// 通过场景节点查找骨骼
    pub fn find_bone_by_node(&self, node: NodeId) -> Option<usize> {
        self.bones.iter().position(|b| b.node == node)
    }

    /// 根骨骼索引
    pub fn root_indices(&self) -> Vec<usize> {
        (0..self.bones.len())
            .filter(|&i| self.bones[i].parent.is_none())
            .collect()
    }

    /// 检查逆绑定矩阵数量和父子链接
    pub fn validate(&self) -> Result<()> {
        let bone_count = self.bones.len();
        if self.inverse_bind_matrices.len() != bone_count {
            return Err(PrunerError::InvalidSkeleton(format!(
                "{} bones but {} inverse bind matrices",
                bone_count,
                self.inverse_bind_matrices.len()
            )));
        }

        for (i, bone) in self.bones.iter().enumerate() {
            if let Some(p) = bone.parent {
                if p >= bone_count || p == i {
                    return Err(PrunerError::InvalidSkeleton(format!(
                        "bone `{}` has invalid parent {}",
                        bone.name, p
                    )));
                }
                let listed = self.bones[p].children.iter().filter(|&&c| c == i).count();
                if listed != 1 {
                    return Err(PrunerError::InvalidSkeleton(format!(
                        "bone `{}` listed {} times as child of `{}`",
                        bone.name, listed, self.bones[p].name
                    )));
                }
            }
            for &c in &bone.children {
                if c >= bone_count || self.bones[c].parent != Some(i) {
                    return Err(PrunerError::InvalidSkeleton(format!(
                        "bone `{}` lists {} as child without matching parent link",
                        bone.name, c
                    )));
                }
            }
        }

        // 沿父链最多走 bone_count 步，超出即存在环
        for start in 0..bone_count {
            let mut current = self.bones[start].parent;
            let mut steps = 0;
            while let Some(p) = current {
                steps += 1;
                if steps > bone_count {
                    return Err(PrunerError::InvalidSkeleton(format!(
                        "cycle in hierarchy at bone `{}`",
                        self.bones[start].name
                    )));
                }
                current = self.bones[p].parent;
            }
        }

        Ok(())
    }

    fn rebuild_name_index(&mut self) {
        self.name_to_index.clear();
        for (i, bone) in self.bones.iter().enumerate() {
            self.name_to_index.entry(bone.name.clone()).or_insert(i);
        }
    }
}
