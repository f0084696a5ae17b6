//! 骨骼删除与骨骼索引重编号

use crate::animation::AnimationClip;
use crate::model::VertexWeight;
use crate::{PrunerError, Result};

use super::Skeleton;

/// 删除一根骨骼后的索引映射
///
/// 大于被删索引的骨骼下移一位，被删索引本身映射为 `None`。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoneRemap {
    removed: usize,
}

impl BoneRemap {
    pub fn new(removed: usize) -> Self {
        Self { removed }
    }

    /// 被删除的原索引
    pub fn removed_index(&self) -> usize {
        self.removed
    }

    /// 原索引 -> 新索引
    pub fn get(&self, old: usize) -> Option<usize> {
        if old == self.removed {
            None
        } else if old > self.removed {
            Some(old - 1)
        } else {
            Some(old)
        }
    }

    /// 重编号蒙皮索引
    ///
    /// 引用被删骨骼的槽位置为索引 0、权重 0，随后重新归一化。
    /// 权重全为 0 的顶点保持无权重状态。
    pub fn remap_skin(&self, skin: &[VertexWeight]) -> Vec<VertexWeight> {
        skin.iter()
            .map(|weight| {
                let mut out = *weight;
                for slot in 0..out.bones.len() {
                    match self.get(out.bones[slot] as usize) {
                        Some(new) => out.bones[slot] = new as u32,
                        None => {
                            out.bones[slot] = 0;
                            out.weights[slot] = 0.0;
                        }
                    }
                }
                out.normalize();
                out
            })
            .collect()
    }

    /// 重编号动画轨道，被删骨骼的轨道整条丢弃
    pub fn remap_clips(&self, clips: &[AnimationClip]) -> Vec<AnimationClip> {
        clips
            .iter()
            .map(|clip| AnimationClip {
                name: clip.name.clone(),
                tracks: clip
                    .tracks
                    .iter()
                    .filter_map(|track| {
                        self.get(track.key.bone_index).map(|bone_index| {
                            let mut track = track.clone();
                            track.key.bone_index = bone_index;
                            track
                        })
                    })
                    .collect(),
            })
            .collect()
    }
}

/// 从骨骼中删除一根骨骼
///
/// 子骨骼按原顺序挂到被删骨骼的父骨骼上，占据被删骨骼在父骨骼子列表中的位置。
/// 逆绑定矩阵在同一位置删除。根骨骼没有可挂接的父骨骼，返回
/// [`PrunerError::RootBoneRemoval`]。
pub fn remove_bone(skeleton: &Skeleton, bone_index: usize) -> Result<(Skeleton, BoneRemap)> {
    let bone_count = skeleton.bone_count();
    let removed = skeleton
        .get_bone(bone_index)
        .ok_or(PrunerError::BoneIndexOutOfRange {
            index: bone_index,
            bone_count,
        })?;

    let parent = removed.parent.ok_or_else(|| PrunerError::RootBoneRemoval {
        bone: removed.name.clone(),
    })?;

    let remap = BoneRemap::new(bone_index);
    let mut bones = Vec::with_capacity(bone_count - 1);

    for (i, bone) in skeleton.bones().iter().enumerate() {
        if i == bone_index {
            continue;
        }
        let mut bone = bone.clone();

        let old_parent = bone.parent.map(|p| if p == bone_index { parent } else { p });
        bone.parent = old_parent.and_then(|p| remap.get(p));

        if i == parent {
            let mut children = Vec::with_capacity(bone.children.len() + removed.children.len());
            for &c in &bone.children {
                if c == bone_index {
                    children.extend_from_slice(&removed.children);
                } else {
                    children.push(c);
                }
            }
            bone.children = children;
        }
        bone.children = bone.children.iter().filter_map(|&c| remap.get(c)).collect();

        bones.push(bone);
    }

    let mut inverse_bind_matrices = skeleton.inverse_bind_matrices().to_vec();
    inverse_bind_matrices.remove(bone_index);

    let skeleton = Skeleton::from_parts(bones, inverse_bind_matrices)?;
    Ok((skeleton, remap))
}
