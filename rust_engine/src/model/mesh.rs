//! 蒙皮网格

use crate::animation::AnimationClip;
use crate::skeleton::Skeleton;
use crate::{PrunerError, Result};

use super::Geometry;

/// 蒙皮网格（独占其骨骼）
#[derive(Clone, Debug, PartialEq)]
pub struct SkinnedMesh {
    pub name: String,
    pub geometry: Geometry,
    pub skeleton: Skeleton,
    pub animations: Vec<AnimationClip>,
}

impl SkinnedMesh {
    pub fn new(name: impl Into<String>, geometry: Geometry, skeleton: Skeleton) -> Self {
        Self {
            name: name.into(),
            geometry,
            skeleton,
            animations: Vec::new(),
        }
    }

    pub fn with_animations(mut self, animations: Vec<AnimationClip>) -> Self {
        self.animations = animations;
        self
    }

    /// 输入前置条件检查：缓冲区等长、带权重的槽位引用有效骨骼
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;

        let bone_count = self.skeleton.bone_count();
        for weight in &self.geometry.skin {
            for (bone, w) in weight.bones.iter().zip(weight.weights.iter()) {
                if *w != 0.0 && *bone as usize >= bone_count {
                    return Err(PrunerError::BoneIndexOutOfRange {
                        index: *bone as usize,
                        bone_count,
                    });
                }
            }
        }
        Ok(())
    }
}
