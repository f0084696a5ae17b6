use crate::model::SkinnedMesh;

use super::{BoneResolver, ResolvedBones};

/// 在网格自身的骨骼中按名称匹配
#[derive(Debug, Clone, Copy, Default)]
pub struct NameResolver;

impl BoneResolver for NameResolver {
    fn resolve(&self, mesh: &SkinnedMesh, names: &[&str]) -> ResolvedBones {
        let skeleton = &mesh.skeleton;
        names
            .iter()
            .map(|&name| {
                let node = skeleton
                    .find_bone_by_name(name)
                    .and_then(|i| skeleton.get_bone(i))
                    .map(|bone| bone.node);
                (name.to_string(), node)
            })
            .collect()
    }
}
