//! 骨骼影响裁剪流程

use std::collections::HashMap;

use rayon::prelude::*;

use crate::config::{get_config, PrunerOptions};
use crate::model::{Geometry, NodeId, SkinnedMesh};
use crate::resolver::BoneResolver;
use crate::skeleton::{remove_bone, Skeleton};
use crate::Result;

use super::{classify, compact, count_duplicate_slots};
use super::{BoneFailure, PruneReport, PruneStage, PruneWarning};

/// 已解析的目标骨骼
struct ResolvedTarget {
    name: String,
    node: NodeId,
    threshold: f32,
}

/// 骨骼影响裁剪器
#[derive(Debug, Clone)]
pub struct BoneInfluencePruner {
    options: PrunerOptions,
}

impl BoneInfluencePruner {
    pub fn new(options: PrunerOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &PrunerOptions {
        &self.options
    }

    /// 并行处理多个网格，每个网格的结果独立
    pub fn prune_all(
        &self,
        meshes: &mut [SkinnedMesh],
        resolver: &dyn BoneResolver,
    ) -> Vec<Result<PruneReport>> {
        meshes
            .par_iter_mut()
            .map(|mesh| self.prune_mesh(mesh, resolver))
            .collect()
    }

    /// 处理单个网格
    ///
    /// 解析 -> 逐目标分类并压缩几何 -> （可选）逐目标删除骨骼。
    /// 输入缓冲区不一致时直接返回错误，网格保持不变；
    /// 其余问题记录在报告中，结果整体替换到网格上。
    pub fn prune_mesh(
        &self,
        mesh: &mut SkinnedMesh,
        resolver: &dyn BoneResolver,
    ) -> Result<PruneReport> {
        mesh.validate()?;

        let mut report = PruneReport::new(mesh.name.clone(), mesh.geometry.vertex_count());
        let mut stage = PruneStage::Idle;

        enter(&mut stage, PruneStage::Resolving, &mesh.name);
        let targets = self.resolve_targets(mesh, resolver, &mut report);

        let mut geometry: Option<Geometry> = None;
        for target in &targets {
            let Some(bone_index) = mesh.skeleton.find_bone_by_node(target.node) else {
                continue;
            };
            let current = geometry.as_ref().unwrap_or(&mesh.geometry);

            enter(&mut stage, PruneStage::Classifying, &mesh.name);
            let bone = bone_index as u32;
            let duplicates = count_duplicate_slots(&current.skin, bone);
            if duplicates > 0 {
                report.warn(PruneWarning::DuplicateInfluenceSlots {
                    name: target.name.clone(),
                    vertices: duplicates,
                });
            }
            let keep = classify(&current.skin, bone, target.threshold);

            enter(&mut stage, PruneStage::Compacting, &mesh.name);
            let compacted = compact(current, &keep)?;
            log::debug!(
                "[{}] `{}` (threshold {}): removed {} vertices, {} triangles",
                mesh.name,
                target.name,
                target.threshold,
                compacted.remap.removed_count(),
                compacted.removed_triangles
            );

            report.removed_vertices += compacted.remap.removed_count();
            report.removed_triangles += compacted.removed_triangles;
            report.vertex_remap = report.vertex_remap.then(&compacted.remap);
            geometry = Some(compacted.geometry);
        }

        let mut skeleton: Option<Skeleton> = None;
        let mut animations = None;
        if self.options.remove_bones {
            for target in &targets {
                enter(&mut stage, PruneStage::EditingSkeleton, &mesh.name);

                // 每次删除后索引都会变化，按节点重新查找
                let current = skeleton.as_ref().unwrap_or(&mesh.skeleton);
                let Some(bone_index) = current.find_bone_by_node(target.node) else {
                    report.warn(PruneWarning::NotInSkeleton {
                        name: target.name.clone(),
                        node: target.node,
                    });
                    continue;
                };

                match remove_bone(current, bone_index) {
                    Ok((edited, remap)) => {
                        let g = geometry.get_or_insert_with(|| mesh.geometry.clone());
                        g.skin = remap.remap_skin(&g.skin);
                        let clips = animations.as_ref().unwrap_or(&mesh.animations);
                        animations = Some(remap.remap_clips(clips));
                        skeleton = Some(edited);
                        report.removed_bones.push(target.name.clone());
                    }
                    Err(error) => {
                        log::error!("[{}] failed to remove bone `{}`: {}", mesh.name, target.name, error);
                        report.failures.push(BoneFailure {
                            name: target.name.clone(),
                            error,
                        });
                    }
                }
            }
        }

        if let Some(geometry) = geometry {
            mesh.geometry = geometry;
        }
        if let Some(skeleton) = skeleton {
            mesh.skeleton = skeleton;
        }
        if let Some(animations) = animations {
            mesh.animations = animations;
        }
        enter(&mut stage, PruneStage::Done, &mesh.name);

        if self.options.debug_log {
            log::info!(
                "[{}] pruned: {} vertices, {} triangles, bones removed {:?}, {} warnings, {} failures",
                report.mesh,
                report.removed_vertices,
                report.removed_triangles,
                report.removed_bones,
                report.warnings.len(),
                report.failures.len()
            );
        }

        Ok(report)
    }

    /// 一次性解析所有目标名，按名称取回结果
    ///
    /// 未解析（含解析器未返回）或不在骨骼中的条目记录警告后跳过。
    fn resolve_targets(
        &self,
        mesh: &SkinnedMesh,
        resolver: &dyn BoneResolver,
        report: &mut PruneReport,
    ) -> Vec<ResolvedTarget> {
        let names = self.options.target_names();
        let resolved: HashMap<String, Option<NodeId>> =
            resolver.resolve(mesh, &names).into_iter().collect();
        let default = self.options.default_influence_threshold;

        let mut targets = Vec::with_capacity(names.len());
        for entry in &self.options.target_bones {
            let name = entry.name().to_string();
            let Some(node) = resolved.get(&name).copied().flatten() else {
                report.warn(PruneWarning::UnresolvedBone { name });
                continue;
            };
            if mesh.skeleton.find_bone_by_node(node).is_none() {
                report.warn(PruneWarning::NotInSkeleton { name, node });
                continue;
            }
            targets.push(ResolvedTarget {
                name,
                node,
                threshold: entry.threshold_or(default),
            });
        }
        targets
    }
}

impl Default for BoneInfluencePruner {
    /// 使用全局默认选项
    fn default() -> Self {
        Self {
            options: get_config(),
        }
    }
}

fn enter(stage: &mut PruneStage, next: PruneStage, mesh: &str) {
    log::debug!("[{}] {:?} -> {:?}", mesh, stage, next);
    *stage = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VertexWeight;
    use crate::resolver::{NameResolver, ResolvedBones};
    use crate::PrunerError;
    use glam::{Mat4, Vec3};

    /// hips(0) -> leg(1) -> foot(2)，每个顶点只受一根骨骼影响
    fn leg_mesh() -> SkinnedMesh {
        let mut skeleton = Skeleton::new();
        let hips = skeleton.add_bone("hips", NodeId(0), None, Mat4::IDENTITY).unwrap();
        let leg = skeleton.add_bone("leg", NodeId(1), Some(hips), Mat4::IDENTITY).unwrap();
        skeleton.add_bone("foot", NodeId(2), Some(leg), Mat4::IDENTITY).unwrap();

        let geometry = Geometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            vec![
                VertexWeight::single(0),
                VertexWeight::single(0),
                VertexWeight::new([1, 2, 0, 0], [0.5, 0.5, 0.0, 0.0]),
                VertexWeight::single(2),
            ],
        )
        .with_indices(vec![0, 1, 2, 1, 2, 3]);

        SkinnedMesh::new("body", geometry, skeleton)
    }

    #[test]
    fn test_rejects_inconsistent_mesh_before_mutation() {
        let mut mesh = leg_mesh();
        mesh.geometry.skin.pop();
        let before = mesh.geometry.clone();

        let pruner = BoneInfluencePruner::new(PrunerOptions::new(vec!["foot"])).unwrap();
        let result = pruner.prune_mesh(&mut mesh, &NameResolver);

        assert!(matches!(result, Err(PrunerError::InconsistentAttribute { .. })));
        assert_eq!(mesh.geometry, before);
    }

    #[test]
    fn test_new_rejects_invalid_threshold() {
        let options = PrunerOptions::new(vec!["foot"]).with_default_threshold(1.0);
        assert!(BoneInfluencePruner::new(options).is_err());
    }

    #[test]
    fn test_sequential_targets_compose() {
        let mut mesh = leg_mesh();
        let pruner = BoneInfluencePruner::new(
            PrunerOptions::new(vec![("foot", 0.9), ("leg", 0.4)]),
        )
        .unwrap();
        let report = pruner.prune_mesh(&mut mesh, &NameResolver).unwrap();

        // foot 删除顶点 3，leg 删除顶点 2
        assert_eq!(mesh.geometry.vertex_count(), 2);
        assert_eq!(report.removed_vertices, 2);
        assert_eq!(report.removed_triangles, 2);
        assert_eq!(mesh.geometry.indices.as_deref(), Some(&[][..]));
        assert_eq!(report.vertex_remap.get(1), Some(1));
        assert_eq!(report.vertex_remap.get(3), None);
        assert!(report.is_clean());
    }

    #[test]
    fn test_root_removal_is_reported_and_others_continue() {
        let mut mesh = leg_mesh();
        let options = PrunerOptions::new(vec![("hips", 1.0), ("foot", 1.0)]).with_remove_bones(true);
        let pruner = BoneInfluencePruner::new(options).unwrap();
        let report = pruner.prune_mesh(&mut mesh, &NameResolver).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "hips");
        assert!(matches!(report.failures[0].error, PrunerError::RootBoneRemoval { .. }));
        assert_eq!(report.removed_bones, vec!["foot".to_string()]);
        assert_eq!(mesh.skeleton.bone_count(), 2);
        assert!(mesh.skeleton.find_bone_by_name("hips").is_some());
    }

    #[test]
    fn test_duplicate_entry_warns_on_second_removal() {
        let mut mesh = leg_mesh();
        let options = PrunerOptions::new(vec![("foot", 1.0), ("foot", 1.0)]).with_remove_bones(true);
        let pruner = BoneInfluencePruner::new(options).unwrap();
        let report = pruner.prune_mesh(&mut mesh, &NameResolver).unwrap();

        assert_eq!(report.removed_bones, vec!["foot".to_string()]);
        assert!(matches!(report.warnings[0], PruneWarning::NotInSkeleton { .. }));
    }

    #[test]
    fn test_removing_leg_then_foot_uses_fresh_indices() {
        let mut mesh = leg_mesh();
        let options = PrunerOptions::new(vec![("leg", 1.0), ("foot", 1.0)]).with_remove_bones(true);
        let pruner = BoneInfluencePruner::new(options).unwrap();
        let report = pruner.prune_mesh(&mut mesh, &NameResolver).unwrap();

        assert_eq!(report.removed_bones.len(), 2);
        assert_eq!(mesh.skeleton.bone_count(), 1);
        assert_eq!(mesh.skeleton.inverse_bind_matrices().len(), 1);
        // 只受 leg/foot 影响的顶点变为无权重
        assert_eq!(mesh.geometry.skin[2].weights, [0.0; 4]);
        assert_eq!(mesh.geometry.skin[3].weights, [0.0; 4]);
        assert_eq!(mesh.geometry.skin[0], VertexWeight::single(0));
    }

    /// 按名称解析，但结果顺序相反且丢掉最后请求的名称
    struct ShuffledResolver;

    impl BoneResolver for ShuffledResolver {
        fn resolve(&self, mesh: &SkinnedMesh, names: &[&str]) -> ResolvedBones {
            let mut resolved = NameResolver.resolve(mesh, &names[..names.len() - 1]);
            resolved.reverse();
            resolved
        }
    }

    #[test]
    fn test_thresholds_follow_names_not_resolver_order() {
        let mut mesh = leg_mesh();
        let options = PrunerOptions::new(vec![("hips", 0.0), ("foot", 1.0), ("leg", 0.0)]);
        let pruner = BoneInfluencePruner::new(options).unwrap();
        let report = pruner.prune_mesh(&mut mesh, &ShuffledResolver).unwrap();

        // hips 阈值 0 删除顶点 0、1；foot 阈值 1 不删除；leg 未返回
        assert_eq!(report.removed_vertices, 2);
        assert_eq!(mesh.geometry.skin[0].bones, [1, 2, 0, 0]);
        assert_eq!(mesh.geometry.skin[1], VertexWeight::single(2));
        assert_eq!(
            report.warnings,
            vec![PruneWarning::UnresolvedBone {
                name: "leg".to_string()
            }]
        );
    }

    #[test]
    fn test_duplicate_slots_are_reported() {
        let mut mesh = leg_mesh();
        mesh.geometry.skin[2] = VertexWeight::new([2, 2, 1, 0], [0.3, 0.3, 0.4, 0.0]);
        let pruner = BoneInfluencePruner::new(PrunerOptions::new(vec![("foot", 0.35)])).unwrap();
        let report = pruner.prune_mesh(&mut mesh, &NameResolver).unwrap();

        assert_eq!(
            report.warnings,
            vec![PruneWarning::DuplicateInfluenceSlots {
                name: "foot".to_string(),
                vertices: 1
            }]
        );
        // 0.3 + 0.3 不累加，只有顶点 3 被删除
        assert_eq!(report.removed_vertices, 1);
        assert_eq!(mesh.geometry.vertex_count(), 3);
    }
}
