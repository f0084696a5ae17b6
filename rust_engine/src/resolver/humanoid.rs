//! VRM 人形骨骼映射

use std::collections::HashMap;

use serde_json::Value;

use crate::model::{NodeId, SkinnedMesh};
use crate::Result;

use super::{uses_vrm1, BoneResolver, ResolvedBones};

/// 通过 VRM humanoid 扩展把语义骨骼名（如 `leftUpperLeg`）映射到节点
#[derive(Debug, Clone, Default)]
pub struct HumanoidResolver {
    mapping: HashMap<String, NodeId>,
}

impl HumanoidResolver {
    pub fn new(mapping: HashMap<String, NodeId>) -> Self {
        Self { mapping }
    }

    /// 从 glTF JSON 读取映射
    ///
    /// 声明了 `VRMC_vrm` 且有 humanBones 时只使用 VRM 1.0 映射，
    /// 否则回退到 VRM 0.x 的 `extensions.VRM.humanoid.humanBones` 数组。
    pub fn from_document(document: &Value) -> Self {
        let mut mapping = HashMap::new();

        if uses_vrm1(document) {
            if let Some(human_bones) = document
                .pointer("/extensions/VRMC_vrm/humanoid/humanBones")
                .and_then(Value::as_object)
            {
                for (bone_name, value) in human_bones {
                    if let Some(node) = value.get("node").and_then(Value::as_u64) {
                        mapping.insert(bone_name.clone(), NodeId(node as usize));
                    }
                }
                return Self { mapping };
            }
        }

        if let Some(human_bones) = document
            .pointer("/extensions/VRM/humanoid/humanBones")
            .and_then(Value::as_array)
        {
            for value in human_bones {
                let bone_name = value.get("bone").and_then(Value::as_str);
                let node = value.get("node").and_then(Value::as_u64);
                if let (Some(bone_name), Some(node)) = (bone_name, node) {
                    mapping.insert(bone_name.to_string(), NodeId(node as usize));
                }
            }
        }

        Self { mapping }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        Ok(Self::from_document(&document))
    }

    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.mapping.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

impl BoneResolver for HumanoidResolver {
    fn resolve(&self, _mesh: &SkinnedMesh, names: &[&str]) -> ResolvedBones {
        names
            .iter()
            .map(|&name| (name.to_string(), self.get(name)))
            .collect()
    }
}
