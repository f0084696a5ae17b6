//! 骨骼名称解析
//!
//! 名称 -> 场景节点。解析失败不是错误，对应条目为 `None`。

mod humanoid;
mod name;

pub use humanoid::HumanoidResolver;
pub use name::NameResolver;

use serde_json::Value;

use crate::model::{NodeId, SkinnedMesh};

/// 解析结果，顺序与请求的名称一致
pub type ResolvedBones = Vec<(String, Option<NodeId>)>;

/// 骨骼名称解析器
pub trait BoneResolver: Send + Sync {
    fn resolve(&self, mesh: &SkinnedMesh, names: &[&str]) -> ResolvedBones;
}

/// 是否声明了 VRM 1.0 扩展
pub(crate) fn uses_vrm1(document: &Value) -> bool {
    document
        .get("extensionsUsed")
        .and_then(Value::as_array)
        .map(|used| used.iter().any(|ext| ext.as_str() == Some("VRMC_vrm")))
        .unwrap_or(false)
}

/// 文档是否为 VRM（0.x 或 1.0）
pub fn is_vrm(document: &Value) -> bool {
    uses_vrm1(document) || document.pointer("/extensions/VRM").is_some()
}

/// 根据 glTF 文档选择解析器：VRM 使用人形映射，否则按骨骼名称匹配
pub fn detect_resolver(document: &Value) -> Box<dyn BoneResolver> {
    if is_vrm(document) {
        let resolver = HumanoidResolver::from_document(document);
        log::debug!("VRM 文档，人形骨骼映射 {} 项", resolver.len());
        Box::new(resolver)
    } else {
        Box::new(NameResolver)
    }
}
