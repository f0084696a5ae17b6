//! Bone Pruner - 按骨骼影响裁剪蒙皮网格
//!
//! 从已解析的蒙皮网格中移除被指定骨骼主导的顶点和三角形，
//! 并可选地从骨骼层级中删除这些骨骼：
//! - 顶点影响分类
//! - 顶点/索引缓冲区压缩
//! - 骨骼删除、子骨骼重挂接、骨骼索引重编号
//! - 骨骼名称解析（直接名称 / VRM 人形映射）

pub mod animation;
pub mod config;
pub mod model;
pub mod prune;
pub mod resolver;
pub mod skeleton;

pub use animation::{AnimationClip, BoneTrack, TrackKey, TrackProperty};
pub use config::{PrunerOptions, TargetBone};
pub use model::{Geometry, NodeId, SkinnedMesh, VertexAttribute, VertexWeight};
pub use prune::{BoneFailure, BoneInfluencePruner, PruneReport, PruneStage, PruneWarning};
pub use resolver::{detect_resolver, BoneResolver, HumanoidResolver, NameResolver};
pub use skeleton::{Bone, BoneRemap, Skeleton};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrunerError {
    #[error("attribute `{attribute}` has {actual} vertices, expected {expected}")]
    InconsistentAttribute {
        attribute: String,
        expected: usize,
        actual: usize,
    },

    #[error("index buffer length {0} is not a multiple of 3")]
    InvalidIndexBuffer(usize),

    #[error("triangle index {index} out of range (vertex count {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("keep mask has {actual} entries, expected {expected}")]
    KeepMaskLength { expected: usize, actual: usize },

    #[error("cannot remove root bone `{bone}`: no parent to reparent children to")]
    RootBoneRemoval { bone: String },

    #[error("bone index {index} out of range (bone count {bone_count})")]
    BoneIndexOutOfRange { index: usize, bone_count: usize },

    #[error("invalid skeleton: {0}")]
    InvalidSkeleton(String),

    #[error("invalid influence threshold {0}")]
    InvalidThreshold(f32),

    #[error("invalid track key `{0}`")]
    InvalidTrackKey(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PrunerError>;
