//! 按骨骼影响裁剪顶点
//!
//! 分类 -> 压缩 -> （可选）删除骨骼，按目标骨骼顺序依次执行。

mod classifier;
mod compactor;
mod pruner;
mod report;

pub use classifier::{classify, count_duplicate_slots};
pub use compactor::{compact, Compacted, VertexRemap};
pub use pruner::BoneInfluencePruner;
pub use report::{BoneFailure, PruneReport, PruneStage, PruneWarning};
