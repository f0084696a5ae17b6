//! 骨骼层级和骨骼删除

mod bone;
mod editor;
mod skeleton;

pub use bone::Bone;
pub use editor::{remove_bone, BoneRemap};
pub use skeleton::Skeleton;
