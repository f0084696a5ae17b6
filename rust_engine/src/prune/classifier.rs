//! 顶点影响分类

use crate::model::VertexWeight;

/// 计算保留掩码
///
/// 任一槽位引用目标骨骼且权重严格大于阈值的顶点标记为删除（false）。
/// 不累加同一骨骼的多个槽位。
pub fn classify(skin: &[VertexWeight], target_bone: u32, threshold: f32) -> Vec<bool> {
    skin.iter()
        .map(|weight| !weight.exceeds(target_bone, threshold))
        .collect()
}

/// 多个槽位（权重非零）引用同一目标骨骼的顶点数
pub fn count_duplicate_slots(skin: &[VertexWeight], target_bone: u32) -> usize {
    skin.iter()
        .filter(|weight| weight.slots_referencing(target_bone) > 1)
        .count()
}
