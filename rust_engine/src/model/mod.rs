//! 蒙皮网格数据

mod geometry;
mod mesh;

pub use geometry::Geometry;
pub use mesh::SkinnedMesh;

/// 每个顶点的骨骼影响数量
pub const MAX_INFLUENCES: usize = 4;

/// 场景节点标识（glTF 节点索引）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// 顶点骨骼权重（固定 4 个影响槽）
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VertexWeight {
    pub bones: [u32; MAX_INFLUENCES],
    pub weights: [f32; MAX_INFLUENCES],
}

impl VertexWeight {
    pub fn new(bones: [u32; MAX_INFLUENCES], weights: [f32; MAX_INFLUENCES]) -> Self {
        Self { bones, weights }
    }

    /// 单骨骼权重
    pub fn single(bone: u32) -> Self {
        Self {
            bones: [bone, 0, 0, 0],
            weights: [1.0, 0.0, 0.0, 0.0],
        }
    }

    /// 任一引用该骨骼的槽位权重严格大于阈值
    pub fn exceeds(&self, bone: u32, threshold: f32) -> bool {
        self.bones
            .iter()
            .zip(self.weights.iter())
            .any(|(&b, &w)| b == bone && w > threshold)
    }

    /// 引用该骨骼且权重非零的槽位数
    pub fn slots_referencing(&self, bone: u32) -> usize {
        self.bones
            .iter()
            .zip(self.weights.iter())
            .filter(|&(&b, &w)| b == bone && w != 0.0)
            .count()
    }

    pub fn total_weight(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// 归一化权重，总和为 0 时保持不变
    pub fn normalize(&mut self) {
        let total = self.total_weight();
        if total > 0.0 {
            for w in &mut self.weights {
                *w /= total;
            }
        }
    }
}

/// 任意维度的附加顶点属性（法线、UV、颜色……）
#[derive(Clone, Debug, PartialEq)]
pub struct VertexAttribute {
    pub item_size: usize,
    pub data: Vec<f32>,
}

impl VertexAttribute {
    pub fn new(item_size: usize, data: Vec<f32>) -> Self {
        Self { item_size, data }
    }

    /// 元素数量（不完整的尾部分量不计入）
    pub fn count(&self) -> usize {
        if self.item_size == 0 {
            0
        } else {
            self.data.len() / self.item_size
        }
    }

    /// 第 index 个元素的分量
    pub fn item(&self, index: usize) -> &[f32] {
        let start = index * self.item_size;
        &self.data[start..start + self.item_size]
    }
}
