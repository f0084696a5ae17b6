//! 几何体压缩

use crate::model::{Geometry, VertexAttribute};
use crate::{PrunerError, Result};

/// 顶点索引映射（旧索引 -> 新索引，删除的顶点为 `None`）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexRemap {
    table: Vec<Option<u32>>,
    kept: usize,
}

impl VertexRemap {
    /// 按原顺序为保留的顶点分配连续的新索引
    pub fn from_mask(keep: &[bool]) -> Self {
        let mut next = 0u32;
        let table = keep
            .iter()
            .map(|&k| {
                if k {
                    next += 1;
                    Some(next - 1)
                } else {
                    None
                }
            })
            .collect();
        Self {
            table,
            kept: next as usize,
        }
    }

    pub fn identity(vertex_count: usize) -> Self {
        Self::from_mask(&vec![true; vertex_count])
    }

    pub fn get(&self, old: usize) -> Option<u32> {
        self.table.get(old).copied().flatten()
    }

    /// 原顶点数量
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn kept_count(&self) -> usize {
        self.kept
    }

    pub fn removed_count(&self) -> usize {
        self.table.len() - self.kept
    }

    /// 先应用 self 再应用 next
    pub fn then(&self, next: &VertexRemap) -> VertexRemap {
        let table: Vec<Option<u32>> = self
            .table
            .iter()
            .map(|mid| mid.and_then(|m| next.get(m as usize)))
            .collect();
        let kept = table.iter().filter(|e| e.is_some()).count();
        VertexRemap { table, kept }
    }
}

/// 压缩结果
#[derive(Clone, Debug)]
pub struct Compacted {
    pub geometry: Geometry,
    pub remap: VertexRemap,
    pub removed_triangles: usize,
}

/// 只保留掩码为 true 的顶点，以及三个顶点都保留的三角形
///
/// 所有逐顶点缓冲区按相同顺序复制，骨骼索引值不变。
/// 缓冲区长度不一致时直接返回错误。
pub fn compact(geometry: &Geometry, keep: &[bool]) -> Result<Compacted> {
    geometry.validate()?;

    let vertex_count = geometry.vertex_count();
    if keep.len() != vertex_count {
        return Err(PrunerError::KeepMaskLength {
            expected: vertex_count,
            actual: keep.len(),
        });
    }

    let remap = VertexRemap::from_mask(keep);
    let kept = remap.kept_count();

    let positions = select(&geometry.positions, keep, kept);
    let skin = select(&geometry.skin, keep, kept);

    let attributes = geometry
        .attributes
        .iter()
        .map(|(name, attr)| {
            let mut data = Vec::with_capacity(kept * attr.item_size);
            for (i, _) in keep.iter().enumerate().filter(|&(_, &k)| k) {
                data.extend_from_slice(attr.item(i));
            }
            (name.clone(), VertexAttribute::new(attr.item_size, data))
        })
        .collect();

    let mut removed_triangles = 0;
    let indices = geometry.indices.as_ref().map(|indices| {
        let mut out = Vec::with_capacity(indices.len());
        for tri in indices.chunks_exact(3) {
            let mapped = (
                remap.get(tri[0] as usize),
                remap.get(tri[1] as usize),
                remap.get(tri[2] as usize),
            );
            match mapped {
                (Some(a), Some(b), Some(c)) => out.extend_from_slice(&[a, b, c]),
                _ => removed_triangles += 1,
            }
        }
        out
    });

    Ok(Compacted {
        geometry: Geometry {
            positions,
            skin,
            attributes,
            indices,
        },
        remap,
        removed_triangles,
    })
}

fn select<T: Copy>(items: &[T], keep: &[bool], kept: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(kept);
    out.extend(
        items
            .iter()
            .zip(keep.iter())
            .filter(|&(_, &k)| k)
            .map(|(item, _)| *item),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VertexWeight;
    use glam::Vec3;

    /// 两个三角形共享边 1-2
    fn quad() -> Geometry {
        Geometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)],
            (0..4).map(VertexWeight::single).collect(),
        )
        .with_indices(vec![0, 1, 2, 2, 1, 3])
        .with_attribute("uv", VertexAttribute::new(2, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0]))
        .with_attribute("color", VertexAttribute::new(3, (0..12).map(|i| i as f32).collect()))
    }

    #[test]
    fn test_compact_drops_triangles_with_removed_vertex() {
        let result = compact(&quad(), &[true, true, true, false]).unwrap();
        let g = &result.geometry;

        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.skin.len(), 3);
        assert_eq!(g.indices.as_deref(), Some(&[0, 1, 2][..]));
        assert_eq!(result.removed_triangles, 1);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_compact_remaps_indices_and_attributes() {
        let result = compact(&quad(), &[false, true, true, true]).unwrap();
        let g = &result.geometry;

        assert_eq!(g.positions, vec![Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)]);
        assert_eq!(g.skin[0].bones[0], 1);
        assert_eq!(g.indices.as_deref(), Some(&[1, 0, 2][..]));
        assert_eq!(g.attributes["uv"].data, vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        assert_eq!(g.attributes["color"].item_size, 3);
        assert_eq!(g.attributes["color"].data, (3..12).map(|i| i as f32).collect::<Vec<_>>());
        assert_eq!(result.remap.get(0), None);
        assert_eq!(result.remap.get(3), Some(2));
    }

    #[test]
    fn test_compact_without_index_buffer() {
        let mut geometry = quad();
        geometry.indices = None;
        let result = compact(&geometry, &[true, false, true, false]).unwrap();
        assert_eq!(result.geometry.vertex_count(), 2);
        assert!(result.geometry.indices.is_none());
        assert_eq!(result.removed_triangles, 0);
    }

    #[test]
    fn test_compact_rejects_mask_length() {
        assert!(matches!(
            compact(&quad(), &[true]),
            Err(PrunerError::KeepMaskLength { expected: 4, actual: 1 })
        ));
    }

    #[test]
    fn test_compact_rejects_short_skin() {
        let mut geometry = quad();
        geometry.skin.pop();
        assert!(matches!(
            compact(&geometry, &[true; 4]),
            Err(PrunerError::InconsistentAttribute { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn test_compact_rejects_short_attribute() {
        let geometry = quad().with_attribute("uv", VertexAttribute::new(2, vec![0.0, 0.0, 1.0, 0.0]));
        let result = compact(&geometry, &[true; 4]);
        assert!(matches!(
            result,
            Err(PrunerError::InconsistentAttribute { ref attribute, actual: 2, .. }) if attribute == "uv"
        ));
    }

    #[test]
    fn test_remap_then() {
        let first = VertexRemap::from_mask(&[true, false, true, true]);
        let second = VertexRemap::from_mask(&[false, true, true]);
        let composed = first.then(&second);

        assert_eq!(composed.len(), 4);
        assert_eq!(composed.get(0), None);
        assert_eq!(composed.get(1), None);
        assert_eq!(composed.get(2), Some(0));
        assert_eq!(composed.get(3), Some(1));
        assert_eq!(composed.kept_count(), 2);
        assert_eq!(composed.removed_count(), 2);
    }
}
