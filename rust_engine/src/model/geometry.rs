//! 顶点与索引缓冲区

use std::collections::BTreeMap;

use glam::Vec3;

use crate::{PrunerError, Result};

use super::{VertexAttribute, VertexWeight};

/// 蒙皮几何体
///
/// 所有逐顶点缓冲区必须等长；`indices` 为三角形列表。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub skin: Vec<VertexWeight>,
    /// 附加属性，按名称排序以保证输出稳定
    pub attributes: BTreeMap<String, VertexAttribute>,
    pub indices: Option<Vec<u32>>,
}

impl Geometry {
    pub fn new(positions: Vec<Vec3>, skin: Vec<VertexWeight>) -> Self {
        Self {
            positions,
            skin,
            attributes: BTreeMap::new(),
            indices: None,
        }
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: VertexAttribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// 获取三角形数量
    pub fn triangle_count(&self) -> usize {
        self.indices.as_ref().map(|i| i.len() / 3).unwrap_or(0)
    }

    /// 遍历三角形
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .iter()
            .flat_map(|indices| indices.chunks_exact(3))
            .map(|t| [t[0], t[1], t[2]])
    }

    /// 检查缓冲区一致性，任何修改之前调用
    pub fn validate(&self) -> Result<()> {
        let expected = self.vertex_count();

        if self.skin.len() != expected {
            return Err(PrunerError::InconsistentAttribute {
                attribute: "skin".to_string(),
                expected,
                actual: self.skin.len(),
            });
        }

        for (name, attr) in &self.attributes {
            if attr.item_size == 0 || attr.data.len() != expected * attr.item_size {
                return Err(PrunerError::InconsistentAttribute {
                    attribute: name.clone(),
                    expected,
                    actual: attr.count(),
                });
            }
        }

        if let Some(ref indices) = self.indices {
            if indices.len() % 3 != 0 {
                return Err(PrunerError::InvalidIndexBuffer(indices.len()));
            }
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= expected) {
                return Err(PrunerError::IndexOutOfRange {
                    index,
                    vertex_count: expected,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Geometry {
        Geometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![VertexWeight::single(0); 3],
        )
        .with_indices(vec![0, 1, 2])
    }

    #[test]
    fn test_validate_ok() {
        let geometry = triangle().with_attribute("uv", VertexAttribute::new(2, vec![0.0; 6]));
        assert!(geometry.validate().is_ok());
        assert_eq!(geometry.triangle_count(), 1);
    }

    #[test]
    fn test_validate_skin_mismatch() {
        let mut geometry = triangle();
        geometry.skin.pop();
        match geometry.validate() {
            Err(PrunerError::InconsistentAttribute { attribute, expected, actual }) => {
                assert_eq!(attribute, "skin");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_attribute_partial_item() {
        let geometry = triangle().with_attribute("normal", VertexAttribute::new(3, vec![0.0; 8]));
        assert!(matches!(
            geometry.validate(),
            Err(PrunerError::InconsistentAttribute { .. })
        ));
    }

    #[test]
    fn test_validate_index_out_of_range() {
        let geometry = triangle().with_indices(vec![0, 1, 3]);
        assert!(matches!(
            geometry.validate(),
            Err(PrunerError::IndexOutOfRange { index: 3, vertex_count: 3 })
        ));

        let geometry = triangle().with_indices(vec![0, 1]);
        assert!(matches!(geometry.validate(), Err(PrunerError::InvalidIndexBuffer(2))));
    }
}
