//! 骨骼动画轨道

use std::fmt;
use std::str::FromStr;

use crate::PrunerError;

/// 轨道驱动的骨骼属性
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackProperty {
    Position,
    Quaternion,
    Scale,
}

impl TrackProperty {
    /// 每个关键帧的分量数
    pub fn item_size(self) -> usize {
        match self {
            TrackProperty::Position | TrackProperty::Scale => 3,
            TrackProperty::Quaternion => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrackProperty::Position => "position",
            TrackProperty::Quaternion => "quaternion",
            TrackProperty::Scale => "scale",
        }
    }
}

/// 轨道键：`.bones[<骨骼索引>].<属性>`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrackKey {
    pub bone_index: usize,
    pub property: TrackProperty,
}

impl TrackKey {
    pub fn new(bone_index: usize, property: TrackProperty) -> Self {
        Self { bone_index, property }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".bones[{}].{}", self.bone_index, self.property.as_str())
    }
}

impl FromStr for TrackKey {
    type Err = PrunerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PrunerError::InvalidTrackKey(s.to_string());

        let open = s.find('[').ok_or_else(invalid)?;
        let close = s[open..].find(']').map(|i| open + i).ok_or_else(invalid)?;

        if s[..open].trim_start_matches('.') != "bones" {
            return Err(invalid());
        }
        let bone_index = s[open + 1..close].parse::<usize>().map_err(|_| invalid())?;

        let property = match s[close + 1..].strip_prefix('.').ok_or_else(invalid)? {
            "position" => TrackProperty::Position,
            "quaternion" => TrackProperty::Quaternion,
            "scale" => TrackProperty::Scale,
            _ => return Err(invalid()),
        };

        Ok(Self { bone_index, property })
    }
}

/// 骨骼动画轨道
///
/// `values` 按关键帧平铺，每帧 `key.property.item_size()` 个分量。
#[derive(Clone, Debug, PartialEq)]
pub struct BoneTrack {
    pub key: TrackKey,
    pub times: Vec<f32>,
    pub values: Vec<f32>,
}

impl BoneTrack {
    pub fn new(key: TrackKey, times: Vec<f32>, values: Vec<f32>) -> Self {
        Self { key, times, values }
    }

    /// 获取关键帧数量
    pub fn keyframe_count(&self) -> usize {
        self.times.len()
    }

    /// 第 index 个关键帧的值
    pub fn value(&self, index: usize) -> Option<&[f32]> {
        let size = self.key.property.item_size();
        self.values.get(index * size..(index + 1) * size)
    }
}
