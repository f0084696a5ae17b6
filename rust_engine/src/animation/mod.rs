//! 骨骼动画数据（仅用于随骨骼删除重编号）

mod track;

pub use track::{BoneTrack, TrackKey, TrackProperty};

use crate::Result;

/// 动画片段
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub tracks: Vec<BoneTrack>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, tracks: Vec<BoneTrack>) -> Self {
        Self {
            name: name.into(),
            tracks,
        }
    }

    /// 由 `(轨道名, 时间, 值)` 创建，轨道名格式为 `.bones[i].property`
    pub fn from_named_tracks<I, S>(name: impl Into<String>, tracks: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>, Vec<f32>)>,
        S: AsRef<str>,
    {
        let tracks = tracks
            .into_iter()
            .map(|(key, times, values)| Ok(BoneTrack::new(key.as_ref().parse()?, times, values)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(name, tracks))
    }

    /// 引用指定骨骼的轨道
    pub fn tracks_for_bone(&self, bone_index: usize) -> impl Iterator<Item = &BoneTrack> + '_ {
        self.tracks.iter().filter(move |t| t.key.bone_index == bone_index)
    }
}
