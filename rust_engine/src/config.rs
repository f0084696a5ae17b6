//! 裁剪配置
//!
//! JSON 字段使用 camelCase，与加载器插件选项一致：
//! `{"targetBones": ["LeftLeg", {"name": "RightLeg", "threshold": 0.5}], "removeBones": true}`

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::sync::RwLock;

use crate::{PrunerError, Result};

/// 默认影响阈值
pub const DEFAULT_INFLUENCE_THRESHOLD: f32 = 0.3;

/// 目标骨骼：裸名称或带阈值的条目
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TargetBone {
    Name(String),
    WithThreshold {
        name: String,
        #[serde(default)]
        threshold: Option<f32>,
    },
}

impl TargetBone {
    pub fn name(&self) -> &str {
        match self {
            TargetBone::Name(name) => name,
            TargetBone::WithThreshold { name, .. } => name,
        }
    }

    /// 条目自身阈值，未指定时使用默认值
    pub fn threshold_or(&self, default: f32) -> f32 {
        match self {
            TargetBone::Name(_) => default,
            TargetBone::WithThreshold { threshold, .. } => threshold.unwrap_or(default),
        }
    }
}

impl From<&str> for TargetBone {
    fn from(name: &str) -> Self {
        TargetBone::Name(name.to_string())
    }
}

impl From<(&str, f32)> for TargetBone {
    fn from((name, threshold): (&str, f32)) -> Self {
        TargetBone::WithThreshold {
            name: name.to_string(),
            threshold: Some(threshold),
        }
    }
}

/// 裁剪选项
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrunerOptions {
    /// 按顺序处理的目标骨骼
    pub target_bones: Vec<TargetBone>,
    /// 条目未指定阈值时使用，取值 [0, 1)，默认 0.3
    pub default_influence_threshold: f32,
    /// 裁剪几何后是否从骨骼中删除目标骨骼，默认 false
    pub remove_bones: bool,
    /// 是否输出统计日志，默认 false
    pub debug_log: bool,
}

impl Default for PrunerOptions {
    fn default() -> Self {
        Self {
            target_bones: Vec::new(),
            default_influence_threshold: DEFAULT_INFLUENCE_THRESHOLD,
            remove_bones: false,
            debug_log: false,
        }
    }
}

impl PrunerOptions {
    pub fn new<I, T>(target_bones: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TargetBone>,
    {
        Self {
            target_bones: target_bones.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_default_threshold(mut self, threshold: f32) -> Self {
        self.default_influence_threshold = threshold;
        self
    }

    pub fn with_remove_bones(mut self, remove_bones: bool) -> Self {
        self.remove_bones = remove_bones;
        self
    }

    /// 从 JSON 解析并校验
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// 默认阈值必须在 [0, 1)；条目阈值必须是非负有限数（>= 1 表示不删除任何顶点）
    pub fn validate(&self) -> Result<()> {
        let default = self.default_influence_threshold;
        if !(0.0..1.0).contains(&default) {
            return Err(PrunerError::InvalidThreshold(default));
        }
        for target in &self.target_bones {
            let threshold = target.threshold_or(default);
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(PrunerError::InvalidThreshold(threshold));
            }
        }
        Ok(())
    }

    /// 目标骨骼名称（保持顺序）
    pub fn target_names(&self) -> Vec<&str> {
        self.target_bones.iter().map(TargetBone::name).collect()
    }
}

/// 全局默认选项
static PRUNER_CONFIG: Lazy<RwLock<PrunerOptions>> = Lazy::new(|| {
    RwLock::new(PrunerOptions::default())
});

/// 获取当前默认选项
pub fn get_config() -> PrunerOptions {
    match PRUNER_CONFIG.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// 设置默认选项
pub fn set_config(config: PrunerOptions) {
    match PRUNER_CONFIG.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// 重置为默认选项
pub fn reset_config() {
    set_config(PrunerOptions::default());
}
