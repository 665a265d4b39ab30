// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Pipeline configuration: the persisted asset and the immutable settings snapshot.
//!
//! A [`PipelineAsset`] is the human-editable record, stored as RON. A render
//! agent converts it once, at construction, into [`PipelineSettings`] and
//! never mutates it afterwards.

use crate::math::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Valid range of [`PipelineAsset::shadow_fade_range`].
pub const SHADOW_FADE_RANGE_LIMITS: (f32, f32) = (0.01, 2.0);

/// Errors raised while loading or validating a pipeline asset.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The RON text could not be parsed.
    #[error("failed to parse pipeline asset: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The asset could not be serialized.
    #[error("failed to serialize pipeline asset: {0}")]
    Serialize(#[from] ron::Error),
    /// The asset file could not be read.
    #[error("failed to read pipeline asset: {0}")]
    Io(#[from] std::io::Error),
    /// A field holds a value outside its valid range.
    #[error("invalid pipeline asset: {0}")]
    Invalid(String),
}

/// Resolution of the shadow atlases, in texels per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShadowMapSize {
    /// 256 x 256.
    Size256,
    /// 512 x 512.
    Size512,
    /// 1024 x 1024.
    #[default]
    Size1024,
    /// 2048 x 2048.
    Size2048,
    /// 4096 x 4096.
    Size4096,
}

impl ShadowMapSize {
    /// The side length in texels.
    pub const fn texels(&self) -> u32 {
        match self {
            Self::Size256 => 256,
            Self::Size512 => 512,
            Self::Size1024 => 1024,
            Self::Size2048 => 2048,
            Self::Size4096 => 4096,
        }
    }
}

/// Number of cascades for the primary directional light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShadowCascades {
    /// No cascades; every shadowed light goes into the regular atlas.
    #[default]
    Zero,
    /// Two cascades.
    Two,
    /// Four cascades.
    Four,
}

impl ShadowCascades {
    /// The cascade count.
    pub const fn count(&self) -> usize {
        match self {
            Self::Zero => 0,
            Self::Two => 2,
            Self::Four => 4,
        }
    }
}

/// The persisted pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineAsset {
    /// Let the host batch small meshes on the CPU.
    pub dynamic_batching: bool,
    /// Let the host use GPU instancing.
    pub instancing: bool,
    /// Atlas resolution.
    pub shadow_map_size: ShadowMapSize,
    /// Maximum distance from the camera at which shadows render.
    pub shadow_distance: f32,
    /// Cascade count.
    pub shadow_cascades: ShadowCascades,
    /// Split fraction used with two cascades.
    pub two_cascades_split: f32,
    /// Split fractions used with four cascades.
    pub four_cascades_split: Vec3,
    /// Distance over which shadows fade out, as a fraction of the shadow distance.
    pub shadow_fade_range: f32,
}

impl Default for PipelineAsset {
    fn default() -> Self {
        Self {
            dynamic_batching: false,
            instancing: false,
            shadow_map_size: ShadowMapSize::Size1024,
            shadow_distance: 20.0,
            shadow_cascades: ShadowCascades::Zero,
            two_cascades_split: 0.25,
            four_cascades_split: Vec3::new(0.067, 0.2, 0.467),
            shadow_fade_range: 1.0,
        }
    }
}

impl PipelineAsset {
    /// Parses an asset from RON text and validates it.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        let asset: PipelineAsset = ron::from_str(text)?;
        asset.validate()?;
        Ok(asset)
    }

    /// Reads, parses and validates an asset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&text)
    }

    /// Serializes the asset as pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, SettingsError> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Checks every field against its valid range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.shadow_distance.is_finite() && self.shadow_distance > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "shadow_distance must be positive, got {}",
                self.shadow_distance
            )));
        }
        let (min_fade, max_fade) = SHADOW_FADE_RANGE_LIMITS;
        if !(min_fade..=max_fade).contains(&self.shadow_fade_range) {
            return Err(SettingsError::Invalid(format!(
                "shadow_fade_range must lie in {min_fade}..={max_fade}, got {}",
                self.shadow_fade_range
            )));
        }
        if !(self.two_cascades_split > 0.0 && self.two_cascades_split < 1.0) {
            return Err(SettingsError::Invalid(format!(
                "two_cascades_split must lie in (0, 1), got {}",
                self.two_cascades_split
            )));
        }
        let s = self.four_cascades_split;
        if !(0.0 < s.x && s.x < s.y && s.y < s.z && s.z < 1.0) {
            return Err(SettingsError::Invalid(format!(
                "four_cascades_split must be increasing within (0, 1), got ({}, {}, {})",
                s.x, s.y, s.z
            )));
        }
        Ok(())
    }

    /// Returns `true` when cascades are enabled.
    pub fn has_shadow_cascades(&self) -> bool {
        self.shadow_cascades != ShadowCascades::Zero
    }
}

/// The immutable settings snapshot a render agent owns for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    /// Let the host batch small meshes on the CPU.
    pub dynamic_batching: bool,
    /// Let the host use GPU instancing.
    pub instancing: bool,
    /// Atlas side length in texels.
    pub shadow_map_size: u32,
    /// Maximum shadow distance.
    pub shadow_distance: f32,
    /// Cascade count: 0, 2 or 4.
    pub shadow_cascades: usize,
    /// Cascade split fractions; only `x` is used with two cascades.
    pub cascade_split: Vec3,
    /// Shadow fade range.
    pub shadow_fade_range: f32,
}

impl PipelineSettings {
    /// Snapshots an asset.
    pub fn from_asset(asset: &PipelineAsset) -> Self {
        let cascade_split = match asset.shadow_cascades {
            ShadowCascades::Four => asset.four_cascades_split,
            _ => Vec3::new(asset.two_cascades_split, 0.0, 0.0),
        };
        let (min_fade, max_fade) = SHADOW_FADE_RANGE_LIMITS;
        let shadow_fade_range = asset.shadow_fade_range.clamp(min_fade, max_fade);
        if shadow_fade_range != asset.shadow_fade_range {
            log::warn!(
                "Shadow fade range {} clamped to {}",
                asset.shadow_fade_range,
                shadow_fade_range
            );
        }
        Self {
            dynamic_batching: asset.dynamic_batching,
            instancing: asset.instancing,
            shadow_map_size: asset.shadow_map_size.texels(),
            shadow_distance: asset.shadow_distance,
            shadow_cascades: asset.shadow_cascades.count(),
            cascade_split,
            shadow_fade_range,
        }
    }

    /// Returns `true` when cascades are enabled.
    pub fn has_shadow_cascades(&self) -> bool {
        self.shadow_cascades > 0
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_asset(&PipelineAsset::default())
    }
}
