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

//! Defines the per-frame light snapshot handed to the pipeline by culling.
//!
//! A [`VisibleLight`] is read-only and lives for one frame. Its transform is a
//! full local-to-world matrix: column 2 is the light's forward axis and column 3
//! its world position.

use crate::math::{LinearRgba, Mat4, Vec4};
use serde::{Deserialize, Serialize};

/// The kind of a light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightKind {
    /// An infinitely distant light with parallel rays.
    Directional,
    /// An omnidirectional light with a finite range.
    Point,
    /// A cone-shaped light with a finite range.
    Spot,
}

/// How a light casts shadows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShadowMode {
    /// The light casts no shadows.
    #[default]
    None,
    /// Single-tap shadow filtering.
    Hard,
    /// Multi-tap (PCF) shadow filtering.
    Soft,
}

/// How a light participates in baked lighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LightmapBakeType {
    /// Fully dynamic.
    #[default]
    Realtime,
    /// Partially baked; see [`MixedLightingMode`].
    Mixed,
    /// Fully baked into lightmaps.
    Baked,
}

/// The lighting mode used by [`LightmapBakeType::Mixed`] lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MixedLightingMode {
    /// Only indirect light is baked.
    #[default]
    IndirectOnly,
    /// Baked occlusion is stored in a shadowmask texture.
    Shadowmask,
    /// Direct light is subtracted from lightmaps in shadowed areas.
    Subtractive,
}

/// Baked-lighting metadata reported for a light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightBaking {
    /// The shadowmask channel holding this light's occlusion, or `-1` for none.
    pub occlusion_mask_channel: i32,
    /// How the light is baked.
    pub bake_type: LightmapBakeType,
    /// The mixed mode, only meaningful when `bake_type` is `Mixed`.
    pub mixed_mode: MixedLightingMode,
}

impl Default for LightBaking {
    fn default() -> Self {
        Self {
            occlusion_mask_channel: -1,
            bake_type: LightmapBakeType::Realtime,
            mixed_mode: MixedLightingMode::IndirectOnly,
        }
    }
}

impl LightBaking {
    /// Returns `true` for a mixed light baked with the shadowmask mode.
    pub fn uses_shadowmask(&self) -> bool {
        self.bake_type == LightmapBakeType::Mixed && self.mixed_mode == MixedLightingMode::Shadowmask
    }

    /// Returns `true` for a mixed light baked with the subtractive mode.
    pub fn uses_subtractive(&self) -> bool {
        self.bake_type == LightmapBakeType::Mixed
            && self.mixed_mode == MixedLightingMode::Subtractive
    }
}

/// A light that survived culling for the current camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleLight {
    /// The kind of light.
    pub kind: LightKind,
    /// The light's local-to-world transform.
    pub local_to_world: Mat4,
    /// Color premultiplied by intensity, in linear space.
    pub final_color: LinearRgba,
    /// Range in world units. Ignored for directional lights.
    pub range: f32,
    /// Full cone angle in degrees. Only meaningful for spot lights.
    pub spot_angle: f32,
    /// Shadow filtering mode.
    pub shadows: ShadowMode,
    /// Shadow strength in `[0, 1]`.
    pub shadow_strength: f32,
    /// Depth bias applied while rendering this light's shadow map.
    pub shadow_bias: f32,
    /// Near plane used when fitting directional shadow projections.
    pub shadow_near_plane: f32,
    /// Baked-lighting metadata.
    pub baking: LightBaking,
}

impl VisibleLight {
    /// Creates a light of the given kind with neutral defaults.
    pub fn new(kind: LightKind, local_to_world: Mat4, final_color: LinearRgba) -> Self {
        Self {
            kind,
            local_to_world,
            final_color,
            range: 10.0,
            spot_angle: 30.0,
            shadows: ShadowMode::None,
            shadow_strength: 1.0,
            shadow_bias: 0.05,
            shadow_near_plane: 0.2,
            baking: LightBaking::default(),
        }
    }

    /// Returns a copy casting shadows with `mode` at `strength`.
    #[must_use]
    pub fn with_shadows(mut self, mode: ShadowMode, strength: f32) -> Self {
        self.shadows = mode;
        self.shadow_strength = strength;
        self
    }

    /// The forward axis (column 2 of the transform), `w` included.
    #[inline]
    pub fn forward(&self) -> Vec4 {
        self.local_to_world.cols[2]
    }

    /// The world position (column 3 of the transform).
    #[inline]
    pub fn position(&self) -> Vec4 {
        self.local_to_world.cols[3]
    }

    /// Returns `true` if this light asks for shadows at all.
    #[inline]
    pub fn casts_shadows(&self) -> bool {
        self.shadows != ShadowMode::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn test_transform_columns() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let light = VisibleLight::new(LightKind::Point, m, LinearRgba::WHITE);
        assert_eq!(light.position(), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(light.forward(), Vec4::Z);
    }

    #[test]
    fn test_default_baking_has_no_channel() {
        let baking = LightBaking::default();
        assert_eq!(baking.occlusion_mask_channel, -1);
        assert!(!baking.uses_shadowmask());
        assert!(!baking.uses_subtractive());
    }

    #[test]
    fn test_baked_mode_only_counts_when_mixed() {
        let baked = LightBaking {
            occlusion_mask_channel: 0,
            bake_type: LightmapBakeType::Baked,
            mixed_mode: MixedLightingMode::Shadowmask,
        };
        assert!(!baked.uses_shadowmask());

        let mixed = LightBaking {
            bake_type: LightmapBakeType::Mixed,
            ..baked
        };
        assert!(mixed.uses_shadowmask());
    }

    #[test]
    fn test_with_shadows() {
        let light = VisibleLight::new(LightKind::Spot, Mat4::IDENTITY, LinearRgba::WHITE)
            .with_shadows(ShadowMode::Soft, 0.5);
        assert!(light.casts_shadows());
        assert_eq!(light.shadow_strength, 0.5);
    }
}
