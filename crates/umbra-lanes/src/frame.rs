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

//! Per-camera mutable state shared by the lanes.
//!
//! A [`FrameContext`] is created when a camera starts rendering and dropped
//! when it finishes. Nothing in it survives to the next camera, which keeps
//! tile counts and the primary-light flag from leaking between cameras.

use umbra_core::math::{LinearRgba, Vec4};
use umbra_core::renderer::{
    RenderContext, ResourceError, ShadowMapDescriptor, ShadowmaskMode, TextureId,
};
use umbra_core::PipelineSettings;

/// The global shadow vector uploaded once per camera.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlobalShadowData {
    /// Tile scale of the regular atlas; 0 when it does not render.
    pub tile_scale: f32,
    /// Squared shadow distance, taken after the far-plane clamp rather than
    /// from the configured distance so both fade terms agree per camera.
    pub distance_sq: f32,
    /// `1 / fade range`.
    pub inv_fade_range: f32,
    /// `1 - shadow distance / fade range`.
    pub fade_bias: f32,
}

impl GlobalShadowData {
    /// Computes the vector for a camera whose shadow distance was clamped to `clipped_distance`.
    pub fn new(settings: &PipelineSettings, clipped_distance: f32) -> Self {
        let inv_fade_range = 1.0 / settings.shadow_fade_range;
        Self {
            tile_scale: 0.0,
            distance_sq: clipped_distance * clipped_distance,
            inv_fade_range,
            fade_bias: 1.0 - clipped_distance * inv_fade_range,
        }
    }

    /// Packs the fields as `(x, y, z, w)`.
    pub fn to_vec4(&self) -> Vec4 {
        Vec4::new(
            self.tile_scale,
            self.distance_sq,
            self.inv_fade_range,
            self.fade_bias,
        )
    }
}

/// Temporary atlas targets acquired during one camera.
///
/// Targets are acquired lazily and handed back by [`release`](Self::release),
/// which is safe to call any number of times.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShadowTargets {
    atlas: Option<TextureId>,
    cascaded: Option<TextureId>,
}

impl ShadowTargets {
    /// The regular atlas, acquiring it on first use.
    pub fn acquire_atlas<C: RenderContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        size: u32,
    ) -> Result<TextureId, ResourceError> {
        acquire(&mut self.atlas, ctx, "Shadow Atlas", size)
    }

    /// The cascaded atlas, acquiring it on first use.
    pub fn acquire_cascaded<C: RenderContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        size: u32,
    ) -> Result<TextureId, ResourceError> {
        acquire(&mut self.cascaded, ctx, "Cascaded Shadow Atlas", size)
    }

    /// The regular atlas, if acquired.
    pub fn atlas(&self) -> Option<TextureId> {
        self.atlas
    }

    /// The cascaded atlas, if acquired.
    pub fn cascaded(&self) -> Option<TextureId> {
        self.cascaded
    }

    /// Returns `true` if nothing is held.
    pub fn is_empty(&self) -> bool {
        self.atlas.is_none() && self.cascaded.is_none()
    }

    /// Hands every held target back to the host.
    pub fn release<C: RenderContext + ?Sized>(&mut self, ctx: &mut C) {
        if let Some(texture) = self.atlas.take() {
            ctx.release_temporary_texture(texture);
        }
        if let Some(texture) = self.cascaded.take() {
            ctx.release_temporary_texture(texture);
        }
    }
}

fn acquire<C: RenderContext + ?Sized>(
    slot: &mut Option<TextureId>,
    ctx: &mut C,
    label: &'static str,
    size: u32,
) -> Result<TextureId, ResourceError> {
    if let Some(texture) = *slot {
        return Ok(texture);
    }
    let texture = ctx.get_temporary_shadow_map(&ShadowMapDescriptor::atlas(label, size))?;
    *slot = Some(texture);
    Ok(texture)
}

/// Mutable state threaded through the lanes while one camera renders.
#[derive(Debug)]
pub struct FrameContext {
    /// Number of visible lights reported by culling, before truncation.
    pub visible_light_count: usize,
    /// Tiles the regular atlas must hold.
    pub shadow_tile_count: usize,
    /// Index of the primary directional light. Only ever `Some(0)`.
    pub primary_light: Option<usize>,
    /// A mixed light uses the shadowmask.
    pub shadowmask: bool,
    /// A mixed light uses subtractive lighting.
    pub subtractive: bool,
    /// The global shadow vector.
    pub global_shadow_data: GlobalShadowData,
    /// Shadow distance after clamping to the camera's far plane.
    pub clipped_shadow_distance: f32,
    /// The device's depth convention.
    pub reversed_z: bool,
    /// The host's shadowmask quality setting.
    pub shadowmask_mode: ShadowmaskMode,
    /// Shadow tint for subtractive lighting.
    pub subtractive_shadow_color: LinearRgba,
    /// Temporary targets held by this camera.
    pub targets: ShadowTargets,
}

impl FrameContext {
    /// Creates the context for one camera, snapshotting the host's quality knobs.
    pub fn new<C: RenderContext + ?Sized>(
        settings: &PipelineSettings,
        clipped_shadow_distance: f32,
        ctx: &C,
    ) -> Self {
        Self {
            visible_light_count: 0,
            shadow_tile_count: 0,
            primary_light: None,
            shadowmask: false,
            subtractive: false,
            global_shadow_data: GlobalShadowData::new(settings, clipped_shadow_distance),
            clipped_shadow_distance,
            reversed_z: ctx.uses_reversed_z(),
            shadowmask_mode: ctx.shadowmask_mode(),
            subtractive_shadow_color: ctx.subtractive_shadow_color(),
            targets: ShadowTargets::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        let settings = PipelineSettings::default();
        Self {
            visible_light_count: 0,
            shadow_tile_count: 0,
            primary_light: None,
            shadowmask: false,
            subtractive: false,
            global_shadow_data: GlobalShadowData::new(&settings, settings.shadow_distance),
            clipped_shadow_distance: settings.shadow_distance,
            reversed_z: false,
            shadowmask_mode: ShadowmaskMode::Shadowmask,
            subtractive_shadow_color: LinearRgba::BLACK,
            targets: ShadowTargets::default(),
        }
    }
}
