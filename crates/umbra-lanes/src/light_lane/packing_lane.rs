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

//! Packs visible lights into uniform slots and reserves shadow tiles.

use super::LightUniformSet;
use crate::frame::FrameContext;
use umbra_core::lane::{Lane, LaneKind};
use umbra_core::math::{degrees_to_radians, Vec4};
use umbra_core::renderer::{
    CommandBuffer, CullingResults, LightKind, ShaderKeyword, ShaderProperty, ShadowMode,
    ShadowmaskMode, VisibleLight,
};
use umbra_core::{PipelineSettings, MAX_VISIBLE_LIGHTS};

/// Occlusion mask per shadowmask channel, indexed by `channel + 1`.
const OCCLUSION_MASKS: [Vec4; 5] = [
    Vec4::new(-1.0, 0.0, 0.0, 0.0),
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 1.0, 0.0),
    Vec4::new(0.0, 0.0, 0.0, 1.0),
];

/// Ratio between the inner and outer cone tangents of a spot light.
const SPOT_INNER_TANGENT_RATIO: f32 = 46.0 / 64.0;

/// Converts culled lights into the packed per-slot arrays.
///
/// Besides filling the [`LightUniformSet`], packing decides which lights get
/// a shadow tile, elects the primary directional light for cascades, and
/// rewrites the light index map so per-object lighting skips lights that
/// are handled elsewhere or did not fit.
#[derive(Debug, Default)]
pub struct LightPackingLane;

impl LightPackingLane {
    /// Creates a new `LightPackingLane`.
    pub fn new() -> Self {
        Self
    }

    /// Packs the visible lights of `cull` for one camera.
    ///
    /// Baked-lighting keywords and the subtractive shadow color are recorded
    /// into `cmd`. Tile count, primary light and baked-lighting flags are
    /// written to `frame`.
    pub fn pack<R: CullingResults + ?Sized>(
        &self,
        cull: &mut R,
        uniforms: &mut LightUniformSet,
        frame: &mut FrameContext,
        settings: &PipelineSettings,
        cmd: &mut CommandBuffer,
    ) {
        let total = cull.visible_lights().len();
        let count = uniforms.reset(total);
        frame.visible_light_count = total;
        if total > MAX_VISIBLE_LIGHTS {
            log::debug!(
                "LightPackingLane: {} visible lights, only the first {} are packed",
                total,
                MAX_VISIBLE_LIGHTS
            );
        }

        for n in 0..count {
            let light = cull.visible_lights()[n];
            let mut attenuation = Vec4::W;

            uniforms.colors[n] = light.final_color.into();
            uniforms.occlusion_masks[n] = occlusion_mask(light.baking.occlusion_mask_channel);

            if light.baking.uses_shadowmask() {
                frame.shadowmask = true;
            } else if light.baking.uses_subtractive() {
                frame.subtractive = true;
                cmd.set_global_color(
                    ShaderProperty::SubtractiveShadowColor,
                    frame.subtractive_shadow_color,
                );
            }

            match light.kind {
                LightKind::Directional => {
                    let mut direction = -light.forward();
                    direction.w = 0.0;
                    uniforms.directions_or_positions[n] = direction;

                    let mut shadow = self.reserve_shadow(cull, n, &light, frame);
                    shadow.z = 1.0;
                    if n == 0 && shadow.x > 0.0 && settings.has_shadow_cascades() {
                        frame.primary_light = Some(0);
                        frame.shadow_tile_count -= 1;
                    }
                    uniforms.shadow_data[n] = shadow;
                }
                LightKind::Point | LightKind::Spot => {
                    uniforms.directions_or_positions[n] = light.position();
                    attenuation.x = range_attenuation(light.range);

                    if light.kind == LightKind::Spot {
                        let mut spot_direction = -light.forward();
                        spot_direction.w = 0.0;
                        uniforms.spot_directions[n] = spot_direction;
                        let (scale, offset) = spot_fade(light.spot_angle);
                        attenuation.z = scale;
                        attenuation.w = offset;
                    } else {
                        uniforms.spot_directions[n] = Vec4::ONE;
                    }

                    uniforms.shadow_data[n] = self.reserve_shadow(cull, n, &light, frame);
                }
            }

            uniforms.attenuations[n] = attenuation;
        }

        if frame.primary_light.is_some() || total > MAX_VISIBLE_LIGHTS {
            let mut map = cull.light_index_map();
            if frame.primary_light.is_some() {
                if let Some(first) = map.first_mut() {
                    *first = -1;
                }
            }
            for entry in map.iter_mut().skip(MAX_VISIBLE_LIGHTS) {
                *entry = -1;
            }
            cull.set_light_index_map(map);
        }

        let distance = frame.shadowmask_mode == ShadowmaskMode::DistanceShadowmask;
        cmd.set_keyword(ShaderKeyword::Shadowmask, frame.shadowmask && !distance);
        cmd.set_keyword(ShaderKeyword::DistanceShadowmask, frame.shadowmask && distance);
        cmd.set_keyword(ShaderKeyword::SubtractiveLighting, frame.subtractive);
    }

    /// Returns `(strength, soft, 0, 0)` and reserves a tile when light `n`
    /// has visible casters, or zero otherwise.
    fn reserve_shadow<R: CullingResults + ?Sized>(
        &self,
        cull: &R,
        n: usize,
        light: &VisibleLight,
        frame: &mut FrameContext,
    ) -> Vec4 {
        if !light.casts_shadows() || light.shadow_strength <= 0.0 {
            return Vec4::ZERO;
        }
        if cull.shadow_caster_bounds(n).is_none() {
            return Vec4::ZERO;
        }
        frame.shadow_tile_count += 1;
        let soft = if light.shadows == ShadowMode::Soft { 1.0 } else { 0.0 };
        Vec4::new(light.shadow_strength, soft, 0.0, 0.0)
    }
}

impl Lane for LightPackingLane {
    fn strategy_name(&self) -> &'static str {
        "LightPacking"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Light
    }
}

fn occlusion_mask(channel: i32) -> Vec4 {
    usize::try_from(channel + 1)
        .ok()
        .and_then(|i| OCCLUSION_MASKS.get(i))
        .copied()
        .unwrap_or(OCCLUSION_MASKS[0])
}

#[inline]
fn range_attenuation(range: f32) -> f32 {
    1.0 / (range * range).max(0.00001)
}

/// Spot cone fade as `(scale, offset)` for a full cone angle in degrees.
fn spot_fade(spot_angle: f32) -> (f32, f32) {
    let outer_rad = degrees_to_radians(0.5 * spot_angle);
    let outer_cos = outer_rad.cos();
    let inner_cos = (SPOT_INNER_TANGENT_RATIO * outer_rad.tan()).atan().cos();
    let scale = 1.0 / (inner_cos - outer_cos).max(0.001);
    (scale, -outer_cos * scale)
}
