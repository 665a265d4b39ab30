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

//! Renders spot, point and non-primary directional shadows into one atlas.

use super::tiles::{configure_tile, grid_side, shadow_map_size_vector, world_to_shadow};
use crate::frame::FrameContext;
use crate::light_lane::LightUniformSet;
use umbra_core::lane::{Lane, LaneError, LaneKind};
use umbra_core::math::Vec3;
use umbra_core::renderer::{
    ClearFlags, CommandBuffer, CullingResults, LightKind, LoadAction, RenderContext,
    ShaderKeyword, ShaderProperty, ShadowDrawingSettings, StoreAction,
};
use umbra_core::PipelineSettings;

/// Profiler sample wrapping all shadow rendering.
pub const SHADOW_SAMPLE: &str = "Render Shadows";

/// A lane that renders every tile-holding light into a square-grid atlas.
///
/// The grid is 1, 2, 3 or 4 tiles wide depending on how many tiles the
/// packing lane reserved. Each light's shadow data gets its tile offset and
/// its world-to-shadow matrix; a light whose fit fails loses its shadow.
#[derive(Debug, Default)]
pub struct ShadowAtlasLane;

impl ShadowAtlasLane {
    /// Creates a new `ShadowAtlasLane`.
    pub fn new() -> Self {
        Self
    }

    /// Renders the atlas and binds it, returning the number of tiles drawn.
    pub fn render<C: RenderContext>(
        &self,
        ctx: &mut C,
        cull: &C::Cull,
        uniforms: &mut LightUniformSet,
        frame: &mut FrameContext,
        settings: &PipelineSettings,
        cmd: &mut CommandBuffer,
    ) -> Result<usize, LaneError> {
        let map_size = settings.shadow_map_size;
        let split = grid_side(frame.shadow_tile_count);
        let tile_size = (map_size / split as u32) as f32;
        let tile_scale = 1.0 / split as f32;

        let atlas = frame.targets.acquire_atlas(ctx, map_size)?;
        cmd.set_render_target(
            atlas,
            LoadAction::DontCare,
            StoreAction::Store,
            ClearFlags::DEPTH,
        );
        cmd.begin_sample(SHADOW_SAMPLE);
        frame.global_shadow_data.tile_scale = tile_scale;
        ctx.execute_command_buffer(cmd);
        cmd.clear();

        let start = usize::from(frame.primary_light.is_some());
        let mut tile_index = 0;
        let mut drawn = 0;
        let mut hard = false;
        let mut soft = false;

        for n in start..uniforms.len() {
            if uniforms.shadow_data[n].x <= 0.0 {
                continue;
            }
            let Some(light) = cull.visible_lights().get(n) else {
                break;
            };

            let offset = configure_tile(cmd, tile_index, split, tile_size);
            uniforms.shadow_data[n].z = offset.0 * tile_scale;
            uniforms.shadow_data[n].w = offset.1 * tile_scale;
            tile_index += 1;

            let fit = match light.kind {
                LightKind::Directional => cull.compute_directional_shadow_matrices(
                    n,
                    0,
                    1,
                    Vec3::X,
                    tile_size as u32,
                    light.shadow_near_plane,
                ),
                LightKind::Spot => cull.compute_spot_shadow_matrices(n),
                LightKind::Point => cull.compute_point_shadow_matrices(n),
            };
            let Some(matrices) = fit else {
                log::trace!(
                    "ShadowAtlasLane: no shadow fit for light {} ({:?}), shadow dropped",
                    n,
                    light.kind
                );
                uniforms.shadow_data[n].x = 0.0;
                continue;
            };

            cmd.set_view_projection(matrices.view, matrices.projection);
            cmd.set_global_float(ShaderProperty::ShadowBias, light.shadow_bias);
            ctx.execute_command_buffer(cmd);
            cmd.clear();

            ctx.draw_shadows(
                cull,
                &ShadowDrawingSettings {
                    light_index: n,
                    split_data: matrices.split,
                },
            );
            uniforms.world_to_shadow[n] =
                world_to_shadow(matrices.view, matrices.projection, frame.reversed_z);
            drawn += 1;

            if uniforms.shadow_data[n].y <= 0.0 {
                hard = true;
            } else {
                soft = true;
            }
        }

        cmd.disable_scissor();
        cmd.set_global_matrix_array(
            ShaderProperty::WorldToShadowMatrices,
            &uniforms.world_to_shadow,
        );
        cmd.set_global_vector_array(ShaderProperty::ShadowData, &uniforms.shadow_data);
        cmd.set_global_texture(ShaderProperty::ShadowMap, atlas);
        cmd.set_global_vector(
            ShaderProperty::ShadowMapSize,
            shadow_map_size_vector(map_size),
        );
        cmd.set_keyword(ShaderKeyword::ShadowsHard, hard);
        cmd.set_keyword(ShaderKeyword::ShadowsSoft, soft);
        cmd.end_sample(SHADOW_SAMPLE);
        ctx.execute_command_buffer(cmd);
        cmd.clear();

        Ok(drawn)
    }
}

impl Lane for ShadowAtlasLane {
    fn strategy_name(&self) -> &'static str {
        "ShadowAtlas"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Shadow
    }
}
