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

//! Renders the primary directional light's cascades into a 2x2 atlas.

use super::atlas_lane::SHADOW_SAMPLE;
use super::tiles::{
    cascade_tile_matrix, configure_tile, fallback_cascade_matrix, shadow_map_size_vector,
    world_to_shadow, CASCADE_GRID_SIDE,
};
use crate::frame::FrameContext;
use umbra_core::lane::{Lane, LaneError, LaneKind};
use umbra_core::math::{Mat4, Vec4};
use umbra_core::renderer::{
    ClearFlags, CommandBuffer, CullingResults, LoadAction, RenderContext, ShaderKeyword,
    ShaderProperty, ShadowDrawingSettings, ShadowMode, StoreAction,
};
use umbra_core::PipelineSettings;

/// Maximum number of cascades.
pub const MAX_CASCADES: usize = 4;

/// Per-cascade data uploaded for the primary light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeData {
    /// One matrix per cascade plus a final fallback slot.
    pub world_to_shadow: [Mat4; MAX_CASCADES + 1],
    /// Culling spheres as `(center, radius²)`.
    pub culling_spheres: [Vec4; MAX_CASCADES],
    /// Cascades whose fit succeeded and were drawn.
    pub rendered: usize,
}

/// A lane that renders the cascaded shadow map of the primary light.
#[derive(Debug, Default)]
pub struct CascadedShadowLane;

impl CascadedShadowLane {
    /// Creates a new `CascadedShadowLane`.
    pub fn new() -> Self {
        Self
    }

    /// Renders every cascade and binds the cascaded atlas.
    ///
    /// A cascade whose fit fails is skipped; its matrix and sphere stay
    /// zero so shaders never sample it.
    pub fn render<C: RenderContext>(
        &self,
        ctx: &mut C,
        cull: &C::Cull,
        frame: &mut FrameContext,
        settings: &PipelineSettings,
        cmd: &mut CommandBuffer,
    ) -> Result<CascadeData, LaneError> {
        let primary = frame
            .primary_light
            .ok_or_else(|| LaneError::missing("primary light"))?;
        let light = *cull
            .visible_lights()
            .get(primary)
            .ok_or_else(|| LaneError::missing("primary visible light"))?;

        let map_size = settings.shadow_map_size;
        let tile_size = map_size / CASCADE_GRID_SIDE as u32;
        let cascades = settings.shadow_cascades.min(MAX_CASCADES);

        let target = frame.targets.acquire_cascaded(ctx, map_size)?;
        cmd.set_render_target(
            target,
            LoadAction::DontCare,
            StoreAction::Store,
            ClearFlags::DEPTH,
        );
        cmd.begin_sample(SHADOW_SAMPLE);
        frame.global_shadow_data.tile_scale = 0.0;
        ctx.execute_command_buffer(cmd);
        cmd.clear();

        cmd.set_global_float(ShaderProperty::ShadowBias, light.shadow_bias);

        let mut data = CascadeData {
            world_to_shadow: [Mat4::ZERO; MAX_CASCADES + 1],
            culling_spheres: [Vec4::ZERO; MAX_CASCADES],
            rendered: 0,
        };
        data.world_to_shadow[MAX_CASCADES] = fallback_cascade_matrix(frame.reversed_z);

        for cascade in 0..cascades {
            let fit = cull.compute_directional_shadow_matrices(
                primary,
                cascade,
                cascades,
                settings.cascade_split,
                tile_size,
                light.shadow_near_plane,
            );
            let offset = configure_tile(cmd, cascade, CASCADE_GRID_SIDE, tile_size as f32);
            let Some(matrices) = fit else {
                log::warn!(
                    "CascadedShadowLane: cascade {} has no shadow fit, skipped",
                    cascade
                );
                continue;
            };

            cmd.set_view_projection(matrices.view, matrices.projection);
            ctx.execute_command_buffer(cmd);
            cmd.clear();

            let mut sphere = matrices.split.culling_sphere;
            sphere.w *= sphere.w;
            data.culling_spheres[cascade] = sphere;

            ctx.draw_shadows(
                cull,
                &ShadowDrawingSettings {
                    light_index: primary,
                    split_data: matrices.split,
                },
            );
            data.world_to_shadow[cascade] = cascade_tile_matrix(offset)
                * world_to_shadow(matrices.view, matrices.projection, frame.reversed_z);
            data.rendered += 1;
        }

        let hard = light.shadows == ShadowMode::Hard;
        cmd.disable_scissor();
        cmd.set_global_texture(ShaderProperty::CascadedShadowMap, target);
        cmd.set_global_matrix_array(
            ShaderProperty::CascadedWorldToShadowMatrices,
            &data.world_to_shadow,
        );
        cmd.set_global_vector(
            ShaderProperty::CascadedShadowMapSize,
            shadow_map_size_vector(map_size),
        );
        cmd.set_global_float(ShaderProperty::CascadedShadowStrength, light.shadow_strength);
        cmd.set_global_vector_array(ShaderProperty::CascadedCullingSpheres, &data.culling_spheres);
        cmd.set_keyword(ShaderKeyword::CascadedShadowsHard, hard);
        cmd.set_keyword(ShaderKeyword::CascadedShadowsSoft, !hard);
        cmd.end_sample(SHADOW_SAMPLE);
        ctx.execute_command_buffer(cmd);
        cmd.clear();

        Ok(data)
    }
}

impl Lane for CascadedShadowLane {
    fn strategy_name(&self) -> &'static str {
        "CascadedShadows"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Shadow
    }
}
