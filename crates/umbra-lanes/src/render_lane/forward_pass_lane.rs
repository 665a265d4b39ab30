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

//! Implements the forward rendering strategy.
//!
//! The `ForwardPassLane` uploads the packed light arrays and the global
//! shadow vector, then draws opaque geometry, the skybox and transparent
//! geometry, in that order. Debug builds add a final pass that draws objects
//! which only provide legacy shader passes with the error material.

use crate::frame::FrameContext;
use crate::light_lane::LightUniformSet;
use umbra_core::lane::{Lane, LaneKind};
use umbra_core::material::RenderQueueRange;
use umbra_core::renderer::{
    Camera, ClearFlags, CommandBuffer, DrawingSettings, FilteringSettings, OverrideMaterial,
    PerObjectData, RenderContext, ShaderPass, ShaderProperty, SortingCriteria,
};
use umbra_core::PipelineSettings;

/// Profiler sample wrapping a camera's draws.
pub const CAMERA_SAMPLE: &str = "Render Camera";

/// A lane that draws one camera's renderers in a single lit forward pass.
#[derive(Debug)]
pub struct ForwardPassLane {
    draw_error_fallback: bool,
}

impl Default for ForwardPassLane {
    fn default() -> Self {
        Self::new()
    }
}

impl ForwardPassLane {
    /// Creates a new `ForwardPassLane`. The error fallback pass follows the
    /// build profile.
    pub fn new() -> Self {
        Self {
            draw_error_fallback: cfg!(debug_assertions),
        }
    }

    /// Overrides whether unsupported materials are drawn with the error material.
    #[must_use]
    pub fn with_error_fallback(mut self, enabled: bool) -> Self {
        self.draw_error_fallback = enabled;
        self
    }

    /// Returns `true` if the error fallback pass is drawn.
    pub fn draws_error_fallback(&self) -> bool {
        self.draw_error_fallback
    }

    /// Records and issues the camera's draws. Returns the number of
    /// renderer-list draws issued.
    ///
    /// Dynamic batching and instancing apply to the opaque draw as well as
    /// the transparent one, so both lit draws share the same batching state.
    #[allow(clippy::too_many_arguments)]
    pub fn render<C: RenderContext>(
        &self,
        ctx: &mut C,
        camera: &dyn Camera,
        cull: &C::Cull,
        uniforms: &LightUniformSet,
        frame: &FrameContext,
        settings: &PipelineSettings,
        cmd: &mut CommandBuffer,
    ) -> usize {
        ctx.setup_camera_properties(camera);

        let clear = camera.clear_flags();
        cmd.clear_render_target(
            clear.contains(ClearFlags::DEPTH),
            clear.contains(ClearFlags::COLOR),
            camera.background_color(),
        );
        cmd.begin_sample(CAMERA_SAMPLE);
        cmd.set_global_vector_array(ShaderProperty::VisibleLightColors, &uniforms.colors);
        cmd.set_global_vector_array(
            ShaderProperty::VisibleLightDirectionsOrPositions,
            &uniforms.directions_or_positions,
        );
        cmd.set_global_vector_array(
            ShaderProperty::VisibleLightAttenuations,
            &uniforms.attenuations,
        );
        cmd.set_global_vector_array(
            ShaderProperty::VisibleLightSpotDirections,
            &uniforms.spot_directions,
        );
        cmd.set_global_vector_array(
            ShaderProperty::VisibleLightOcclusionMasks,
            &uniforms.occlusion_masks,
        );
        cmd.set_global_vector(
            ShaderProperty::GlobalShadowData,
            frame.global_shadow_data.to_vec4(),
        );
        ctx.execute_command_buffer(cmd);
        cmd.clear();

        let mut per_object_data = PerObjectData::BAKED_LIGHTING;
        if frame.visible_light_count > 0 {
            per_object_data |= PerObjectData::LIGHT_INDICES;
        }

        let lit = |sorting| DrawingSettings {
            per_object_data,
            enable_dynamic_batching: settings.dynamic_batching,
            enable_instancing: settings.instancing,
            ..DrawingSettings::new(ShaderPass::FORWARD, sorting)
        };

        ctx.draw_renderers(
            cull,
            &lit(SortingCriteria::CommonOpaque),
            &FilteringSettings::new(RenderQueueRange::OPAQUE),
        );
        ctx.draw_skybox(camera);
        ctx.draw_renderers(
            cull,
            &lit(SortingCriteria::CommonTransparent),
            &FilteringSettings::new(RenderQueueRange::TRANSPARENT),
        );
        let mut draws = 2;

        if self.draw_error_fallback {
            let error = DrawingSettings {
                passes: ShaderPass::LEGACY.to_vec(),
                override_material: Some(OverrideMaterial::Error),
                ..DrawingSettings::new(ShaderPass::LEGACY[0], SortingCriteria::None)
            };
            ctx.draw_renderers(
                cull,
                &error,
                &FilteringSettings::new(RenderQueueRange::OPAQUE),
            );
            draws += 1;
        }

        cmd.end_sample(CAMERA_SAMPLE);
        ctx.execute_command_buffer(cmd);
        cmd.clear();
        draws
    }
}

impl Lane for ForwardPassLane {
    fn strategy_name(&self) -> &'static str {
        "ForwardPass"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Render
    }
}
