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

//! Defines the RenderAgent, the per-frame orchestrator of the pipeline.

use super::FrameStats;
use umbra_core::lane::{Lane, LaneError};
use umbra_core::math::Vec4;
use umbra_core::renderer::{
    Camera, CommandBuffer, CullingResults, RenderContext, RenderError, ShaderKeyword,
    ShaderProperty,
};
use umbra_core::{PipelineAsset, PipelineSettings};
use umbra_lanes::{
    CascadedShadowLane, ForwardPassLane, FrameContext, LightPackingLane, LightUniformSet,
    ShadowAtlasLane,
};

/// Keywords owned by the shadow lanes, disabled when a camera has no lights.
const SHADOW_KEYWORDS: [ShaderKeyword; 4] = [
    ShaderKeyword::CascadedShadowsHard,
    ShaderKeyword::CascadedShadowsSoft,
    ShaderKeyword::ShadowsHard,
    ShaderKeyword::ShadowsSoft,
];

/// The agent that renders every camera of a frame, in order.
pub struct RenderAgent {
    // `None` turns the agent into a pass-through.
    settings: Option<PipelineSettings>,
    // Reused every camera, flushed after each pass.
    camera_buffer: CommandBuffer,
    shadow_buffer: CommandBuffer,
    // Arena of per-light slots, overwritten every camera.
    uniforms: LightUniformSet,
    light_lane: LightPackingLane,
    atlas_lane: ShadowAtlasLane,
    cascade_lane: CascadedShadowLane,
    forward_lane: ForwardPassLane,
    frame_count: u64,
    last_frame_stats: FrameStats,
    warned_unconfigured: bool,
}

impl RenderAgent {
    /// Creates an agent rendering with `settings`.
    pub fn new(settings: PipelineSettings) -> Self {
        log::info!(
            "RenderAgent: pipeline created ({} px shadow map, {} cascades, {} shadow distance)",
            settings.shadow_map_size,
            settings.shadow_cascades,
            settings.shadow_distance
        );
        Self::with_settings(Some(settings))
    }

    /// Creates an agent from a persisted pipeline asset.
    pub fn from_asset(asset: &PipelineAsset) -> Self {
        Self::new(PipelineSettings::from_asset(asset))
    }

    /// Creates an agent with no pipeline configuration bound. It renders nothing.
    pub fn unconfigured() -> Self {
        Self::with_settings(None)
    }

    fn with_settings(settings: Option<PipelineSettings>) -> Self {
        let agent = Self {
            settings,
            camera_buffer: CommandBuffer::new("Render Camera"),
            shadow_buffer: CommandBuffer::new("Render Shadows"),
            uniforms: LightUniformSet::new(),
            light_lane: LightPackingLane::new(),
            atlas_lane: ShadowAtlasLane::new(),
            cascade_lane: CascadedShadowLane::new(),
            forward_lane: ForwardPassLane::new(),
            frame_count: 0,
            last_frame_stats: FrameStats::default(),
            warned_unconfigured: false,
        };
        log::debug!(
            "RenderAgent: lanes {}",
            agent
                .lanes()
                .iter()
                .map(|lane| format!("{}({})", lane.strategy_name(), lane.lane_kind()))
                .collect::<Vec<_>>()
                .join(" -> ")
        );
        agent
    }

    /// The lanes run for every camera, in execution order.
    pub fn lanes(&self) -> [&dyn Lane; 4] {
        [
            &self.light_lane,
            &self.cascade_lane,
            &self.atlas_lane,
            &self.forward_lane,
        ]
    }

    /// Replaces the forward pass lane, e.g. to force the error fallback pass.
    #[must_use]
    pub fn with_forward_lane(mut self, lane: ForwardPassLane) -> Self {
        self.forward_lane = lane;
        self
    }

    /// The bound settings, if any.
    pub fn settings(&self) -> Option<&PipelineSettings> {
        self.settings.as_ref()
    }

    /// Frames rendered since creation.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Counters of the last completed frame.
    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_frame_stats
    }

    /// The light slots packed for the last rendered camera.
    pub fn light_uniforms(&self) -> &LightUniformSet {
        &self.uniforms
    }

    /// Renders `cameras` in order.
    ///
    /// Degenerate cameras are skipped. A temporary target allocation failure
    /// aborts the frame after releasing everything the failing camera held.
    pub fn render_frame<C: RenderContext>(
        &mut self,
        ctx: &mut C,
        cameras: &[&dyn Camera],
    ) -> Result<(), RenderError> {
        let Some(settings) = self.settings else {
            if !self.warned_unconfigured {
                log::warn!("RenderAgent: no pipeline settings bound, rendering nothing");
                self.warned_unconfigured = true;
            }
            return Ok(());
        };

        let mut stats = FrameStats::default();
        for camera in cameras {
            self.render_camera(ctx, *camera, &settings, &mut stats)?;
        }

        self.frame_count += 1;
        self.last_frame_stats = stats;
        log::trace!("RenderAgent: frame {} done, {:?}", self.frame_count, stats);
        Ok(())
    }

    fn render_camera<C: RenderContext>(
        &mut self,
        ctx: &mut C,
        camera: &dyn Camera,
        settings: &PipelineSettings,
        stats: &mut FrameStats,
    ) -> Result<(), RenderError> {
        let Some(mut params) = camera
            .culling_parameters()
            .filter(|params| !params.is_degenerate())
        else {
            log::debug!(
                "RenderAgent: camera '{}' has degenerate culling parameters, skipped",
                camera.name()
            );
            stats.cameras_skipped += 1;
            return Ok(());
        };
        params.shadow_distance = settings.shadow_distance.min(camera.far_clip_plane());

        let mut cull = ctx.cull(camera, &params);
        let mut frame = FrameContext::new(settings, params.shadow_distance, ctx);

        let result = self.draw_camera(ctx, camera, &mut cull, &mut frame, settings, stats);
        frame.targets.release(ctx);

        if let Err(err) = result {
            self.camera_buffer.clear();
            self.shadow_buffer.clear();
            log::error!("RenderAgent: camera '{}' aborted: {}", camera.name(), err);
            return Err(err.into());
        }
        stats.cameras_rendered += 1;
        Ok(())
    }

    fn draw_camera<C: RenderContext>(
        &mut self,
        ctx: &mut C,
        camera: &dyn Camera,
        cull: &mut C::Cull,
        frame: &mut FrameContext,
        settings: &PipelineSettings,
        stats: &mut FrameStats,
    ) -> Result<(), LaneError> {
        let light_count = cull.visible_lights().len();
        stats.visible_lights += light_count as u32;

        if light_count > 0 {
            self.light_lane.pack(
                cull,
                &mut self.uniforms,
                frame,
                settings,
                &mut self.camera_buffer,
            );

            if frame.primary_light.is_some() {
                let cascades = self
                    .cascade_lane
                    .render(ctx, cull, frame, settings, &mut self.shadow_buffer)
                    .map_err(|err| lane_failed(&self.cascade_lane, err))?;
                stats.cascades_rendered += cascades.rendered as u32;
            } else {
                self.camera_buffer
                    .disable_keyword(ShaderKeyword::CascadedShadowsHard);
                self.camera_buffer
                    .disable_keyword(ShaderKeyword::CascadedShadowsSoft);
            }

            if frame.shadow_tile_count > 0 {
                let tiles = self
                    .atlas_lane
                    .render(
                        ctx,
                        cull,
                        &mut self.uniforms,
                        frame,
                        settings,
                        &mut self.shadow_buffer,
                    )
                    .map_err(|err| lane_failed(&self.atlas_lane, err))?;
                stats.shadow_tiles += tiles as u32;
            } else {
                self.camera_buffer.disable_keyword(ShaderKeyword::ShadowsHard);
                self.camera_buffer.disable_keyword(ShaderKeyword::ShadowsSoft);
            }
        } else {
            self.uniforms.reset(0);
            self.camera_buffer
                .set_global_vector(ShaderProperty::LightIndicesOffsetAndCount, Vec4::ZERO);
            for keyword in SHADOW_KEYWORDS {
                self.camera_buffer.disable_keyword(keyword);
            }
        }

        self.forward_lane.render(
            ctx,
            camera,
            cull,
            &self.uniforms,
            frame,
            settings,
            &mut self.camera_buffer,
        );
        ctx.submit();
        Ok(())
    }
}

fn lane_failed(lane: &dyn Lane, err: LaneError) -> LaneError {
    log::error!(
        "RenderAgent: {} lane '{}' failed: {}",
        lane.lane_kind(),
        lane.strategy_name(),
        err
    );
    err
}

impl Default for RenderAgent {
    fn default() -> Self {
        Self::new(PipelineSettings::default())
    }
}
