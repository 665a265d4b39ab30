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

// Umbra Sandbox
// Renders a few frames of a synthetic scene against a host that logs what
// the pipeline asks of it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use umbra_agents::render_agent::{FrameStats, RenderAgent};
use umbra_agents::variants::{ShaderVariant, VariantStripper};
use umbra_core::material::MaterialPreset;
use umbra_core::math::{degrees_to_radians, Aabb, LinearRgba, Mat4, Vec3};
use umbra_core::lane::Lane;
use umbra_core::renderer::{
    Camera, ClearFlags, CommandBuffer, CullingParameters, CullingResults, DrawingSettings,
    FilteringSettings, LightKind, RenderContext, ResourceError, ShaderKeyword,
    ShadowDrawingSettings, ShadowMapDescriptor, ShadowMode, TextureId, VisibleLight,
};
use umbra_core::{PipelineAsset, PipelineSettings};
use umbra_lanes::{SceneCullResults, SceneCuller};

const DEFAULT_ASSET: &str = "sandbox/assets/pipeline.ron";
const FRAMES: u32 = 3;

/// A host that culls with the software culler and logs every request.
struct LoggingHost {
    culler: SceneCuller,
    next_texture: u64,
    live_textures: Vec<TextureId>,
    commands_executed: usize,
    draws: usize,
}

impl LoggingHost {
    fn new(culler: SceneCuller) -> Self {
        log::info!(
            "host: {} lane '{}' over {} lights",
            culler.lane_kind(),
            culler.strategy_name(),
            culler.lights().len()
        );
        Self {
            culler,
            next_texture: 0,
            live_textures: Vec::new(),
            commands_executed: 0,
            draws: 0,
        }
    }
}

impl RenderContext for LoggingHost {
    type Cull = SceneCullResults;

    fn cull(&mut self, camera: &dyn Camera, params: &CullingParameters) -> SceneCullResults {
        let cull = self.culler.cull(params);
        log::debug!(
            "host: culled '{}', {} visible lights",
            camera.name(),
            cull.visible_lights().len()
        );
        cull
    }

    fn setup_camera_properties(&mut self, camera: &dyn Camera) {
        log::debug!("host: camera '{}' bound", camera.name());
    }

    fn execute_command_buffer(&mut self, buffer: &CommandBuffer) {
        self.commands_executed += buffer.commands().len();
        log::trace!(
            "host: executing '{}' ({} commands)",
            buffer.name(),
            buffer.commands().len()
        );
    }

    fn draw_renderers(
        &mut self,
        _cull: &SceneCullResults,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
    ) {
        self.draws += 1;
        log::debug!(
            "host: draw {:?} queues {:?} with {:?}",
            drawing.sorting,
            filtering.render_queue_range.as_range(),
            drawing.per_object_data
        );
    }

    fn draw_skybox(&mut self, _camera: &dyn Camera) {
        log::debug!("host: skybox");
    }

    fn draw_shadows(&mut self, _cull: &SceneCullResults, settings: &ShadowDrawingSettings) {
        self.draws += 1;
        log::debug!(
            "host: shadow casters for light {} (sphere {:?})",
            settings.light_index,
            settings.split_data.culling_sphere
        );
    }

    fn submit(&mut self) {
        log::debug!("host: submit");
    }

    fn get_temporary_shadow_map(
        &mut self,
        descriptor: &ShadowMapDescriptor<'_>,
    ) -> Result<TextureId, ResourceError> {
        self.next_texture += 1;
        let texture = TextureId(self.next_texture);
        self.live_textures.push(texture);
        log::debug!(
            "host: '{}' {}x{} acquired as {:?}",
            descriptor.label,
            descriptor.size,
            descriptor.size,
            texture
        );
        Ok(texture)
    }

    fn release_temporary_texture(&mut self, texture: TextureId) {
        self.live_textures.retain(|t| *t != texture);
        log::debug!("host: {:?} released", texture);
    }

    fn uses_reversed_z(&self) -> bool {
        true
    }
}

/// A camera circling the origin.
struct OrbitCamera {
    name: String,
    angle: f32,
    distance: f32,
}

impl OrbitCamera {
    fn position(&self) -> Vec3 {
        Vec3::new(
            self.angle.sin() * self.distance,
            4.0,
            self.angle.cos() * self.distance,
        )
    }
}

impl Camera for OrbitCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn culling_parameters(&self) -> Option<CullingParameters> {
        let eye = self.position();
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y)?;
        CullingParameters::perspective(view, eye, degrees_to_radians(60.0), 16.0 / 9.0, 0.3, 200.0)
    }

    fn far_clip_plane(&self) -> f32 {
        200.0
    }

    fn clear_flags(&self) -> ClearFlags {
        ClearFlags::DEPTH | ClearFlags::COLOR
    }

    fn background_color(&self) -> LinearRgba {
        LinearRgba::from_srgb(0.19, 0.3, 0.47)
    }
}

fn build_scene() -> SceneCuller {
    let mut culler = SceneCuller::new();

    let sun = Mat4::from_rotation_y(degrees_to_radians(30.0))
        * Mat4::from_rotation_x(degrees_to_radians(130.0));
    culler.add_light(
        VisibleLight::new(LightKind::Directional, sun, LinearRgba::rgb(1.0, 0.95, 0.85) * 1.2)
            .with_shadows(ShadowMode::Soft, 0.9),
    );

    for (i, x) in [-6.0f32, 0.0, 6.0].into_iter().enumerate() {
        let mut lamp = VisibleLight::new(
            LightKind::Point,
            Mat4::from_translation(Vec3::new(x, 2.0, -3.0)),
            LinearRgba::rgb(1.0, 0.6, 0.3) * 2.0,
        );
        lamp.range = 8.0;
        if i == 1 {
            lamp = lamp.with_shadows(ShadowMode::Hard, 1.0);
        }
        culler.add_light(lamp);
    }

    let spot_transform = Mat4::from_translation(Vec3::new(0.0, 8.0, 2.0))
        * Mat4::from_rotation_x(degrees_to_radians(90.0));
    let mut spot = VisibleLight::new(LightKind::Spot, spot_transform, LinearRgba::WHITE * 3.0)
        .with_shadows(ShadowMode::Hard, 1.0);
    spot.range = 15.0;
    spot.spot_angle = 50.0;
    culler.add_light(spot);

    culler.add_caster(Aabb::from_center_half_extents(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(20.0, 0.5, 20.0),
    ));
    for x in [-4.0f32, 0.0, 4.0] {
        culler.add_caster(Aabb::from_center_half_extents(
            Vec3::new(x, 1.0, 0.0),
            Vec3::ONE,
        ));
    }
    culler
}

fn load_settings() -> Result<PipelineSettings> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET));
    let asset = if path.exists() {
        PipelineAsset::load(&path)
            .with_context(|| format!("loading pipeline asset {}", path.display()))?
    } else {
        log::warn!("{} not found, using the default pipeline asset", path.display());
        PipelineAsset::default()
    };
    Ok(PipelineSettings::from_asset(&asset))
}

fn strip_variants(settings: &PipelineSettings) {
    let combos = [
        vec![],
        vec![ShaderKeyword::ShadowsHard],
        vec![ShaderKeyword::ShadowsSoft],
        vec![ShaderKeyword::CascadedShadowsHard],
        vec![ShaderKeyword::CascadedShadowsSoft],
        vec![ShaderKeyword::ShadowsHard, ShaderKeyword::CascadedShadowsHard],
    ];
    let mut stripper = VariantStripper::new(Some(settings));
    for preset in MaterialPreset::ALL {
        let material = preset.settings();
        let mut variants: Vec<ShaderVariant> = combos
            .iter()
            .map(|combo| {
                ShaderVariant::new(
                    format!("Umbra/Lit ({:?})", preset),
                    combo.iter().copied().chain(material.enabled_keywords()),
                )
            })
            .collect();
        stripper.strip(&mut variants);
    }
    stripper.report();
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    strip_variants(&settings);

    let mut agent = RenderAgent::new(settings);
    let mut host = LoggingHost::new(build_scene());
    let mut cameras = vec![
        OrbitCamera {
            name: "main".to_string(),
            angle: 0.0,
            distance: 18.0,
        },
        OrbitCamera {
            name: "overview".to_string(),
            angle: 2.0,
            distance: 35.0,
        },
    ];

    let mut totals = FrameStats::default();
    for _ in 0..FRAMES {
        let views: Vec<&dyn Camera> = cameras.iter().map(|c| c as &dyn Camera).collect();
        agent.render_frame(&mut host, &views)?;
        totals.accumulate(&agent.last_frame_stats());
        for camera in &mut cameras {
            camera.angle += 0.4;
        }
    }

    log::info!(
        "rendered {} frames: {:?}, {} commands, {} draws, {} targets still held",
        agent.frame_count(),
        totals,
        host.commands_executed,
        host.draws,
        host.live_textures.len()
    );
    Ok(())
}
