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

//! Fakes shared by the lane tests.

use umbra_core::math::{Aabb, LinearRgba, Mat4, Vec3, Vec4};
use umbra_core::renderer::{
    Camera, ClearFlags, CommandBuffer, CullingParameters, CullingResults, DrawingSettings,
    FilteringSettings, RenderCommand, RenderContext, ResourceError, ShadowDrawingSettings,
    ShadowMapDescriptor, ShadowMatrices, ShadowSplitData, TextureId, VisibleLight,
};

/// Culling results with canned shadow fits.
#[derive(Debug, Clone)]
pub struct FakeCull {
    pub lights: Vec<VisibleLight>,
    pub map: Vec<i32>,
    pub casters: bool,
    /// Cascade indices whose directional fit fails.
    pub failing_cascades: Vec<usize>,
}

impl FakeCull {
    pub fn new(lights: Vec<VisibleLight>) -> Self {
        let map = (0..lights.len() as i32).collect();
        Self {
            lights,
            map,
            casters: false,
            failing_cascades: Vec::new(),
        }
    }

    pub fn with_casters(mut self) -> Self {
        self.casters = true;
        self
    }

    fn fit(&self, light_index: usize, slice: usize) -> Option<ShadowMatrices> {
        if !self.casters {
            return None;
        }
        let offset = light_index as f32 + slice as f32 * 10.0;
        Some(ShadowMatrices {
            view: Mat4::from_translation(Vec3::new(offset, 0.0, 0.0)),
            projection: Mat4::IDENTITY,
            split: ShadowSplitData {
                culling_sphere: Vec4::new(offset, 0.0, 0.0, 3.0),
            },
        })
    }
}

impl CullingResults for FakeCull {
    fn visible_lights(&self) -> &[VisibleLight] {
        &self.lights
    }

    fn shadow_caster_bounds(&self, _light_index: usize) -> Option<Aabb> {
        self.casters
            .then(|| Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE))
    }

    fn light_index_map(&self) -> Vec<i32> {
        self.map.clone()
    }

    fn set_light_index_map(&mut self, map: Vec<i32>) {
        self.map = map;
    }

    fn compute_directional_shadow_matrices(
        &self,
        light_index: usize,
        cascade_index: usize,
        _cascade_count: usize,
        _split_ratio: Vec3,
        _resolution: u32,
        _near_plane: f32,
    ) -> Option<ShadowMatrices> {
        if self.failing_cascades.contains(&cascade_index) {
            return None;
        }
        self.fit(light_index, cascade_index)
    }

    fn compute_spot_shadow_matrices(&self, light_index: usize) -> Option<ShadowMatrices> {
        self.fit(light_index, 0)
    }
}

/// What the pipeline asked the host to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Setup,
    Execute(Vec<RenderCommand>),
    Draw(DrawingSettings, FilteringSettings),
    Skybox,
    Shadows(ShadowDrawingSettings),
    Submit,
    Acquire(u32),
    Release(TextureId),
}

/// A host that records every call.
#[derive(Debug, Default)]
pub struct RecordingContext {
    pub events: Vec<Event>,
    pub reversed_z: bool,
    pub fail_allocation: bool,
    pub next_texture: u64,
}

impl RecordingContext {
    pub fn commands(&self) -> Vec<RenderCommand> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Execute(c) => Some(c.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn shadow_draws(&self) -> Vec<ShadowDrawingSettings> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Shadows(s) => Some(*s),
                _ => None,
            })
            .collect()
    }
}

impl RenderContext for RecordingContext {
    type Cull = FakeCull;

    fn cull(&mut self, _camera: &dyn Camera, _params: &CullingParameters) -> FakeCull {
        FakeCull::new(Vec::new())
    }

    fn setup_camera_properties(&mut self, _camera: &dyn Camera) {
        self.events.push(Event::Setup);
    }

    fn execute_command_buffer(&mut self, buffer: &CommandBuffer) {
        self.events.push(Event::Execute(buffer.commands().to_vec()));
    }

    fn draw_renderers(
        &mut self,
        _cull: &FakeCull,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
    ) {
        self.events.push(Event::Draw(drawing.clone(), *filtering));
    }

    fn draw_skybox(&mut self, _camera: &dyn Camera) {
        self.events.push(Event::Skybox);
    }

    fn draw_shadows(&mut self, _cull: &FakeCull, settings: &ShadowDrawingSettings) {
        self.events.push(Event::Shadows(*settings));
    }

    fn submit(&mut self) {
        self.events.push(Event::Submit);
    }

    fn get_temporary_shadow_map(
        &mut self,
        descriptor: &ShadowMapDescriptor<'_>,
    ) -> Result<TextureId, ResourceError> {
        if self.fail_allocation {
            return Err(ResourceError::AllocationFailed {
                label: descriptor.label.to_string(),
                details: "out of memory".to_string(),
            });
        }
        self.events.push(Event::Acquire(descriptor.size));
        self.next_texture += 1;
        Ok(TextureId(self.next_texture))
    }

    fn release_temporary_texture(&mut self, texture: TextureId) {
        self.events.push(Event::Release(texture));
    }

    fn uses_reversed_z(&self) -> bool {
        self.reversed_z
    }
}

/// A camera with a fixed clear state.
pub struct FakeCamera;

impl Camera for FakeCamera {
    fn name(&self) -> &str {
        "fake"
    }

    fn culling_parameters(&self) -> Option<CullingParameters> {
        None
    }

    fn far_clip_plane(&self) -> f32 {
        100.0
    }

    fn clear_flags(&self) -> ClearFlags {
        ClearFlags::DEPTH
    }

    fn background_color(&self) -> LinearRgba {
        LinearRgba::BLACK
    }
}
