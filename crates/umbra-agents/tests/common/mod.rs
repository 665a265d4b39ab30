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

//! A recording mock host shared by the agent integration tests.

#![allow(dead_code)]

use umbra_core::math::{Aabb, LinearRgba, Mat4, Vec3, Vec4};
use umbra_core::renderer::{
    Camera, ClearFlags, CommandBuffer, CullingParameters, CullingResults, DrawingSettings,
    FilteringSettings, LightKind, RenderCommand, RenderContext, ResourceError, ShaderProperty,
    ShadowDrawingSettings, ShadowMapDescriptor, ShadowMatrices, ShadowMode, ShadowSplitData,
    TextureId, VisibleLight,
};

// ─────────────────────────────────────────────────────────────────────────────
// Culling results
// ─────────────────────────────────────────────────────────────────────────────

/// Culling results with canned, easily recognisable shadow fits.
#[derive(Debug, Clone, Default)]
pub struct MockCullingResults {
    pub lights: Vec<VisibleLight>,
    pub map: Vec<i32>,
    /// Every shadowed light has casters.
    pub casters: bool,
    /// Point lights get a shadow fit.
    pub point_shadows: bool,
}

impl MockCullingResults {
    pub fn new(lights: Vec<VisibleLight>) -> Self {
        let map = (0..lights.len() as i32).collect();
        Self {
            lights,
            map,
            casters: true,
            point_shadows: false,
        }
    }

    fn fit(&self, light_index: usize, slice: usize) -> Option<ShadowMatrices> {
        self.casters.then(|| {
            let offset = light_index as f32 + 10.0 * slice as f32;
            ShadowMatrices {
                view: Mat4::from_translation(Vec3::new(offset, 1.0, 0.0)),
                projection: Mat4::IDENTITY,
                split: ShadowSplitData {
                    culling_sphere: Vec4::new(offset, 0.0, 0.0, 2.0 + slice as f32),
                },
            }
        })
    }
}

impl CullingResults for MockCullingResults {
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
        self.fit(light_index, cascade_index)
    }

    fn compute_spot_shadow_matrices(&self, light_index: usize) -> Option<ShadowMatrices> {
        self.fit(light_index, 0)
    }

    fn compute_point_shadow_matrices(&self, light_index: usize) -> Option<ShadowMatrices> {
        if self.point_shadows {
            self.fit(light_index, 0)
        } else {
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Host
// ─────────────────────────────────────────────────────────────────────────────

/// One call the pipeline made on the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Cull(String),
    SetupCamera(String),
    Execute {
        buffer: String,
        commands: Vec<RenderCommand>,
    },
    DrawRenderers {
        drawing: DrawingSettings,
        filtering: FilteringSettings,
        light_index_map: Vec<i32>,
    },
    DrawSkybox,
    DrawShadows(ShadowDrawingSettings),
    Submit,
    Acquire(TextureId),
    Release(TextureId),
}

/// A host that records every call and culls to a fixed scene.
#[derive(Debug, Default)]
pub struct MockRenderContext {
    pub scene: MockCullingResults,
    pub calls: Vec<Call>,
    pub reversed_z: bool,
    /// Allocations succeed this many times, then fail.
    pub allocations_before_failure: Option<usize>,
    pub allocations: usize,
}

impl MockRenderContext {
    pub fn new(scene: MockCullingResults) -> Self {
        Self {
            scene,
            ..Default::default()
        }
    }

    /// Every executed command, flattened in submission order.
    pub fn commands(&self) -> Vec<RenderCommand> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Execute { commands, .. } => Some(commands.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn shadow_draws(&self) -> Vec<ShadowDrawingSettings> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::DrawShadows(settings) => Some(*settings),
                _ => None,
            })
            .collect()
    }

    pub fn renderer_draws(&self) -> Vec<(DrawingSettings, FilteringSettings, Vec<i32>)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::DrawRenderers {
                    drawing,
                    filtering,
                    light_index_map,
                } => Some((drawing.clone(), *filtering, light_index_map.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// The last vector array uploaded for `property`.
    pub fn vector_array(&self, property: ShaderProperty) -> Option<Vec<Vec4>> {
        self.commands().into_iter().rev().find_map(|command| match command {
            RenderCommand::SetGlobalVectorArray(p, values) if p == property => Some(values),
            _ => None,
        })
    }

    /// The last matrix array uploaded for `property`.
    pub fn matrix_array(&self, property: ShaderProperty) -> Option<Vec<Mat4>> {
        self.commands().into_iter().rev().find_map(|command| match command {
            RenderCommand::SetGlobalMatrixArray(p, values) if p == property => Some(values),
            _ => None,
        })
    }

    /// The last vector uploaded for `property`.
    pub fn vector(&self, property: ShaderProperty) -> Option<Vec4> {
        self.commands().into_iter().rev().find_map(|command| match command {
            RenderCommand::SetGlobalVector(p, value) if p == property => Some(value),
            _ => None,
        })
    }
}

impl RenderContext for MockRenderContext {
    type Cull = MockCullingResults;

    fn cull(&mut self, camera: &dyn Camera, _params: &CullingParameters) -> MockCullingResults {
        self.calls.push(Call::Cull(camera.name().to_string()));
        self.scene.clone()
    }

    fn setup_camera_properties(&mut self, camera: &dyn Camera) {
        self.calls.push(Call::SetupCamera(camera.name().to_string()));
    }

    fn execute_command_buffer(&mut self, buffer: &CommandBuffer) {
        self.calls.push(Call::Execute {
            buffer: buffer.name().to_string(),
            commands: buffer.commands().to_vec(),
        });
    }

    fn draw_renderers(
        &mut self,
        cull: &MockCullingResults,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
    ) {
        self.calls.push(Call::DrawRenderers {
            drawing: drawing.clone(),
            filtering: *filtering,
            light_index_map: cull.light_index_map(),
        });
    }

    fn draw_skybox(&mut self, _camera: &dyn Camera) {
        self.calls.push(Call::DrawSkybox);
    }

    fn draw_shadows(&mut self, _cull: &MockCullingResults, settings: &ShadowDrawingSettings) {
        self.calls.push(Call::DrawShadows(*settings));
    }

    fn submit(&mut self) {
        self.calls.push(Call::Submit);
    }

    fn get_temporary_shadow_map(
        &mut self,
        descriptor: &ShadowMapDescriptor<'_>,
    ) -> Result<TextureId, ResourceError> {
        if self
            .allocations_before_failure
            .is_some_and(|limit| self.allocations >= limit)
        {
            return Err(ResourceError::AllocationFailed {
                label: descriptor.label.to_string(),
                details: "pool exhausted".to_string(),
            });
        }
        self.allocations += 1;
        let texture = TextureId(self.allocations as u64);
        self.calls.push(Call::Acquire(texture));
        Ok(texture)
    }

    fn release_temporary_texture(&mut self, texture: TextureId) {
        self.calls.push(Call::Release(texture));
    }

    fn uses_reversed_z(&self) -> bool {
        self.reversed_z
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cameras and lights
// ─────────────────────────────────────────────────────────────────────────────

/// A camera with fixed parameters.
pub struct MockCamera {
    pub name: String,
    pub params: Option<CullingParameters>,
    pub clear_flags: ClearFlags,
}

impl MockCamera {
    pub fn new(name: &str) -> Self {
        let eye = Vec3::new(0.0, 2.0, 10.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y).expect("valid view");
        Self {
            name: name.to_string(),
            params: CullingParameters::perspective(view, eye, 1.0, 16.0 / 9.0, 0.3, 100.0),
            clear_flags: ClearFlags::DEPTH | ClearFlags::COLOR,
        }
    }

    pub fn degenerate(name: &str) -> Self {
        Self {
            params: None,
            ..Self::new(name)
        }
    }

    pub fn with_far_plane(mut self, far: f32) -> Self {
        if let Some(params) = self.params.as_mut() {
            params.far_plane = far;
        }
        self
    }
}

impl Camera for MockCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn culling_parameters(&self) -> Option<CullingParameters> {
        self.params
    }

    fn far_clip_plane(&self) -> f32 {
        self.params.map_or(0.0, |p| p.far_plane)
    }

    fn clear_flags(&self) -> ClearFlags {
        self.clear_flags
    }

    fn background_color(&self) -> LinearRgba {
        LinearRgba::rgb(0.1, 0.2, 0.3)
    }
}

pub fn directional(shadows: ShadowMode) -> VisibleLight {
    VisibleLight::new(
        LightKind::Directional,
        Mat4::from_rotation_x(1.0),
        LinearRgba::WHITE,
    )
    .with_shadows(shadows, 0.9)
}

pub fn point(x: f32, shadows: ShadowMode) -> VisibleLight {
    VisibleLight::new(
        LightKind::Point,
        Mat4::from_translation(Vec3::new(x, 0.0, 0.0)),
        LinearRgba::rgb(1.0, 0.5, 0.25),
    )
    .with_shadows(shadows, 1.0)
}

pub fn spot(spot_angle: f32, shadows: ShadowMode) -> VisibleLight {
    let mut light = VisibleLight::new(LightKind::Spot, Mat4::IDENTITY, LinearRgba::WHITE)
        .with_shadows(shadows, 1.0);
    light.spot_angle = spot_angle;
    light
}
