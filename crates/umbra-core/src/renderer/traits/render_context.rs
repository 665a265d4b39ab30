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

//! The host contract: culling, command execution, draws and temporary targets.

use super::{Camera, CullingParameters, CullingResults};
use crate::math::LinearRgba;
use crate::renderer::api::{
    CommandBuffer, DrawingSettings, FilteringSettings, ShadowDrawingSettings, ShadowMapDescriptor,
    TextureId,
};
use crate::renderer::error::ResourceError;
use serde::{Deserialize, Serialize};

/// The host's shadowmask quality setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShadowmaskMode {
    /// Baked occlusion everywhere.
    #[default]
    Shadowmask,
    /// Realtime shadows up to the shadow distance, baked occlusion beyond.
    DistanceShadowmask,
}

/// Everything the pipeline needs from the engine hosting it.
///
/// Calls arrive in submission order; the host must replay executed command
/// buffers and draws in the order it receives them.
pub trait RenderContext {
    /// The host's culling output.
    type Cull: CullingResults;

    /// Culls the scene for `camera`.
    fn cull(&mut self, camera: &dyn Camera, params: &CullingParameters) -> Self::Cull;

    /// Binds the camera's view, projection and render target.
    fn setup_camera_properties(&mut self, camera: &dyn Camera);

    /// Queues a copy of the buffer's commands.
    fn execute_command_buffer(&mut self, buffer: &CommandBuffer);

    /// Draws the visible renderers that pass `filtering`.
    fn draw_renderers(
        &mut self,
        cull: &Self::Cull,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
    );

    /// Draws the camera's skybox.
    fn draw_skybox(&mut self, camera: &dyn Camera);

    /// Draws the shadow casters of one light slice.
    fn draw_shadows(&mut self, cull: &Self::Cull, settings: &ShadowDrawingSettings);

    /// Flushes everything queued so far to the device.
    fn submit(&mut self);

    /// Acquires a temporary depth target.
    fn get_temporary_shadow_map(
        &mut self,
        descriptor: &ShadowMapDescriptor<'_>,
    ) -> Result<TextureId, ResourceError>;

    /// Returns a temporary target to the host.
    fn release_temporary_texture(&mut self, texture: TextureId);

    /// Whether the device uses a reversed depth buffer.
    fn uses_reversed_z(&self) -> bool;

    /// The shadowmask quality setting.
    fn shadowmask_mode(&self) -> ShadowmaskMode {
        ShadowmaskMode::Shadowmask
    }

    /// Shadow tint for subtractive mixed lighting, in linear space.
    fn subtractive_shadow_color(&self) -> LinearRgba {
        LinearRgba::from_srgb(0.42, 0.478, 0.627)
    }
}
