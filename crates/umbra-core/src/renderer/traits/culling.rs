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

//! The culling-result contract the lanes read lights and shadow fits from.

use crate::math::{Aabb, Mat4, Vec3};
use crate::renderer::api::ShadowSplitData;
use crate::renderer::light::VisibleLight;

/// View and projection for one shadow slice, plus its culling data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowMatrices {
    /// World-to-light-view matrix.
    pub view: Mat4,
    /// Light projection.
    pub projection: Mat4,
    /// Culling sphere of the slice.
    pub split: ShadowSplitData,
}

/// The outcome of culling for one camera.
///
/// Light indices always refer to positions in [`visible_lights`](Self::visible_lights).
pub trait CullingResults {
    /// Visible lights, in culling order.
    fn visible_lights(&self) -> &[VisibleLight];

    /// Bounds of the shadow casters affecting light `light_index`, or `None`
    /// if nothing visible casts a shadow for it.
    fn shadow_caster_bounds(&self, light_index: usize) -> Option<Aabb>;

    /// The per-object light index remap, one entry per visible light.
    /// An entry of `-1` hides that light from per-object lighting.
    fn light_index_map(&self) -> Vec<i32>;

    /// Replaces the per-object light index remap.
    fn set_light_index_map(&mut self, map: Vec<i32>);

    /// Fits an orthographic shadow projection for directional light
    /// `light_index` to slice `cascade_index` of `cascade_count`, splitting the
    /// shadow distance by `split_ratio`.
    ///
    /// Returns `None` if no shadow casters fall in the slice.
    fn compute_directional_shadow_matrices(
        &self,
        light_index: usize,
        cascade_index: usize,
        cascade_count: usize,
        split_ratio: Vec3,
        resolution: u32,
        near_plane: f32,
    ) -> Option<ShadowMatrices>;

    /// Fits a perspective shadow projection to spot light `light_index`.
    fn compute_spot_shadow_matrices(&self, light_index: usize) -> Option<ShadowMatrices>;

    /// Fits a shadow projection to point light `light_index`.
    ///
    /// Hosts without point-light shadow support keep the default, which
    /// leaves point lights unshadowed.
    fn compute_point_shadow_matrices(&self, _light_index: usize) -> Option<ShadowMatrices> {
        None
    }
}
