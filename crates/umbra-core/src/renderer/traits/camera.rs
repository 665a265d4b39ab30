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

//! The camera contract: where culling parameters and clear state come from.

use crate::math::{LinearRgba, Mat4, Vec3};
use crate::renderer::api::ClearFlags;

/// Parameters a host culls with, derived from a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CullingParameters {
    /// World-to-view matrix.
    pub view: Mat4,
    /// View-to-clip matrix.
    pub projection: Mat4,
    /// World-space eye position.
    pub camera_position: Vec3,
    /// Near clip distance.
    pub near_plane: f32,
    /// Far clip distance.
    pub far_plane: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width over height.
    pub aspect: f32,
    /// Maximum shadow distance, clamped to the far plane by the pipeline.
    pub shadow_distance: f32,
}

impl CullingParameters {
    /// Builds right-handed perspective parameters from a view matrix.
    ///
    /// Returns `None` if the camera cannot produce a usable frustum.
    pub fn perspective(
        view: Mat4,
        camera_position: Vec3,
        fov_y: f32,
        aspect: f32,
        near_plane: f32,
        far_plane: f32,
    ) -> Option<Self> {
        let projection = Mat4::perspective_rh_zo(fov_y, aspect, near_plane, far_plane)?;
        let params = Self {
            view,
            projection,
            camera_position,
            near_plane,
            far_plane,
            fov_y,
            aspect,
            shadow_distance: far_plane,
        };
        (!params.is_degenerate()).then_some(params)
    }

    /// Returns `true` for parameters that cannot be culled against.
    pub fn is_degenerate(&self) -> bool {
        !(self.fov_y > 0.0 && self.fov_y.is_finite())
            || !(self.near_plane > 0.0)
            || !(self.far_plane > self.near_plane)
            || !(self.aspect > 0.0 && self.aspect.is_finite())
    }
}

/// A camera the pipeline renders.
pub trait Camera {
    /// A name for logs.
    fn name(&self) -> &str;

    /// Culling parameters, or `None` when the camera is degenerate (zero
    /// field of view, inverted clip planes, zero-sized viewport).
    fn culling_parameters(&self) -> Option<CullingParameters>;

    /// Distance to the far clip plane.
    fn far_clip_plane(&self) -> f32;

    /// Which buffers are cleared before drawing.
    fn clear_flags(&self) -> ClearFlags;

    /// Color used when clearing the color buffer.
    fn background_color(&self) -> LinearRgba;
}
