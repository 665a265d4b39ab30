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

//! Range-based light culling and shadow fitting over a flat scene description.

use umbra_core::lane::{Lane, LaneKind};
use umbra_core::math::{degrees_to_radians, Aabb, Mat4, Vec3, Vec4, EPSILON};
use umbra_core::renderer::{
    CullingParameters, CullingResults, LightKind, ShadowMatrices, ShadowSplitData, VisibleLight,
};

/// Depth added towards the light in front of every directional fit, so
/// casters just outside the slice still reach the map.
const DIRECTIONAL_Z_PADDING: f32 = 100.0;

/// A light placed in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLight {
    /// The light as it will be handed to the pipeline when visible.
    pub light: VisibleLight,
    /// Disabled lights are never visible.
    pub enabled: bool,
}

impl From<VisibleLight> for SceneLight {
    fn from(light: VisibleLight) -> Self {
        Self {
            light,
            enabled: true,
        }
    }
}

/// Culls a list of lights and shadow casters against a camera.
#[derive(Debug, Clone, Default)]
pub struct SceneCuller {
    lights: Vec<SceneLight>,
    casters: Vec<Aabb>,
}

impl SceneCuller {
    /// Creates an empty culler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a light.
    pub fn add_light(&mut self, light: impl Into<SceneLight>) {
        self.lights.push(light.into());
    }

    /// Adds the world bounds of a shadow caster.
    pub fn add_caster(&mut self, bounds: Aabb) {
        self.casters.push(bounds);
    }

    /// The scene's lights.
    pub fn lights(&self) -> &[SceneLight] {
        &self.lights
    }

    /// Culls the scene. Directional lights are always visible; point and
    /// spot lights are visible when their range reaches the sphere bounding
    /// the camera frustum.
    pub fn cull(&self, params: &CullingParameters) -> SceneCullResults {
        let Some(camera_to_world) = params.view.inverse() else {
            log::warn!("SceneCuller: camera view matrix is not invertible, nothing is visible");
            return SceneCullResults::new(Vec::new(), Vec::new(), *params, Mat4::IDENTITY);
        };
        let corners = slice_corners(
            &camera_to_world,
            params.fov_y,
            params.aspect,
            params.near_plane,
            params.far_plane,
        );
        let (center, radius) = bounding_sphere(&corners);

        let lights = self
            .lights
            .iter()
            .filter(|scene_light| scene_light.enabled)
            .map(|scene_light| scene_light.light)
            .filter(|light| match light.kind {
                LightKind::Directional => true,
                LightKind::Point | LightKind::Spot => {
                    light.position().truncate().distance(center) <= radius + light.range
                }
            })
            .collect();

        SceneCullResults::new(lights, self.casters.clone(), *params, camera_to_world)
    }
}

impl Lane for SceneCuller {
    fn strategy_name(&self) -> &'static str {
        "SceneCuller"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Cull
    }
}

/// The lights and casters a [`SceneCuller`] found visible for one camera.
#[derive(Debug, Clone)]
pub struct SceneCullResults {
    lights: Vec<VisibleLight>,
    casters: Vec<Aabb>,
    light_index_map: Vec<i32>,
    params: CullingParameters,
    camera_to_world: Mat4,
}

impl SceneCullResults {
    fn new(
        lights: Vec<VisibleLight>,
        casters: Vec<Aabb>,
        params: CullingParameters,
        camera_to_world: Mat4,
    ) -> Self {
        let light_index_map = (0..lights.len() as i32).collect();
        Self {
            lights,
            casters,
            light_index_map,
            params,
            camera_to_world,
        }
    }

    /// The parameters this result was culled with.
    pub fn params(&self) -> &CullingParameters {
        &self.params
    }
}

impl CullingResults for SceneCullResults {
    fn visible_lights(&self) -> &[VisibleLight] {
        &self.lights
    }

    fn shadow_caster_bounds(&self, light_index: usize) -> Option<Aabb> {
        let light = self.lights.get(light_index)?;
        if !light.casts_shadows() {
            return None;
        }
        let (reach_center, reach_radius) = match light.kind {
            LightKind::Directional => (self.params.camera_position, self.params.shadow_distance),
            LightKind::Point | LightKind::Spot => (light.position().truncate(), light.range),
        };
        let bounds = self
            .casters
            .iter()
            .filter(|caster| caster.intersects_sphere(reach_center, reach_radius))
            .fold(Aabb::INVALID, |acc, caster| acc.merge(caster));
        bounds.is_valid().then_some(bounds)
    }

    fn light_index_map(&self) -> Vec<i32> {
        self.light_index_map.clone()
    }

    fn set_light_index_map(&mut self, map: Vec<i32>) {
        self.light_index_map = map;
    }

    fn compute_directional_shadow_matrices(
        &self,
        light_index: usize,
        cascade_index: usize,
        cascade_count: usize,
        split_ratio: Vec3,
        resolution: u32,
        near_plane: f32,
    ) -> Option<ShadowMatrices> {
        let light = self.lights.get(light_index)?;
        if light.kind != LightKind::Directional {
            return None;
        }
        let casters = self.shadow_caster_bounds(light_index)?;

        let fractions = cascade_fractions(cascade_count, split_ratio);
        let start = *fractions.get(cascade_index)?;
        let end = *fractions.get(cascade_index + 1)?;
        let distance = self.params.shadow_distance;
        let slice_near = (start * distance).max(self.params.near_plane);
        let slice_far = end * distance;
        if slice_far <= slice_near {
            return None;
        }

        let corners = slice_corners(
            &self.camera_to_world,
            self.params.fov_y,
            self.params.aspect,
            slice_near,
            slice_far,
        );
        let (center, radius) = bounding_sphere(&corners);

        let direction = light.forward().truncate().normalize();
        if direction.length_squared() < EPSILON {
            return None;
        }
        let mut view = Mat4::look_at_rh(center - direction, center, up_for(direction))?;

        // Snap to whole texels so the map does not shimmer as the camera moves.
        if resolution > 0 {
            let texel = 2.0 * radius / resolution as f32;
            view.cols[3].x = (view.cols[3].x / texel).round() * texel;
            view.cols[3].y = (view.cols[3].y / texel).round() * texel;
        }

        let light_center = view.transform_point3(center);
        let light_casters = casters.transform(&view);
        if light_casters.max.x < light_center.x - radius
            || light_casters.min.x > light_center.x + radius
            || light_casters.max.y < light_center.y - radius
            || light_casters.min.y > light_center.y + radius
        {
            return None;
        }

        let max_z = (light_center.z + radius).max(light_casters.max.z);
        let min_z = light_center.z - radius;
        let projection = Mat4::orthographic_rh_zo(
            light_center.x - radius,
            light_center.x + radius,
            light_center.y - radius,
            light_center.y + radius,
            -max_z - near_plane.max(0.0) - DIRECTIONAL_Z_PADDING,
            -min_z,
        );

        Some(ShadowMatrices {
            view,
            projection,
            split: ShadowSplitData {
                culling_sphere: Vec4::from_vec3(center, radius),
            },
        })
    }

    fn compute_spot_shadow_matrices(&self, light_index: usize) -> Option<ShadowMatrices> {
        let light = self.lights.get(light_index)?;
        if light.kind != LightKind::Spot {
            return None;
        }
        self.shadow_caster_bounds(light_index)?;

        let position = light.position().truncate();
        let direction = light.forward().truncate().normalize();
        if direction.length_squared() < EPSILON {
            return None;
        }
        let view = Mat4::look_at_rh(position, position + direction, up_for(direction))?;
        let projection = Mat4::perspective_rh_zo(
            degrees_to_radians(light.spot_angle),
            1.0,
            light.shadow_near_plane.max(0.01),
            light.range,
        )?;

        let half_range = light.range * 0.5;
        Some(ShadowMatrices {
            view,
            projection,
            split: ShadowSplitData {
                culling_sphere: Vec4::from_vec3(position + direction * half_range, half_range),
            },
        })
    }
}

/// Slice boundaries as fractions of the shadow distance, `cascade_count + 1` long.
pub fn cascade_fractions(cascade_count: usize, split_ratio: Vec3) -> Vec<f32> {
    let splits = [split_ratio.x, split_ratio.y, split_ratio.z];
    let inner = cascade_count.clamp(1, 4) - 1;
    let mut fractions = Vec::with_capacity(inner + 2);
    fractions.push(0.0);
    fractions.extend_from_slice(&splits[..inner]);
    fractions.push(1.0);
    fractions
}

fn up_for(direction: Vec3) -> Vec3 {
    if direction.y.abs() > 0.99 {
        Vec3::Z
    } else {
        Vec3::Y
    }
}

/// World-space corners of the view frustum between `near` and `far`.
fn slice_corners(camera_to_world: &Mat4, fov_y: f32, aspect: f32, near: f32, far: f32) -> [Vec3; 8] {
    let tan_half = (fov_y * 0.5).tan();
    let mut corners = [Vec3::ZERO; 8];
    for (i, depth) in [near, far].into_iter().enumerate() {
        let half_height = depth * tan_half;
        let half_width = half_height * aspect;
        let quad = [
            Vec3::new(-half_width, -half_height, -depth),
            Vec3::new(half_width, -half_height, -depth),
            Vec3::new(-half_width, half_height, -depth),
            Vec3::new(half_width, half_height, -depth),
        ];
        for (j, corner) in quad.into_iter().enumerate() {
            corners[i * 4 + j] = camera_to_world.transform_point3(corner);
        }
    }
    corners
}

fn bounding_sphere(points: &[Vec3; 8]) -> (Vec3, f32) {
    let center = points.iter().fold(Vec3::ZERO, |acc, p| acc + *p) / points.len() as f32;
    let radius = points
        .iter()
        .map(|p| p.distance(center))
        .fold(0.0f32, f32::max);
    (center, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use umbra_core::math::{LinearRgba, FRAC_PI_2};
    use umbra_core::renderer::ShadowMode;

    fn params(shadow_distance: f32) -> CullingParameters {
        let eye = Vec3::new(0.0, 2.0, 10.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y).expect("valid view");
        let mut params =
            CullingParameters::perspective(view, eye, degrees_to_radians(60.0), 1.0, 0.3, 100.0)
                .expect("valid camera");
        params.shadow_distance = shadow_distance;
        params
    }

    fn sun() -> VisibleLight {
        VisibleLight::new(
            LightKind::Directional,
            Mat4::from_rotation_x(FRAC_PI_2),
            LinearRgba::WHITE,
        )
        .with_shadows(ShadowMode::Hard, 1.0)
    }

    fn spot_above_origin() -> VisibleLight {
        let transform =
            Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)) * Mat4::from_rotation_x(FRAC_PI_2);
        let mut light = VisibleLight::new(LightKind::Spot, transform, LinearRgba::WHITE)
            .with_shadows(ShadowMode::Soft, 1.0);
        light.spot_angle = 60.0;
        light
    }

    fn unit_box() -> Aabb {
        Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE)
    }

    fn clip(matrices: &ShadowMatrices, p: Vec3) -> Vec3 {
        (matrices.projection * matrices.view).transform_point3(p)
    }

    #[test]
    fn test_range_based_light_visibility() {
        let mut culler = SceneCuller::new();
        culler.add_light(sun());
        let mut far_point = VisibleLight::new(
            LightKind::Point,
            Mat4::from_translation(Vec3::new(0.0, 0.0, 500.0)),
            LinearRgba::WHITE,
        );
        far_point.range = 5.0;
        culler.add_light(far_point);
        culler.add_light(VisibleLight::new(
            LightKind::Point,
            Mat4::IDENTITY,
            LinearRgba::WHITE,
        ));
        culler.add_light(SceneLight {
            light: sun(),
            enabled: false,
        });

        let cull = culler.cull(&params(20.0));
        let kinds: Vec<LightKind> = cull.visible_lights().iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LightKind::Directional, LightKind::Point]);
        assert_eq!(cull.light_index_map(), vec![0, 1]);
    }

    #[test]
    fn test_caster_bounds_respect_light_reach() {
        let mut culler = SceneCuller::new();
        culler.add_light(spot_above_origin());
        culler.add_caster(unit_box());
        culler.add_caster(Aabb::from_center_half_extents(
            Vec3::new(50.0, 0.0, 0.0),
            Vec3::ONE,
        ));
        let cull = culler.cull(&params(20.0));

        assert_eq!(cull.shadow_caster_bounds(0), Some(unit_box()));
        assert_eq!(cull.shadow_caster_bounds(7), None);
    }

    #[test]
    fn test_unshadowed_light_has_no_caster_bounds() {
        let mut culler = SceneCuller::new();
        let mut light = spot_above_origin();
        light.shadows = ShadowMode::None;
        culler.add_light(light);
        culler.add_caster(unit_box());
        assert_eq!(culler.cull(&params(20.0)).shadow_caster_bounds(0), None);
    }

    #[test]
    fn test_directional_fit_contains_caster() {
        let mut culler = SceneCuller::new();
        culler.add_light(sun());
        culler.add_caster(unit_box());
        let cull = culler.cull(&params(20.0));

        let fit = cull
            .compute_directional_shadow_matrices(0, 0, 1, Vec3::X, 1024, 0.2)
            .expect("caster in range");
        let p = clip(&fit, Vec3::new(0.0, 1.0, 0.0));
        assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0, "{:?}", p);
        assert!((0.0..=1.0).contains(&p.z), "{:?}", p);
        assert!(fit.split.culling_sphere.w > 0.0);
    }

    #[test]
    fn test_cascades_only_fit_slices_holding_casters() {
        let mut culler = SceneCuller::new();
        culler.add_light(sun());
        culler.add_caster(unit_box());
        let cull = culler.cull(&params(20.0));
        let split = Vec3::new(0.067, 0.2, 0.467);

        assert!(cull
            .compute_directional_shadow_matrices(0, 0, 4, split, 512, 0.2)
            .is_none());
        let far = cull
            .compute_directional_shadow_matrices(0, 3, 4, split, 512, 0.2)
            .expect("caster inside the last cascade");
        assert!(far.split.culling_sphere.w > 5.0);
        assert!(cull
            .compute_directional_shadow_matrices(0, 4, 4, split, 512, 0.2)
            .is_none());
    }

    #[test]
    fn test_spot_fit_projects_caster() {
        let mut culler = SceneCuller::new();
        culler.add_light(spot_above_origin());
        culler.add_caster(unit_box());
        let cull = culler.cull(&params(20.0));

        let fit = cull.compute_spot_shadow_matrices(0).expect("caster in range");
        let p = clip(&fit, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-4);
        assert!((0.0..=1.0).contains(&p.z));
        assert!(cull.compute_point_shadow_matrices(0).is_none());
        assert!(cull.compute_directional_shadow_matrices(0, 0, 1, Vec3::X, 512, 0.2).is_none());
    }

    #[test]
    fn test_cascade_fractions() {
        let split = Vec3::new(0.1, 0.3, 0.6);
        assert_eq!(cascade_fractions(0, split), vec![0.0, 1.0]);
        assert_eq!(cascade_fractions(2, split), vec![0.0, 0.1, 1.0]);
        assert_eq!(cascade_fractions(4, split), vec![0.0, 0.1, 0.3, 0.6, 1.0]);
    }
}
