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

//! Atlas tiling and shadow-space matrix helpers.

use umbra_core::math::{Mat4, Rect, Vec4};
use umbra_core::renderer::CommandBuffer;

/// Pixels trimmed from each tile edge by the scissor rectangle.
pub const TILE_SCISSOR_INSET: f32 = 4.0;

/// Cascades always lay out as a 2x2 grid.
pub const CASCADE_GRID_SIDE: usize = 2;

/// Number of tiles per atlas side for `tile_count` shadowed lights.
pub fn grid_side(tile_count: usize) -> usize {
    match tile_count {
        0..=1 => 1,
        2..=4 => 2,
        5..=9 => 3,
        _ => 4,
    }
}

/// Column and row of tile `index` in a grid `split` tiles wide.
#[inline]
pub fn tile_offset(index: usize, split: usize) -> (f32, f32) {
    ((index % split) as f32, (index / split) as f32)
}

/// Records the viewport and scissor for tile `index` and returns its offset.
pub fn configure_tile(
    cmd: &mut CommandBuffer,
    index: usize,
    split: usize,
    tile_size: f32,
) -> (f32, f32) {
    let offset = tile_offset(index, split);
    let viewport = Rect::new(
        offset.0 * tile_size,
        offset.1 * tile_size,
        tile_size,
        tile_size,
    );
    cmd.set_viewport(viewport);
    cmd.enable_scissor(viewport.inset(TILE_SCISSOR_INSET));
    offset
}

/// Builds the world to shadow-texture matrix for a light's view and projection.
///
/// On reversed-Z devices the projection's depth row is negated so that
/// stored depth compares the same way on every device.
pub fn world_to_shadow(view: Mat4, projection: Mat4, reversed_z: bool) -> Mat4 {
    let mut projection = projection;
    if reversed_z {
        for col in 0..4 {
            projection.set(2, col, -projection.get(2, col));
        }
    }
    let clip_to_texture = Mat4::from_cols(
        Vec4::new(0.5, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 0.5, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 0.5, 0.0),
        Vec4::new(0.5, 0.5, 0.5, 1.0),
    );
    clip_to_texture * (projection * view)
}

/// Scales shadow-texture coordinates into one quadrant of the cascade atlas.
pub fn cascade_tile_matrix(offset: (f32, f32)) -> Mat4 {
    let mut tile = Mat4::IDENTITY;
    tile.set(0, 0, 0.5);
    tile.set(1, 1, 0.5);
    tile.set(0, 3, offset.0 * 0.5);
    tile.set(1, 3, offset.1 * 0.5);
    tile
}

/// The matrix for fragments outside every cascade: it maps them to the far
/// depth of the device's convention, so they read as unshadowed.
pub fn fallback_cascade_matrix(reversed_z: bool) -> Mat4 {
    let mut matrix = Mat4::ZERO;
    if reversed_z {
        matrix.set(3, 3, 1.0);
    }
    matrix
}

/// `(1 / size, 1 / size, size, size)`.
pub fn shadow_map_size_vector(size: u32) -> Vec4 {
    let size = size as f32;
    Vec4::new(1.0 / size, 1.0 / size, size, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_core::math::Vec3;
    use umbra_core::renderer::RenderCommand;

    #[test]
    fn test_grid_side_thresholds() {
        let sides: Vec<usize> = (0..=16).map(grid_side).collect();
        assert_eq!(
            sides,
            vec![1, 1, 2, 2, 2, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4]
        );
    }

    #[test]
    fn test_configure_tile_viewport_and_scissor() {
        let mut cmd = CommandBuffer::new("tiles");
        let offset = configure_tile(&mut cmd, 5, 3, 100.0);
        assert_eq!(offset, (2.0, 1.0));
        assert_eq!(
            cmd.commands(),
            &[
                RenderCommand::SetViewport(Rect::new(200.0, 100.0, 100.0, 100.0)),
                RenderCommand::EnableScissor(Rect::new(204.0, 104.0, 92.0, 92.0)),
            ]
        );
    }

    #[test]
    fn test_world_to_shadow_maps_clip_to_texture_space() {
        let m = world_to_shadow(Mat4::IDENTITY, Mat4::IDENTITY, false);
        assert_eq!(m.transform_point3(Vec3::new(-1.0, -1.0, 0.0)), Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(m.transform_point3(Vec3::new(1.0, 1.0, 1.0)), Vec3::ONE);
    }

    #[test]
    fn test_world_to_shadow_flips_depth_when_reversed() {
        let m = world_to_shadow(Mat4::IDENTITY, Mat4::IDENTITY, true);
        assert_eq!(m.get(2, 2), -0.5);
        assert_eq!(m.get(2, 3), 0.5);
        assert_eq!(m.get(0, 0), 0.5);
    }

    #[test]
    fn test_cascade_tile_matrix_places_quadrant() {
        let m = cascade_tile_matrix((1.0, 1.0));
        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(m.transform_point3(Vec3::new(1.0, 1.0, 0.3)), Vec3::new(1.0, 1.0, 0.3));
    }

    #[test]
    fn test_fallback_matrix_depends_on_depth_convention() {
        assert_eq!(fallback_cascade_matrix(false), Mat4::ZERO);
        assert_eq!(fallback_cascade_matrix(true).get(3, 3), 1.0);
    }

    #[test]
    fn test_size_vector() {
        assert_eq!(
            shadow_map_size_vector(1024),
            Vec4::new(1.0 / 1024.0, 1.0 / 1024.0, 1024.0, 1024.0)
        );
    }
}
