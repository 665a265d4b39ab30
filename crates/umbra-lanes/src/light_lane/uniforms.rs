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

//! The fixed-capacity arena of per-light uniform slots.

use bytemuck::{Pod, Zeroable};
use umbra_core::math::{Mat4, Vec4};
use umbra_core::MAX_VISIBLE_LIGHTS;

/// Per-light uniform arrays, one slot per visible light.
///
/// The set is allocated once by the render agent and overwritten every
/// camera. Slots past the packed count are zeroed so a light from a previous
/// camera can never leak into the uploaded arrays.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct LightUniformSet {
    /// Light color premultiplied by intensity.
    pub colors: [Vec4; MAX_VISIBLE_LIGHTS],
    /// Direction towards a directional light (w = 0) or a light position (w = 1).
    pub directions_or_positions: [Vec4; MAX_VISIBLE_LIGHTS],
    /// `(1 / range², 0, spot scale, spot offset)`.
    pub attenuations: [Vec4; MAX_VISIBLE_LIGHTS],
    /// Direction towards a spot light.
    pub spot_directions: [Vec4; MAX_VISIBLE_LIGHTS],
    /// One-hot shadowmask channel selector.
    pub occlusion_masks: [Vec4; MAX_VISIBLE_LIGHTS],
    /// `(strength, soft, tile x, tile y)`, with `z = 1` marking a directional light.
    pub shadow_data: [Vec4; MAX_VISIBLE_LIGHTS],
    /// World to shadow texture space, per light.
    pub world_to_shadow: [Mat4; MAX_VISIBLE_LIGHTS],
    len: u32,
    _padding: [u32; 3],
}

impl LightUniformSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::zeroed()
    }

    /// Prepares the set for `count` lights, clamped to the slot capacity,
    /// and returns the number of slots that will be packed.
    pub fn reset(&mut self, count: usize) -> usize {
        let count = count.min(MAX_VISIBLE_LIGHTS);
        *self = Self::zeroed();
        self.len = count as u32;
        count
    }

    /// Number of packed slots.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns `true` if no light is packed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The raw bytes of the whole set, ready for a uniform upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for LightUniformSet {
    fn default() -> Self {
        Self::new()
    }
}
