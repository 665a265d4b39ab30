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

//! Settings passed to the host's renderer-list and shadow draws.

use crate::material::RenderQueueRange;
use crate::math::Vec4;
use crate::renderer::api::shader::ShaderPass;
use bitflags::bitflags;

/// How the host orders renderers within a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortingCriteria {
    /// No particular order.
    None,
    /// Typical opaque order: roughly front to back, grouped by state.
    CommonOpaque,
    /// Typical transparent order: back to front.
    CommonTransparent,
}

bitflags! {
    /// Per-object data the host binds for each renderer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PerObjectData: u16 {
        /// Per-object light indices. Only valid with at least one visible light.
        const LIGHT_INDICES = 1 << 0;
        /// Reflection probes.
        const REFLECTION_PROBES = 1 << 1;
        /// Lightmap UVs and textures.
        const LIGHTMAPS = 1 << 2;
        /// Light probe coefficients.
        const LIGHT_PROBE = 1 << 3;
        /// Light probe proxy volumes.
        const LIGHT_PROBE_PROXY_VOLUME = 1 << 4;
        /// Baked shadowmask.
        const SHADOW_MASK = 1 << 5;
        /// Occlusion probes.
        const OCCLUSION_PROBE = 1 << 6;
        /// Occlusion probe proxy volumes.
        const OCCLUSION_PROBE_PROXY_VOLUME = 1 << 7;
        /// Baked-lighting data every lit draw requests.
        const BAKED_LIGHTING = Self::REFLECTION_PROBES.bits()
            | Self::LIGHTMAPS.bits()
            | Self::LIGHT_PROBE.bits()
            | Self::LIGHT_PROBE_PROXY_VOLUME.bits()
            | Self::SHADOW_MASK.bits()
            | Self::OCCLUSION_PROBE.bits()
            | Self::OCCLUSION_PROBE_PROXY_VOLUME.bits();
    }
}

/// A material that replaces each renderer's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverrideMaterial {
    /// The flat magenta error material.
    Error,
}

/// Describes a renderer-list draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSettings {
    /// Passes to render, in priority order.
    pub passes: Vec<ShaderPass>,
    /// Renderer ordering.
    pub sorting: SortingCriteria,
    /// Per-object data to bind.
    pub per_object_data: PerObjectData,
    /// Whether the host may batch small meshes dynamically.
    pub enable_dynamic_batching: bool,
    /// Whether the host may use GPU instancing.
    pub enable_instancing: bool,
    /// Replacement material, if any.
    pub override_material: Option<OverrideMaterial>,
}

impl DrawingSettings {
    /// Draws a single pass with the given ordering.
    pub fn new(pass: ShaderPass, sorting: SortingCriteria) -> Self {
        Self {
            passes: vec![pass],
            sorting,
            per_object_data: PerObjectData::empty(),
            enable_dynamic_batching: false,
            enable_instancing: false,
            override_material: None,
        }
    }
}

/// Restricts which renderers a draw considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilteringSettings {
    /// Accepted render queues.
    pub render_queue_range: RenderQueueRange,
    /// Accepted layers; `-1` accepts every layer.
    pub layer_mask: i32,
}

impl FilteringSettings {
    /// Accepts every layer within `range`.
    pub fn new(range: RenderQueueRange) -> Self {
        Self {
            render_queue_range: range,
            layer_mask: -1,
        }
    }
}

/// Culling data for one shadow slice.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShadowSplitData {
    /// `xyz` center and `w` radius of the sphere enclosing the slice.
    pub culling_sphere: Vec4,
}

/// Describes a shadow caster draw for one light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowDrawingSettings {
    /// Index of the light in the visible-light list.
    pub light_index: usize,
    /// Slice culling data.
    pub split_data: ShadowSplitData,
}
