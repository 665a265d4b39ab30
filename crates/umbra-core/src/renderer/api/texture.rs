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

//! Defines handles and descriptors for the temporary textures the pipeline requests.

use std::borrow::Cow;

/// An opaque handle to a texture owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// The storage format of a temporary render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// A depth-only target sampled with hardware depth comparison.
    Shadowmap,
    /// A 32-bit floating-point depth target.
    Depth32Float,
}

/// Defines the filtering mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Nearest-texel sampling.
    Point,
    /// Interpolates the four nearest texels.
    Bilinear,
}

/// Defines how texture coordinates outside `[0, 1]` are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Coordinates are clamped to the edge.
    Clamp,
    /// Coordinates wrap around.
    Repeat,
}

/// Describes a square depth target used as a shadow atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowMapDescriptor<'a> {
    /// A debug label.
    pub label: Cow<'a, str>,
    /// Width and height in texels.
    pub size: u32,
    /// Depth buffer precision in bits.
    pub depth_bits: u32,
    /// Storage format.
    pub format: TextureFormat,
    /// Filtering used when sampling.
    pub filter: FilterMode,
    /// Addressing outside the atlas.
    pub wrap: WrapMode,
}

impl<'a> ShadowMapDescriptor<'a> {
    /// A 16-bit, bilinear, clamped shadowmap target of `size` texels.
    pub fn atlas(label: impl Into<Cow<'a, str>>, size: u32) -> Self {
        Self {
            label: label.into(),
            size,
            depth_bits: 16,
            format: TextureFormat::Shadowmap,
            filter: FilterMode::Bilinear,
            wrap: WrapMode::Clamp,
        }
    }
}

/// What to do with a render target's previous contents when it is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadAction {
    /// Keep the previous contents.
    Load,
    /// The previous contents are undefined.
    DontCare,
}

/// What to do with a render target's contents after rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreAction {
    /// Write the results back.
    Store,
    /// Results may be discarded.
    DontCare,
}
