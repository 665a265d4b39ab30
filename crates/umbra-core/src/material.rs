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

//! Material-level render state: render queues and the lit-material presets.
//!
//! The pipeline only reads the result: draws filter renderers by
//! [`RenderQueueRange`], and the shaders it drives consume the keywords a
//! preset produces. Tools apply presets to materials.

use crate::renderer::api::ShaderKeyword;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Well-known render queue values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderQueue {
    /// Drawn first.
    Background,
    /// Regular opaque geometry.
    Geometry,
    /// Alpha-tested geometry, after plain opaque.
    AlphaTest,
    /// Blended geometry, back to front.
    Transparent,
    /// Drawn last.
    Overlay,
}

impl RenderQueue {
    /// The numeric queue value.
    pub const fn value(&self) -> i32 {
        match self {
            Self::Background => 1000,
            Self::Geometry => 2000,
            Self::AlphaTest => 2450,
            Self::Transparent => 3000,
            Self::Overlay => 4000,
        }
    }
}

/// An inclusive range of render queue values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderQueueRange {
    /// Lowest accepted queue.
    pub lower: i32,
    /// Highest accepted queue.
    pub upper: i32,
}

impl RenderQueueRange {
    /// Queues `0..=2500`.
    pub const OPAQUE: Self = Self::new(0, 2500);
    /// Queues `2501..=5000`.
    pub const TRANSPARENT: Self = Self::new(2501, 5000);
    /// Every queue.
    pub const ALL: Self = Self::new(0, 5000);

    /// Creates an inclusive range.
    pub const fn new(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }

    /// Returns `true` if `queue` falls within the range.
    pub const fn contains(&self, queue: i32) -> bool {
        queue >= self.lower && queue <= self.upper
    }

    /// The range as a standard inclusive range.
    pub fn as_range(&self) -> RangeInclusive<i32> {
        self.lower..=self.upper
    }
}

/// Alpha clipping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClipMode {
    /// No clipping.
    Off,
    /// Clip in every pass.
    On,
    /// Clip only in the shadow caster pass.
    Shadows,
}

/// Face culling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CullMode {
    /// Draw both faces.
    Off,
    /// Cull front faces.
    Front,
    /// Cull back faces.
    Back,
}

/// A blend factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendFactor {
    /// `0`.
    Zero,
    /// `1`.
    One,
    /// Source alpha.
    SrcAlpha,
    /// `1 - source alpha`.
    OneMinusSrcAlpha,
}

/// The state a lit material is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialSettings {
    /// Alpha clipping.
    pub clip_mode: ClipMode,
    /// Face culling.
    pub cull: CullMode,
    /// Source blend factor.
    pub src_blend: BlendFactor,
    /// Destination blend factor.
    pub dst_blend: BlendFactor,
    /// Depth writes.
    pub z_write: bool,
    /// Whether the material samples shadows.
    pub receive_shadows: bool,
    /// Whether diffuse is premultiplied by alpha.
    pub premultiply_alpha: bool,
    /// Whether the shadow caster pass is enabled.
    pub casts_shadows: bool,
    /// Render queue.
    pub render_queue: RenderQueue,
}

impl MaterialSettings {
    /// Every material keyword with its state.
    pub fn keywords(&self) -> [(ShaderKeyword, bool); 5] {
        [
            (ShaderKeyword::ClippingOn, self.clip_mode == ClipMode::On),
            (ShaderKeyword::ClippingOff, self.clip_mode == ClipMode::Off),
            (
                ShaderKeyword::ClippingShadows,
                self.clip_mode == ClipMode::Shadows,
            ),
            (ShaderKeyword::ReceiveShadows, self.receive_shadows),
            (ShaderKeyword::PremultiplyAlpha, self.premultiply_alpha),
        ]
    }

    /// The keywords that are enabled.
    pub fn enabled_keywords(&self) -> Vec<ShaderKeyword> {
        self.keywords()
            .into_iter()
            .filter_map(|(k, on)| on.then_some(k))
            .collect()
    }
}

/// One-click lit-material configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialPreset {
    /// Plain opaque.
    Opaque,
    /// Alpha-tested.
    Clip,
    /// Alpha-tested with both faces drawn.
    ClipDoubleSided,
    /// Alpha-blended, no shadows.
    Fade,
    /// Alpha-blended, casting clipped shadows.
    FadeWithShadows,
    /// Premultiplied transparency, no shadows.
    Transparent,
    /// Premultiplied transparency, casting clipped shadows.
    TransparentWithShadows,
}

impl MaterialPreset {
    /// Every preset.
    pub const ALL: [MaterialPreset; 7] = [
        Self::Opaque,
        Self::Clip,
        Self::ClipDoubleSided,
        Self::Fade,
        Self::FadeWithShadows,
        Self::Transparent,
        Self::TransparentWithShadows,
    ];

    /// The material state this preset applies.
    pub fn settings(&self) -> MaterialSettings {
        let opaque = MaterialSettings {
            clip_mode: ClipMode::Off,
            cull: CullMode::Back,
            src_blend: BlendFactor::One,
            dst_blend: BlendFactor::Zero,
            z_write: true,
            receive_shadows: true,
            premultiply_alpha: false,
            casts_shadows: true,
            render_queue: RenderQueue::Geometry,
        };
        let fade = MaterialSettings {
            src_blend: BlendFactor::SrcAlpha,
            dst_blend: BlendFactor::OneMinusSrcAlpha,
            z_write: false,
            receive_shadows: false,
            casts_shadows: false,
            render_queue: RenderQueue::Transparent,
            ..opaque
        };
        let transparent = MaterialSettings {
            src_blend: BlendFactor::One,
            premultiply_alpha: true,
            ..fade
        };

        match self {
            Self::Opaque => opaque,
            Self::Clip => MaterialSettings {
                clip_mode: ClipMode::On,
                render_queue: RenderQueue::AlphaTest,
                ..opaque
            },
            Self::ClipDoubleSided => MaterialSettings {
                clip_mode: ClipMode::On,
                cull: CullMode::Off,
                render_queue: RenderQueue::AlphaTest,
                ..opaque
            },
            Self::Fade => fade,
            Self::FadeWithShadows => MaterialSettings {
                clip_mode: ClipMode::Shadows,
                receive_shadows: true,
                casts_shadows: true,
                ..fade
            },
            Self::Transparent => transparent,
            Self::TransparentWithShadows => MaterialSettings {
                clip_mode: ClipMode::Shadows,
                receive_shadows: true,
                casts_shadows: true,
                ..transparent
            },
        }
    }
}
