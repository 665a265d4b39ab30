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

//! Names shared with the forward shaders: global properties, feature keywords and passes.
//!
//! The pipeline never talks to shaders through raw strings; every global it
//! uploads is a [`ShaderProperty`] and every toggle a [`ShaderKeyword`]. The
//! `name()` accessors return the identifiers the shader sources declare.

use serde::{Deserialize, Serialize};

/// A global shader parameter written by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderProperty {
    /// `[Vec4; 16]` light colors.
    VisibleLightColors,
    /// `[Vec4; 16]` directions (w = 0) or positions (w = 1).
    VisibleLightDirectionsOrPositions,
    /// `[Vec4; 16]` range and spot-cone attenuation terms.
    VisibleLightAttenuations,
    /// `[Vec4; 16]` spot directions.
    VisibleLightSpotDirections,
    /// `[Vec4; 16]` shadowmask channel selectors.
    VisibleLightOcclusionMasks,
    /// Per-object light index offset and count.
    LightIndicesOffsetAndCount,
    /// The regular shadow atlas.
    ShadowMap,
    /// Depth bias for the light currently being rendered.
    ShadowBias,
    /// `(1/size, 1/size, size, size)` of the regular atlas.
    ShadowMapSize,
    /// `[Vec4; 16]` strength, softness and tile offset per light.
    ShadowData,
    /// `[Mat4; 16]` world-to-shadow matrices of the regular atlas.
    WorldToShadowMatrices,
    /// Tile scale, squared distance and fade terms.
    GlobalShadowData,
    /// The cascaded atlas of the primary directional light.
    CascadedShadowMap,
    /// `[Mat4; 5]` cascade world-to-shadow matrices, the last being the fallback.
    CascadedWorldToShadowMatrices,
    /// `(1/size, 1/size, size, size)` of the cascaded atlas.
    CascadedShadowMapSize,
    /// Shadow strength of the primary directional light.
    CascadedShadowStrength,
    /// `[Vec4; 4]` cascade culling spheres with squared radii.
    CascadedCullingSpheres,
    /// Shadow tint used by subtractive mixed lighting.
    SubtractiveShadowColor,
}

impl ShaderProperty {
    /// The identifier declared by the shader sources.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::VisibleLightColors => "_VisibleLightColors",
            Self::VisibleLightDirectionsOrPositions => "_VisibleLightDirectionsOrPositions",
            Self::VisibleLightAttenuations => "_VisibleLightAttenuations",
            Self::VisibleLightSpotDirections => "_VisibleLightSpotDirections",
            Self::VisibleLightOcclusionMasks => "_VisibleLightOcclusionMasks",
            Self::LightIndicesOffsetAndCount => "_LightIndicesOffsetAndCount",
            Self::ShadowMap => "_ShadowMap",
            Self::ShadowBias => "_ShadowBias",
            Self::ShadowMapSize => "_ShadowMapSize",
            Self::ShadowData => "_ShadowDatas",
            Self::WorldToShadowMatrices => "_WorldToShadowMatrices",
            Self::GlobalShadowData => "_GlobalShadowData",
            Self::CascadedShadowMap => "_CascadedShadowMap",
            Self::CascadedWorldToShadowMatrices => "_CascadedWorldToShadowMatrices",
            Self::CascadedShadowMapSize => "_CascadedShadowMapSize",
            Self::CascadedShadowStrength => "_CascadedShadowStrength",
            Self::CascadedCullingSpheres => "_CascadedCullingSpheres",
            Self::SubtractiveShadowColor => "_SubtractiveShadowColor",
        }
    }
}

/// A boolean shader feature toggle that selects a compiled variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderKeyword {
    /// At least one atlas light uses hard shadows.
    ShadowsHard,
    /// At least one atlas light uses soft shadows.
    ShadowsSoft,
    /// The primary directional light uses hard cascaded shadows.
    CascadedShadowsHard,
    /// The primary directional light uses soft cascaded shadows.
    CascadedShadowsSoft,
    /// A mixed light bakes into the shadowmask.
    Shadowmask,
    /// Like `Shadowmask`, with realtime shadows up to the shadow distance.
    DistanceShadowmask,
    /// A mixed light uses subtractive lighting.
    SubtractiveLighting,
    /// Material alpha clipping.
    ClippingOn,
    /// No material alpha clipping.
    ClippingOff,
    /// Material alpha clipping in the shadow caster pass only.
    ClippingShadows,
    /// The material receives shadows.
    ReceiveShadows,
    /// Diffuse is premultiplied by alpha.
    PremultiplyAlpha,
}

impl ShaderKeyword {
    /// Keywords written by the render pipeline itself.
    pub const PIPELINE: [ShaderKeyword; 7] = [
        Self::ShadowsHard,
        Self::ShadowsSoft,
        Self::CascadedShadowsHard,
        Self::CascadedShadowsSoft,
        Self::Shadowmask,
        Self::DistanceShadowmask,
        Self::SubtractiveLighting,
    ];

    /// The identifier declared by the shader sources.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ShadowsHard => "_SHADOWS_HARD",
            Self::ShadowsSoft => "_SHADOWS_SOFT",
            Self::CascadedShadowsHard => "_CASCADED_SHADOWS_HARD",
            Self::CascadedShadowsSoft => "_CASCADED_SHADOWS_SOFT",
            Self::Shadowmask => "_SHADOWMASK",
            Self::DistanceShadowmask => "_DISTANCE_SHADOWMASK",
            Self::SubtractiveLighting => "_SUBTRACTIVE_LIGHTING",
            Self::ClippingOn => "_CLIPPING_ON",
            Self::ClippingOff => "_CLIPPING_OFF",
            Self::ClippingShadows => "_CLIPPING_SHADOWS",
            Self::ReceiveShadows => "_RECEIVE_SHADOWS",
            Self::PremultiplyAlpha => "_PREMULTIPLY_ALPHA",
        }
    }

    /// Returns `true` for the two cascaded-shadow toggles.
    pub const fn is_cascaded(&self) -> bool {
        matches!(self, Self::CascadedShadowsHard | Self::CascadedShadowsSoft)
    }
}

/// A named shader pass that draw calls select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderPass(pub &'static str);

impl ShaderPass {
    /// The lit forward pass this pipeline renders.
    pub const FORWARD: ShaderPass = ShaderPass("UmbraForward");

    /// Passes of the legacy built-in pipeline. Objects only providing one of
    /// these are drawn with the error material.
    pub const LEGACY: [ShaderPass; 6] = [
        ShaderPass("ForwardBase"),
        ShaderPass("PrepassBase"),
        ShaderPass("Always"),
        ShaderPass("Vertex"),
        ShaderPass("VertexLMRGBM"),
        ShaderPass("VertexLM"),
    ];
}
