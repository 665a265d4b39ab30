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

//! Provides the public, host-agnostic rendering contracts of the forward pipeline.
//!
//! This module defines the "common language" between the pipeline and the
//! engine hosting it: the abstract [`traits`] a host implements, the
//! [`api`] data structures exchanged through them, the per-frame [`light`]
//! snapshot and the [`error`] types.

pub mod api;
pub mod error;
pub mod light;
pub mod traits;

pub use self::api::*;
pub use self::error::{RenderError, ResourceError};
pub use self::light::{
    LightBaking, LightKind, LightmapBakeType, MixedLightingMode, ShadowMode, VisibleLight,
};
pub use self::traits::{
    Camera, CullingParameters, CullingResults, RenderContext, ShadowMatrices, ShadowmaskMode,
};
