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

//! Defines the contracts a host engine implements to drive the pipeline.
//!
//! - [`Camera`]: produces culling parameters and clear state.
//! - [`CullingResults`]: exposes visible lights and shadow fits.
//! - [`RenderContext`]: executes commands and draws, and lends temporary targets.

mod camera;
mod culling;
mod render_context;

pub use self::camera::{Camera, CullingParameters};
pub use self::culling::{CullingResults, ShadowMatrices};
pub use self::render_context::{RenderContext, ShadowmaskMode};
