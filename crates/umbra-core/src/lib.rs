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

//! # Umbra Core
//!
//! Foundational crate of the forward renderer: math, the host-facing
//! rendering contracts, per-frame light snapshots, material presets and
//! pipeline settings.

#![warn(missing_docs)]

pub mod lane;
pub mod material;
pub mod math;
pub mod renderer;
pub mod settings;

/// Number of light slots in every per-light uniform array.
pub const MAX_VISIBLE_LIGHTS: usize = 16;

pub use settings::{PipelineAsset, PipelineSettings, SettingsError};
