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

//! # Umbra Lanes
//!
//! The per-camera hot path of the forward renderer. Each lane owns one
//! strategy: culling a scene, packing visible lights into uniform slots,
//! rendering the regular and cascaded shadow atlases, and issuing the
//! forward draws. Lanes share state through a [`FrameContext`].

pub mod cull_lane;
pub mod frame;
pub mod light_lane;
pub mod render_lane;
pub mod shadow_lane;

pub use cull_lane::*;
pub use frame::*;
pub use light_lane::*;
pub use render_lane::*;
pub use shadow_lane::*;

#[cfg(test)]
pub(crate) mod test_support;
