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

//! # Lane Abstraction
//!
//! A **Lane** is one swappable processing strategy inside the render agent:
//! light packing, the regular shadow atlas, cascaded shadows, the forward
//! draw passes, or software culling. Each lane exposes a typed execution
//! method of its own; this trait carries the identity shared by all of them.
//!
//! ```text
//! RenderAgent ─► LightPackingLane ─► CascadedShadowLane ─► ShadowAtlasLane ─► ForwardPassLane
//! ```

use crate::renderer::error::{RenderError, ResourceError};
use std::fmt;

/// Error type for lane operations.
#[derive(Debug)]
pub enum LaneError {
    /// The per-frame context lacked data the lane requires.
    InvalidContext {
        /// What the lane expected.
        expected: &'static str,
        /// Description of what was received.
        received: String,
    },
    /// The host failed to provide a resource.
    Resource(ResourceError),
}

impl fmt::Display for LaneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneError::InvalidContext { expected, received } => {
                write!(f, "Invalid lane context: expected {expected}, got {received}")
            }
            LaneError::Resource(e) => write!(f, "Lane resource error: {e}"),
        }
    }
}

impl std::error::Error for LaneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaneError::Resource(e) => Some(e),
            LaneError::InvalidContext { .. } => None,
        }
    }
}

impl LaneError {
    /// Convenience constructor for a missing context entry.
    pub fn missing(type_name: &'static str) -> Self {
        LaneError::InvalidContext {
            expected: type_name,
            received: "not found in FrameContext".into(),
        }
    }
}

impl From<ResourceError> for LaneError {
    fn from(err: ResourceError) -> Self {
        LaneError::Resource(err)
    }
}

impl From<LaneError> for RenderError {
    fn from(err: LaneError) -> Self {
        match err {
            LaneError::Resource(e) => RenderError::Resource(e),
            other @ LaneError::InvalidContext { .. } => {
                RenderError::RenderingFailed(other.to_string())
            }
        }
    }
}

/// Classification of lane types, used for logging and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Visibility determination.
    Cull,
    /// Light uniform packing.
    Light,
    /// Shadow map generation.
    Shadow,
    /// Main scene rendering.
    Render,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneKind::Cull => write!(f, "Cull"),
            LaneKind::Light => write!(f, "Light"),
            LaneKind::Shadow => write!(f, "Shadow"),
            LaneKind::Render => write!(f, "Render"),
        }
    }
}

/// Base trait for all lane types.
pub trait Lane: Send + Sync {
    /// Human-readable name identifying this lane's strategy (e.g. `"ShadowAtlas"`).
    fn strategy_name(&self) -> &'static str;

    /// The kind of processing this lane performs.
    fn lane_kind(&self) -> LaneKind;
}
