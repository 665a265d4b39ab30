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

//! Defines the hierarchy of error types for the rendering subsystem.
//!
//! Expected per-frame outcomes (a camera with degenerate culling parameters,
//! zero visible lights, a light without shadow casters, more lights than the
//! uniform arrays hold) are normal branches and never surface here.

use std::fmt;

/// An error related to the creation or use of a GPU resource provided by the host.
#[derive(Debug)]
pub enum ResourceError {
    /// The host could not provide a temporary resource.
    AllocationFailed {
        /// A descriptive label for the resource being requested.
        label: String,
        /// Detailed error messages from the host.
        details: String,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::AllocationFailed { label, details } => {
                write!(f, "Failed to allocate resource '{label}': {details}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// A high-level error that aborts the rendering of a frame.
#[derive(Debug)]
pub enum RenderError {
    /// An error occurred while acquiring or managing a GPU resource.
    Resource(ResourceError),
    /// A lane could not complete the camera.
    RenderingFailed(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Resource(err) => write!(f, "A rendering resource error occurred: {err}"),
            RenderError::RenderingFailed(msg) => write!(f, "A rendering operation failed: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Resource(err) => Some(err),
            RenderError::RenderingFailed(_) => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::Resource(err)
    }
}
