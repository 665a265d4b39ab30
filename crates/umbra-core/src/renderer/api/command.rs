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

//! Defines the accumulate-then-flush command buffer the pipeline records into.
//!
//! Lanes append [`RenderCommand`]s, the agent hands the buffer to
//! [`RenderContext::execute_command_buffer`](crate::renderer::traits::RenderContext::execute_command_buffer)
//! and then calls [`CommandBuffer::clear`] before the next pass. The host
//! replays the commands in order.

use crate::math::{LinearRgba, Mat4, Rect, Vec4};
use crate::renderer::api::shader::{ShaderKeyword, ShaderProperty};
use crate::renderer::api::texture::{LoadAction, StoreAction, TextureId};
use bitflags::bitflags;

bitflags! {
    /// Which buffers a camera clears before drawing.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        /// Clear the depth buffer.
        const DEPTH = 1 << 0;
        /// Clear the color buffer to the background color.
        const COLOR = 1 << 1;
    }
}

/// A single recorded operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Binds a render target.
    SetRenderTarget {
        /// The texture to render into.
        target: TextureId,
        /// How the previous contents are treated.
        load: LoadAction,
        /// Whether results are kept.
        store: StoreAction,
        /// Buffers cleared after binding.
        clear: ClearFlags,
    },
    /// Restricts rasterization to a viewport.
    SetViewport(Rect),
    /// Enables the scissor test with the given rectangle.
    EnableScissor(Rect),
    /// Disables the scissor test.
    DisableScissor,
    /// Sets the view and projection matrices for subsequent draws.
    SetViewProjection {
        /// World-to-view matrix.
        view: Mat4,
        /// View-to-clip matrix.
        projection: Mat4,
    },
    /// Clears the current render target.
    ClearRenderTarget {
        /// Clear depth.
        depth: bool,
        /// Clear color.
        color: bool,
        /// Color used when `color` is set.
        background: LinearRgba,
    },
    /// Sets a global float.
    SetGlobalFloat(ShaderProperty, f32),
    /// Sets a global vector.
    SetGlobalVector(ShaderProperty, Vec4),
    /// Sets a global color.
    SetGlobalColor(ShaderProperty, LinearRgba),
    /// Sets a global vector array.
    SetGlobalVectorArray(ShaderProperty, Vec<Vec4>),
    /// Sets a global matrix array.
    SetGlobalMatrixArray(ShaderProperty, Vec<Mat4>),
    /// Binds a texture globally.
    SetGlobalTexture(ShaderProperty, TextureId),
    /// Turns a shader keyword on.
    EnableKeyword(ShaderKeyword),
    /// Turns a shader keyword off.
    DisableKeyword(ShaderKeyword),
    /// Opens a profiling scope.
    BeginSample(String),
    /// Closes a profiling scope.
    EndSample(String),
}

/// A named, reusable list of [`RenderCommand`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandBuffer {
    name: String,
    commands: Vec<RenderCommand>,
}

impl CommandBuffer {
    /// Creates an empty buffer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// The buffer's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The commands recorded since the last [`clear`](Self::clear).
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drops every recorded command, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Appends a raw command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Binds a render target.
    pub fn set_render_target(
        &mut self,
        target: TextureId,
        load: LoadAction,
        store: StoreAction,
        clear: ClearFlags,
    ) {
        self.push(RenderCommand::SetRenderTarget {
            target,
            load,
            store,
            clear,
        });
    }

    /// Restricts rasterization to `viewport`.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.push(RenderCommand::SetViewport(viewport));
    }

    /// Enables the scissor test.
    pub fn enable_scissor(&mut self, rect: Rect) {
        self.push(RenderCommand::EnableScissor(rect));
    }

    /// Disables the scissor test.
    pub fn disable_scissor(&mut self) {
        self.push(RenderCommand::DisableScissor);
    }

    /// Sets the view and projection matrices.
    pub fn set_view_projection(&mut self, view: Mat4, projection: Mat4) {
        self.push(RenderCommand::SetViewProjection { view, projection });
    }

    /// Clears the current render target.
    pub fn clear_render_target(&mut self, depth: bool, color: bool, background: LinearRgba) {
        self.push(RenderCommand::ClearRenderTarget {
            depth,
            color,
            background,
        });
    }

    /// Sets a global float.
    pub fn set_global_float(&mut self, property: ShaderProperty, value: f32) {
        self.push(RenderCommand::SetGlobalFloat(property, value));
    }

    /// Sets a global vector.
    pub fn set_global_vector(&mut self, property: ShaderProperty, value: Vec4) {
        self.push(RenderCommand::SetGlobalVector(property, value));
    }

    /// Sets a global color.
    pub fn set_global_color(&mut self, property: ShaderProperty, value: LinearRgba) {
        self.push(RenderCommand::SetGlobalColor(property, value));
    }

    /// Uploads a vector array.
    pub fn set_global_vector_array(&mut self, property: ShaderProperty, values: &[Vec4]) {
        self.push(RenderCommand::SetGlobalVectorArray(property, values.to_vec()));
    }

    /// Uploads a matrix array.
    pub fn set_global_matrix_array(&mut self, property: ShaderProperty, values: &[Mat4]) {
        self.push(RenderCommand::SetGlobalMatrixArray(property, values.to_vec()));
    }

    /// Binds a texture globally.
    pub fn set_global_texture(&mut self, property: ShaderProperty, texture: TextureId) {
        self.push(RenderCommand::SetGlobalTexture(property, texture));
    }

    /// Turns a keyword on.
    pub fn enable_keyword(&mut self, keyword: ShaderKeyword) {
        self.push(RenderCommand::EnableKeyword(keyword));
    }

    /// Turns a keyword off.
    pub fn disable_keyword(&mut self, keyword: ShaderKeyword) {
        self.push(RenderCommand::DisableKeyword(keyword));
    }

    /// Turns a keyword on or off.
    pub fn set_keyword(&mut self, keyword: ShaderKeyword, enabled: bool) {
        if enabled {
            self.enable_keyword(keyword);
        } else {
            self.disable_keyword(keyword);
        }
    }

    /// Opens a named profiling scope.
    pub fn begin_sample(&mut self, name: &str) {
        self.push(RenderCommand::BeginSample(name.to_owned()));
    }

    /// Closes a named profiling scope.
    pub fn end_sample(&mut self, name: &str) {
        self.push(RenderCommand::EndSample(name.to_owned()));
    }
}
