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

//! Counters describing the last rendered frame.

/// What happened during one [`RenderAgent::render_frame`](super::RenderAgent::render_frame) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Cameras that reached submission.
    pub cameras_rendered: u32,
    /// Cameras skipped for degenerate culling parameters.
    pub cameras_skipped: u32,
    /// Visible lights summed over cameras, before truncation.
    pub visible_lights: u32,
    /// Regular atlas tiles drawn, summed over cameras.
    pub shadow_tiles: u32,
    /// Cascades drawn, summed over cameras.
    pub cascades_rendered: u32,
}

impl FrameStats {
    /// Adds another frame's counters to this one.
    pub fn accumulate(&mut self, other: &FrameStats) {
        self.cameras_rendered += other.cameras_rendered;
        self.cameras_skipped += other.cameras_skipped;
        self.visible_lights += other.visible_lights;
        self.shadow_tiles += other.shadow_tiles;
        self.cascades_rendered += other.cascades_rendered;
    }
}
