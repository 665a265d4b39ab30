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

//! Build-time shader variant stripping.
//!
//! Shader compilers hand every keyword combination of a shader to the
//! stripper before compiling it. Variants the bound pipeline can never
//! select are dropped, which today means cascaded-shadow variants when
//! cascades are disabled.

use umbra_core::renderer::ShaderKeyword;
use umbra_core::PipelineSettings;

/// One keyword combination of a shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderVariant {
    /// Name of the shader the variant belongs to.
    pub shader: String,
    /// Keywords enabled in this variant.
    pub keywords: Vec<ShaderKeyword>,
}

impl ShaderVariant {
    /// Creates a variant.
    pub fn new(
        shader: impl Into<String>,
        keywords: impl IntoIterator<Item = ShaderKeyword>,
    ) -> Self {
        Self {
            shader: shader.into(),
            keywords: keywords.into_iter().collect(),
        }
    }

    /// Returns `true` if `keyword` is enabled in this variant.
    pub fn is_enabled(&self, keyword: ShaderKeyword) -> bool {
        self.keywords.contains(&keyword)
    }
}

/// Removes shader variants the pipeline will never use, keeping counts.
#[derive(Debug, Default)]
pub struct VariantStripper {
    active: bool,
    strip_cascaded_shadows: bool,
    total: usize,
    stripped: usize,
}

impl VariantStripper {
    /// Creates a stripper for `settings`. With no settings bound it keeps everything.
    pub fn new(settings: Option<&PipelineSettings>) -> Self {
        Self {
            active: settings.is_some(),
            strip_cascaded_shadows: settings.is_some_and(|s| !s.has_shadow_cascades()),
            total: 0,
            stripped: 0,
        }
    }

    /// Strips `variants` in place and returns how many were removed.
    pub fn strip(&mut self, variants: &mut Vec<ShaderVariant>) -> usize {
        if !self.active {
            return 0;
        }
        let before = variants.len();
        variants.retain(|variant| !self.should_strip(variant));
        let removed = before - variants.len();
        self.total += before;
        self.stripped += removed;
        removed
    }

    fn should_strip(&self, variant: &ShaderVariant) -> bool {
        self.strip_cascaded_shadows && variant.keywords.iter().any(ShaderKeyword::is_cascaded)
    }

    /// Variants seen so far.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Variants removed so far.
    pub fn stripped(&self) -> usize {
        self.stripped
    }

    /// Variants kept so far.
    pub fn kept(&self) -> usize {
        self.total - self.stripped
    }

    /// Share of variants kept, rounded to a whole percent.
    pub fn kept_percentage(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        (100.0 * self.kept() as f64 / self.total as f64).round() as u32
    }

    /// Logs the final counts. Does nothing when no settings were bound.
    pub fn report(&self) {
        if !self.active {
            return;
        }
        log::info!(
            "VariantStripper: kept {} of {} variants ({}%)",
            self.kept(),
            self.total,
            self.kept_percentage()
        );
    }
}
