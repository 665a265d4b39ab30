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

//! Integration tests driving the RenderAgent against a recording host.
//!
//! These tests cover whole frames: which lanes run for a given set of
//! lights, what ends up in the uploaded arrays, and how temporary targets
//! are acquired and released.

mod common;

use approx::assert_relative_eq;
use common::*;
use umbra_agents::render_agent::{FrameStats, RenderAgent};
use umbra_core::math::{Mat4, Vec4};
use umbra_core::renderer::{
    Camera, OverrideMaterial, RenderCommand, RenderError, ShaderKeyword, ShaderProperty,
    ShadowMode, SortingCriteria, TextureId,
};
use umbra_core::{PipelineSettings, MAX_VISIBLE_LIGHTS};
use umbra_lanes::ForwardPassLane;

fn settings(cascades: usize) -> PipelineSettings {
    PipelineSettings {
        shadow_cascades: cascades,
        shadow_map_size: 1024,
        shadow_distance: 20.0,
        ..Default::default()
    }
}

fn render(agent: &mut RenderAgent, ctx: &mut MockRenderContext) {
    let camera = MockCamera::new("main");
    agent
        .render_frame(ctx, &[&camera as &dyn Camera])
        .expect("frame renders");
}

fn disabled(ctx: &MockRenderContext, keyword: ShaderKeyword) -> bool {
    ctx.commands().contains(&RenderCommand::DisableKeyword(keyword))
}

fn enabled(ctx: &MockRenderContext, keyword: ShaderKeyword) -> bool {
    ctx.commands().contains(&RenderCommand::EnableKeyword(keyword))
}

// ─────────────────────────────────────────────────────────────────────────────
// Light counts
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_no_lights_still_draws_everything() {
    let mut agent = RenderAgent::new(settings(4));
    let mut ctx = MockRenderContext::new(MockCullingResults::new(Vec::new()));
    render(&mut agent, &mut ctx);

    assert_eq!(
        ctx.vector(ShaderProperty::LightIndicesOffsetAndCount),
        Some(Vec4::ZERO)
    );
    for keyword in [
        ShaderKeyword::ShadowsHard,
        ShaderKeyword::ShadowsSoft,
        ShaderKeyword::CascadedShadowsHard,
        ShaderKeyword::CascadedShadowsSoft,
    ] {
        assert!(disabled(&ctx, keyword), "{:?} should be disabled", keyword);
    }

    let draws = ctx.renderer_draws();
    assert!(draws.len() >= 2);
    assert_eq!(draws[0].0.sorting, SortingCriteria::CommonOpaque);
    assert_eq!(draws[1].0.sorting, SortingCriteria::CommonTransparent);
    assert_eq!(ctx.count(|c| matches!(c, Call::DrawSkybox)), 1);
    assert_eq!(ctx.count(|c| matches!(c, Call::Acquire(_))), 0);
    assert_eq!(ctx.count(|c| matches!(c, Call::Submit)), 1);
}

#[test]
fn test_light_slots_follow_visible_count() {
    for count in 0..=20usize {
        let lights = (0..count)
            .map(|i| point(i as f32, ShadowMode::None))
            .collect();
        let mut agent = RenderAgent::new(settings(0));
        let mut ctx = MockRenderContext::new(MockCullingResults::new(lights));
        render(&mut agent, &mut ctx);

        let packed = count.min(MAX_VISIBLE_LIGHTS);
        assert_eq!(agent.light_uniforms().len(), packed, "count {}", count);

        let colors = ctx
            .vector_array(ShaderProperty::VisibleLightColors)
            .expect("colors uploaded");
        assert_eq!(colors.len(), MAX_VISIBLE_LIGHTS);
        let populated = colors.iter().filter(|c| **c != Vec4::ZERO).count();
        assert_eq!(populated, packed, "count {}", count);

        let (_, _, map) = &ctx.renderer_draws()[0];
        assert_eq!(map.len(), count);
        assert!(map.iter().skip(MAX_VISIBLE_LIGHTS).all(|&i| i == -1));
        assert!(map
            .iter()
            .take(MAX_VISIBLE_LIGHTS)
            .enumerate()
            .all(|(n, &i)| i == n as i32));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cascades
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_primary_directional_light_renders_cascades() {
    let mut agent = RenderAgent::new(settings(4));
    let mut ctx =
        MockRenderContext::new(MockCullingResults::new(vec![directional(ShadowMode::Soft)]));
    render(&mut agent, &mut ctx);

    assert_eq!(ctx.count(|c| matches!(c, Call::Acquire(_))), 1);
    assert_eq!(ctx.shadow_draws().len(), 4);
    assert!(ctx.shadow_draws().iter().all(|d| d.light_index == 0));

    let matrices = ctx
        .matrix_array(ShaderProperty::CascadedWorldToShadowMatrices)
        .expect("cascade matrices uploaded");
    assert_eq!(matrices.len(), 5);
    assert!(matrices[..4].iter().all(|m| *m != Mat4::ZERO));
    assert_eq!(matrices[4], Mat4::ZERO);

    let spheres = ctx
        .vector_array(ShaderProperty::CascadedCullingSpheres)
        .expect("spheres uploaded");
    for (cascade, sphere) in spheres.iter().enumerate() {
        let radius = 2.0 + cascade as f32;
        assert_relative_eq!(sphere.w, radius * radius);
    }

    let (_, _, map) = &ctx.renderer_draws()[0];
    assert_eq!(map[0], -1);
    assert!(enabled(&ctx, ShaderKeyword::CascadedShadowsSoft));
    assert!(disabled(&ctx, ShaderKeyword::CascadedShadowsHard));
    assert!(disabled(&ctx, ShaderKeyword::ShadowsHard));
    assert!(disabled(&ctx, ShaderKeyword::ShadowsSoft));

    let shadow_data = agent.light_uniforms().shadow_data[0];
    assert_eq!(shadow_data.z, 1.0);
    assert_eq!(agent.last_frame_stats().cascades_rendered, 4);
}

#[test]
fn test_cascade_fallback_matrix_follows_depth_convention() {
    for reversed_z in [false, true] {
        let mut agent = RenderAgent::new(settings(2));
        let mut ctx = MockRenderContext::new(MockCullingResults::new(vec![directional(
            ShadowMode::Hard,
        )]));
        ctx.reversed_z = reversed_z;
        render(&mut agent, &mut ctx);

        let matrices = ctx
            .matrix_array(ShaderProperty::CascadedWorldToShadowMatrices)
            .expect("cascade matrices uploaded");
        let fallback = matrices[4];
        let expected = if reversed_z { 1.0 } else { 0.0 };
        assert_eq!(fallback.get(3, 3), expected);
        for row in 0..4 {
            for col in 0..4 {
                if (row, col) != (3, 3) {
                    assert_eq!(fallback.get(row, col), 0.0);
                }
            }
        }
        assert_eq!(ctx.shadow_draws().len(), 2);
    }
}

#[test]
fn test_directional_light_without_cascades_uses_atlas() {
    let mut agent = RenderAgent::new(settings(0));
    let mut ctx =
        MockRenderContext::new(MockCullingResults::new(vec![directional(ShadowMode::Hard)]));
    render(&mut agent, &mut ctx);

    assert_eq!(ctx.shadow_draws().len(), 1);
    assert!(ctx
        .matrix_array(ShaderProperty::CascadedWorldToShadowMatrices)
        .is_none());
    assert!(enabled(&ctx, ShaderKeyword::ShadowsHard));
    assert!(disabled(&ctx, ShaderKeyword::CascadedShadowsHard));
    let (_, _, map) = &ctx.renderer_draws()[0];
    assert_eq!(map, &vec![0]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Regular atlas
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_five_shadowed_point_lights_use_three_wide_grid() {
    let lights = (0..5).map(|i| point(i as f32, ShadowMode::Hard)).collect();
    let mut scene = MockCullingResults::new(lights);
    scene.point_shadows = true;
    let mut agent = RenderAgent::new(settings(0));
    let mut ctx = MockRenderContext::new(scene);
    render(&mut agent, &mut ctx);

    let order: Vec<usize> = ctx.shadow_draws().iter().map(|d| d.light_index).collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);

    let global = ctx
        .vector(ShaderProperty::GlobalShadowData)
        .expect("global shadow data uploaded");
    assert_relative_eq!(global.x, 1.0 / 3.0);

    let shadow_data = ctx
        .vector_array(ShaderProperty::ShadowData)
        .expect("shadow data uploaded");
    for n in 0..5 {
        assert_relative_eq!(shadow_data[n].z, (n % 3) as f32 / 3.0);
        assert_relative_eq!(shadow_data[n].w, (n / 3) as f32 / 3.0);
    }
    assert!(enabled(&ctx, ShaderKeyword::ShadowsHard));
    assert!(disabled(&ctx, ShaderKeyword::ShadowsSoft));

    let stats = agent.last_frame_stats();
    assert_eq!(
        stats,
        FrameStats {
            cameras_rendered: 1,
            cameras_skipped: 0,
            visible_lights: 5,
            shadow_tiles: 5,
            cascades_rendered: 0,
        }
    );
}

#[test]
fn test_point_light_without_fit_loses_its_shadow() {
    let lights = vec![point(0.0, ShadowMode::Soft), spot(40.0, ShadowMode::Soft)];
    let mut agent = RenderAgent::new(settings(0));
    let mut ctx = MockRenderContext::new(MockCullingResults::new(lights));
    render(&mut agent, &mut ctx);

    let shadow_data = agent.light_uniforms().shadow_data;
    assert_eq!(shadow_data[0].x, 0.0);
    assert_eq!(shadow_data[1].x, 1.0);
    assert_relative_eq!(shadow_data[1].z, 0.5);
    assert_eq!(ctx.shadow_draws().len(), 1);
}

#[test]
fn test_spot_attenuation() {
    let mut agent = RenderAgent::new(settings(0));
    let mut ctx = MockRenderContext::new(MockCullingResults::new(vec![spot(
        60.0,
        ShadowMode::None,
    )]));
    render(&mut agent, &mut ctx);

    let outer_cos = 30.0f32.to_radians().cos();
    let inner_cos = ((46.0f32 / 64.0) * 30.0f32.to_radians().tan()).atan().cos();
    let scale = 1.0 / (inner_cos - outer_cos).max(0.001);
    let attenuation = ctx
        .vector_array(ShaderProperty::VisibleLightAttenuations)
        .expect("attenuations uploaded")[0];
    assert_relative_eq!(attenuation.z, scale, max_relative = 1e-4);
    assert_relative_eq!(attenuation.w, -outer_cos * scale, max_relative = 1e-4);
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame flow
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_pass_order_and_release_after_submit() {
    let mut agent = RenderAgent::new(settings(2));
    let mut ctx = MockRenderContext::new(MockCullingResults::new(vec![
        directional(ShadowMode::Hard),
        spot(45.0, ShadowMode::Hard),
    ]));
    render(&mut agent, &mut ctx);

    let position = |predicate: &dyn Fn(&Call) -> bool| {
        ctx.calls.iter().position(predicate).expect("call recorded")
    };
    let cull = position(&|c| matches!(c, Call::Cull(_)));
    let first_shadow = position(&|c| matches!(c, Call::DrawShadows(_)));
    let setup = position(&|c| matches!(c, Call::SetupCamera(_)));
    let opaque = position(&|c| matches!(c, Call::DrawRenderers { .. }));
    let skybox = position(&|c| matches!(c, Call::DrawSkybox));
    let submit = position(&|c| matches!(c, Call::Submit));
    let release = position(&|c| matches!(c, Call::Release(_)));
    assert!(cull < first_shadow);
    assert!(first_shadow < setup);
    assert!(setup < opaque && opaque < skybox && skybox < submit);
    assert!(submit < release);

    assert_eq!(ctx.count(|c| matches!(c, Call::Acquire(_))), 2);
    assert_eq!(ctx.count(|c| matches!(c, Call::Release(_))), 2);

    let commands = ctx.commands();
    let begin = commands
        .iter()
        .filter(|c| matches!(c, RenderCommand::BeginSample(_)))
        .count();
    let end = commands
        .iter()
        .filter(|c| matches!(c, RenderCommand::EndSample(_)))
        .count();
    assert_eq!(begin, end);
}

#[test]
fn test_camera_clear_state() {
    let mut agent = RenderAgent::new(settings(0));
    let mut ctx = MockRenderContext::new(MockCullingResults::new(Vec::new()));
    render(&mut agent, &mut ctx);

    let clear = ctx
        .commands()
        .into_iter()
        .find(|c| matches!(c, RenderCommand::ClearRenderTarget { .. }));
    assert!(matches!(
        clear,
        Some(RenderCommand::ClearRenderTarget {
            depth: true,
            color: true,
            ..
        })
    ));
}

#[test]
fn test_shadow_distance_is_clamped_to_far_plane() {
    let mut agent = RenderAgent::new(settings(0));
    let mut ctx = MockRenderContext::new(MockCullingResults::new(Vec::new()));
    let camera = MockCamera::new("near").with_far_plane(12.0);
    agent
        .render_frame(&mut ctx, &[&camera as &dyn Camera])
        .expect("frame renders");

    let global = ctx
        .vector(ShaderProperty::GlobalShadowData)
        .expect("global shadow data uploaded");
    assert_eq!(global.x, 0.0);
    assert_relative_eq!(global.y, 144.0);
    assert_relative_eq!(global.z, 1.0);
    assert_relative_eq!(global.w, -11.0);
}

#[test]
fn test_degenerate_camera_is_skipped() {
    let mut agent = RenderAgent::new(settings(0));
    let mut ctx = MockRenderContext::new(MockCullingResults::new(vec![point(
        0.0,
        ShadowMode::None,
    )]));
    let broken = MockCamera::degenerate("broken");
    let main = MockCamera::new("main");
    agent
        .render_frame(&mut ctx, &[&broken as &dyn Camera, &main])
        .expect("frame renders");

    assert_eq!(ctx.calls[0], Call::Cull("main".to_string()));
    assert_eq!(ctx.count(|c| matches!(c, Call::Cull(_))), 1);
    let stats = agent.last_frame_stats();
    assert_eq!(stats.cameras_skipped, 1);
    assert_eq!(stats.cameras_rendered, 1);
    assert_eq!(agent.frame_count(), 1);
}

#[test]
fn test_per_camera_state_does_not_leak() {
    let mut agent = RenderAgent::new(settings(4));
    let mut ctx =
        MockRenderContext::new(MockCullingResults::new(vec![directional(ShadowMode::Hard)]));
    render(&mut agent, &mut ctx);
    assert_eq!(agent.light_uniforms().len(), 1);

    ctx.scene = MockCullingResults::new(Vec::new());
    ctx.calls.clear();
    render(&mut agent, &mut ctx);

    assert_eq!(ctx.count(|c| matches!(c, Call::Acquire(_))), 0);
    assert!(agent.light_uniforms().is_empty());
    assert_eq!(agent.light_uniforms().shadow_data[0], Vec4::ZERO);
    let global = ctx
        .vector(ShaderProperty::GlobalShadowData)
        .expect("global shadow data uploaded");
    assert_eq!(global.x, 0.0);
    assert_eq!(agent.frame_count(), 2);
}

#[test]
fn test_error_fallback_pass_can_be_forced() {
    let mut agent = RenderAgent::new(settings(0))
        .with_forward_lane(ForwardPassLane::new().with_error_fallback(true));
    let mut ctx = MockRenderContext::new(MockCullingResults::new(Vec::new()));
    render(&mut agent, &mut ctx);

    let draws = ctx.renderer_draws();
    assert_eq!(draws.len(), 3);
    assert_eq!(draws[2].0.override_material, Some(OverrideMaterial::Error));
}

// ─────────────────────────────────────────────────────────────────────────────
// Failure handling
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_allocation_failure_aborts_frame_and_releases() {
    let mut agent = RenderAgent::new(settings(2));
    let mut ctx = MockRenderContext::new(MockCullingResults::new(vec![
        directional(ShadowMode::Hard),
        spot(45.0, ShadowMode::Hard),
    ]));
    ctx.allocations_before_failure = Some(1);

    let camera = MockCamera::new("main");
    let result = agent.render_frame(&mut ctx, &[&camera as &dyn Camera]);

    assert!(matches!(result, Err(RenderError::Resource(_))));
    assert!(ctx.calls.contains(&Call::Release(TextureId(1))));
    assert_eq!(ctx.count(|c| matches!(c, Call::Submit)), 0);
    assert_eq!(agent.frame_count(), 0);

    // The next frame starts from clean buffers.
    ctx.allocations_before_failure = None;
    ctx.calls.clear();
    agent
        .render_frame(&mut ctx, &[&camera as &dyn Camera])
        .expect("frame renders");
    assert_eq!(ctx.count(|c| matches!(c, Call::Submit)), 1);
}

#[test]
fn test_unconfigured_agent_renders_nothing() {
    let mut agent = RenderAgent::unconfigured();
    let mut ctx = MockRenderContext::new(MockCullingResults::new(vec![point(
        0.0,
        ShadowMode::Hard,
    )]));
    let camera = MockCamera::new("main");
    for _ in 0..3 {
        agent
            .render_frame(&mut ctx, &[&camera as &dyn Camera])
            .expect("pass-through never fails");
    }
    assert!(ctx.calls.is_empty());
    assert_eq!(agent.frame_count(), 0);
}
