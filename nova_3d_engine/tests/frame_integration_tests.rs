//! Integration tests for the full frame pipeline
//!
//! These tests drive whole frames through the world schedule against the
//! headless backend and inspect the recorded driver traffic.
//!
//! Run with: cargo test --test frame_integration_tests


use std::f32::consts::FRAC_PI_2;

use nova_3d_engine::glam::{Mat4, Vec3};
use nova_3d_engine::nova3d::graphics::StorageBuffer;
use nova_3d_engine::nova3d::resource::{Framebuffer, Material, Texture};
use nova_3d_engine::nova3d::scene::Camera;
use headless_test_utils::{setup_pipeline, spawn_light, spawn_triangle};

// ============================================================================
// STAGE ORDERING TESTS
// ============================================================================

#[test]
fn test_integration_full_frame_orders_geometry_before_composite() {
    let (world, driver, renderer, _window) = setup_pipeline(800, 600, 10);
    let camera = Camera::create(&world);
    renderer.borrow_mut().set_current_camera(&world, camera);
    spawn_triangle(&world, &driver, &renderer.borrow());
    spawn_light(&world, Vec3::new(0.0, 4.0, 0.0), Vec3::ONE, 2.0);

    world.progress();

    let driver = driver.borrow();
    // Default target cleared first, then the G-buffer
    let clears = driver.clears();
    assert_eq!(clears.len(), 2);
    assert!(clears[0].framebuffer.is_none());
    assert!(clears[1].framebuffer.is_some());

    // Geometry draw lands in the G-buffer, the composite quad on the
    // default target, in that order
    let draws = driver.draws();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].index_count, 3);
    assert!(draws[0].framebuffer.is_some());
    assert_eq!(draws[1].index_count, 6);
    assert!(draws[1].framebuffer.is_none());
}

#[test]
fn test_integration_light_data_written_before_composite_reads_it() {
    let (world, driver, renderer, _window) = setup_pipeline(800, 600, 10);
    spawn_light(&world, Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 0.5, 0.5), 8.0);

    world.progress();

    let renderer = renderer.borrow();
    let colors_id = renderer.light_colors().get::<StorageBuffer>().unwrap().id();
    let positions_id = renderer
        .light_positions()
        .get::<StorageBuffer>()
        .unwrap()
        .id();

    let driver = driver.borrow();
    // The composite draw happened with both tables already populated and
    // bound to the reflected block binding indices
    let colors: &[f32] = bytemuck::cast_slice(driver.buffer_data(colors_id).unwrap());
    assert_eq!(&colors[..4], &[0.5, 0.5, 0.5, 8.0]);
    let positions: &[f32] = bytemuck::cast_slice(driver.buffer_data(positions_id).unwrap());
    assert_eq!(&positions[..4], &[1.0, 2.0, 3.0, 1.0]);
    let bound: Vec<_> = (0..2).map(|i| driver.storage_buffer_at(i)).collect();
    assert!(bound.contains(&Some(colors_id)));
    assert!(bound.contains(&Some(positions_id)));
}

#[test]
fn test_integration_composite_samples_the_gbuffer_attachments() {
    let (world, driver, renderer, _window) = setup_pipeline(800, 600, 10);

    world.progress();

    let renderer = renderer.borrow();
    let gbuffer = renderer.gbuffer().get::<Framebuffer>().unwrap();
    let attachment_ids: Vec<_> = (0..gbuffer.attachment_count())
        .map(|i| {
            gbuffer
                .attachment(i)
                .get::<Texture>()
                .unwrap()
                .texture_id()
        })
        .collect();

    // The screen material bound each attachment to a sequential texture unit
    let driver = driver.borrow();
    let bound_ids: Vec<_> = (0..3)
        .filter_map(|unit| driver.texture_at_unit(unit))
        .collect();
    assert_eq!(bound_ids.len(), 3);
    for id in attachment_ids {
        assert!(bound_ids.contains(&id));
    }
}

// ============================================================================
// CAMERA RESOLUTION TESTS
// ============================================================================

#[test]
fn test_integration_camera_resolution_feeds_the_geometry_pass() {
    let (world, driver, renderer, _window) = setup_pipeline(800, 600, 10);
    let camera = Camera::create(&world);
    renderer.borrow_mut().set_current_camera(&world, camera);
    spawn_triangle(&world, &driver, &renderer.borrow());

    world.progress();

    // The projection used by the draw is the one resolved this frame
    let expected = Mat4::perspective_rh_gl(FRAC_PI_2, 800.0 / 600.0, 0.1, 1000.0);
    let renderer = renderer.borrow();
    assert!(renderer.projection_matrix().abs_diff_eq(expected, 1e-6));

    let material = renderer.default_material().get::<Material>().unwrap();
    let location = material.program().uniform_location("u_projection").unwrap();
    let driver = driver.borrow();
    let bytes = driver
        .uniform_bytes(material.program().id(), location)
        .unwrap();
    assert_eq!(bytes, bytemuck::bytes_of(&expected));
}

// ============================================================================
// RESIZE TESTS
// ============================================================================

#[test]
fn test_integration_window_resize_flows_into_viewport_and_gbuffer() {
    let (world, driver, renderer, window) = setup_pipeline(800, 600, 10);

    world.progress();
    assert_eq!(driver.borrow().viewport(), (800, 600));

    window.resize(1024, 768);
    world.progress();

    assert_eq!(driver.borrow().viewport(), (1024, 768));
    let renderer = renderer.borrow();
    let gbuffer = renderer.gbuffer().get::<Framebuffer>().unwrap();
    assert_eq!((gbuffer.width(), gbuffer.height()), (1024, 768));

    // Color attachments keep their creation-time storage; only the
    // depth-stencil target follows the window
    let attachment = gbuffer.attachment(0);
    let texture_id = attachment.get::<Texture>().unwrap().texture_id();
    let desc = driver.borrow().texture_desc(texture_id).unwrap();
    assert_eq!((desc.width, desc.height), (800, 600));
}

#[test]
fn test_integration_minimized_window_keeps_projection_finite() {
    let (world, _driver, renderer, window) = setup_pipeline(800, 600, 10);
    let camera = Camera::create(&world);
    renderer.borrow_mut().set_current_camera(&world, camera);

    world.progress();
    let projection = renderer.borrow().projection_matrix();
    assert!(projection.is_finite());

    // Minimized: the window reports zero height
    window.resize(800, 0);
    world.progress();

    let renderer = renderer.borrow();
    assert!(renderer.projection_matrix().abs_diff_eq(projection, 1e-6));
    assert!(renderer.projection_matrix().is_finite());
}

// ============================================================================
// FRAME LOOP TESTS
// ============================================================================

#[test]
fn test_integration_main_loop_runs_until_frame_budget() {
    let (world, driver, renderer, window) = setup_pipeline(320, 240, 3);

    let mut frames = 0;
    while !renderer.borrow().window_should_close() {
        world.progress();
        frames += 1;
        assert!(frames <= 3, "window never requested shutdown");
    }

    assert_eq!(frames, 3);
    assert_eq!(window.swap_count(), 3);
    // One clear pair and one composite draw per frame
    assert_eq!(driver.borrow().clears().len(), 6);
    assert_eq!(driver.borrow().draws().len(), 3);
}
