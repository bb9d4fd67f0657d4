/// Tests for the multi-target framebuffer

use super::*;
use crate::graphics::HeadlessDriver;
use std::cell::RefCell;
use std::rc::Rc;

const FORMATS: [TextureFormat; 3] = [
    TextureFormat::RGBA16F,
    TextureFormat::RGBA8,
    TextureFormat::RGBA16F,
];

fn setup() -> (World, Rc<RefCell<HeadlessDriver>>, DriverHandle) {
    let world = World::new();
    let driver = HeadlessDriver::new_shared();
    let handle: DriverHandle = driver.clone();
    (world, driver, handle)
}

#[test]
fn test_create_is_complete_with_expected_attachments() {
    let (world, _driver, handle) = setup();

    let framebuffer = Framebuffer::create(&world, &handle, 800, 600, &FORMATS);
    let fb = framebuffer.get::<Framebuffer>().unwrap();

    assert!(fb.is_complete());
    assert_eq!(fb.attachment_count(), 3);
    assert_eq!(fb.width(), 800);
    assert_eq!(fb.height(), 600);
}

#[test]
fn test_attachments_are_live_textures_with_requested_formats() {
    let (world, _driver, handle) = setup();

    let framebuffer = Framebuffer::create(&world, &handle, 64, 64, &FORMATS);
    let fb = framebuffer.get::<Framebuffer>().unwrap();

    for (i, &format) in FORMATS.iter().enumerate() {
        let attachment = fb.attachment(i);
        let texture = attachment.get::<Texture>().unwrap();
        assert_eq!(texture.format(), format);
        assert_eq!(texture.width(), 64);
        assert_eq!(texture.height(), 64);
    }
}

#[test]
fn test_bind_unbind_toggle_active_target() {
    let (world, driver, handle) = setup();

    let framebuffer = Framebuffer::create(&world, &handle, 32, 32, &FORMATS);
    let fb = framebuffer.get::<Framebuffer>().unwrap();

    fb.bind();
    assert!(driver.borrow().bound_framebuffer().is_some());

    fb.unbind();
    assert!(driver.borrow().bound_framebuffer().is_none());
}

#[test]
fn test_set_size_resizes_depth_stencil_only() {
    let (world, driver, handle) = setup();

    let framebuffer = Framebuffer::create(&world, &handle, 32, 32, &FORMATS);
    {
        let mut fb = framebuffer.get_mut::<Framebuffer>().unwrap();
        fb.set_size(128, 256);
        assert_eq!(fb.width(), 128);
        assert_eq!(fb.height(), 256);
    }

    let fb = framebuffer.get::<Framebuffer>().unwrap();
    assert_eq!(
        driver.borrow().renderbuffer_size(fb.depth_stencil_id()),
        Some((128, 256))
    );

    // Color attachments keep their creation-time storage
    let attachment = fb.attachment(0);
    let texture = attachment.get::<Texture>().unwrap();
    assert_eq!(texture.width(), 32);
    assert_eq!(texture.height(), 32);
    let desc = driver.borrow().texture_desc(texture.texture_id()).unwrap();
    assert_eq!((desc.width, desc.height), (32, 32));
}

#[test]
fn test_set_size_same_dimensions_is_a_no_op() {
    let (world, driver, handle) = setup();

    let framebuffer = Framebuffer::create(&world, &handle, 32, 32, &FORMATS);
    let mut fb = framebuffer.get_mut::<Framebuffer>().unwrap();

    let renderbuffer = fb.depth_stencil_id();
    let before = driver.borrow().renderbuffer_size(renderbuffer);
    fb.set_size(32, 32);
    assert_eq!(driver.borrow().renderbuffer_size(renderbuffer), before);
}

#[test]
fn test_drop_releases_framebuffer_renderbuffer_and_textures() {
    let (world, driver, handle) = setup();

    let framebuffer = Framebuffer::create(&world, &handle, 16, 16, &FORMATS);
    assert_eq!(driver.borrow().live_texture_count(), 3);

    drop(framebuffer);
    let _ = world;
    assert_eq!(driver.borrow().live_texture_count(), 0);
}

#[test]
#[should_panic(expected = "Attachment index 3 out of range")]
fn test_attachment_out_of_range_is_fatal() {
    let (world, _driver, handle) = setup();

    let framebuffer = Framebuffer::create(&world, &handle, 16, 16, &FORMATS);
    let fb = framebuffer.get::<Framebuffer>().unwrap();
    let _ = fb.attachment(3);
}
