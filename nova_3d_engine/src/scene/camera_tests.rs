/// Tests for the camera component

use super::*;

#[test]
fn test_defaults() {
    let camera = Camera::default();
    assert_eq!(camera.near, 0.1);
    assert_eq!(camera.far, 1000.0);
    assert_eq!(camera.fov, FRAC_PI_2);
    assert_eq!(camera.focal_length, 1.0);
    assert_eq!(camera.projection, ProjectionType::Perspective);
}

#[test]
fn test_create_spawns_camera_with_transform() {
    let world = World::new();
    let entity = Camera::create(&world);

    assert!(world.has::<Camera>(entity));
    assert!(world.has::<Transform>(entity));
}

#[test]
fn test_create_with_keeps_parameters() {
    let world = World::new();
    let entity = Camera::create_with(
        &world,
        Camera { projection: ProjectionType::Orthographic, near: 1.0, ..Camera::default() },
    );

    let camera = world.get::<Camera>(entity).unwrap();
    assert_eq!(camera.projection, ProjectionType::Orthographic);
    assert_eq!(camera.near, 1.0);
}
