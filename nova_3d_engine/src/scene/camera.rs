/// Camera component

use std::f32::consts::FRAC_PI_2;

use crate::scene::Transform;
use crate::world::{Entity, World};

/// Projection kind of a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    Orthographic,
    Perspective,
}

/// Camera parameters; the view transform comes from the entity's
/// [`Transform`] component
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub near: f32,
    pub far: f32,
    /// Vertical field of view in radians (perspective only)
    pub fov: f32,
    pub focal_length: f32,
    pub projection: ProjectionType,
}

impl Camera {
    /// Spawn an entity carrying this camera plus a default transform
    pub fn create_with(world: &World, camera: Camera) -> Entity {
        let entity = world.spawn();
        world.set(entity, Transform::default());
        world.set(entity, camera);
        entity
    }

    /// Spawn a default camera entity
    pub fn create(world: &World) -> Entity {
        Camera::create_with(world, Camera::default())
    }
}

impl Default for Camera {
    fn default() -> Camera {
        Camera {
            near: 0.1,
            far: 1000.0,
            fov: FRAC_PI_2,
            focal_length: 1.0,
            projection: ProjectionType::Perspective,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
