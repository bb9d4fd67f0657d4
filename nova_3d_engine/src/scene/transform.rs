/// Transform component with a lazily recomputed local-to-world matrix

use glam::{Mat4, Quat, Vec3};

/// Position, rotation and scale of an entity
///
/// The local-to-world matrix is cached and recomputed on read after any
/// mutator ran. Matrix composition is scale, then rotation, then
/// translation.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    matrix: Mat4,
    dirty_matrix: bool,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Transform {
        Transform {
            position,
            rotation,
            scale,
            matrix: Mat4::from_scale_rotation_translation(scale, rotation, position),
            dirty_matrix: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty_matrix = true;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.dirty_matrix = true;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty_matrix = true;
    }

    /// Offset the position
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.dirty_matrix = true;
    }

    /// Local-to-world matrix, recomputed if a mutator ran since last read
    pub fn matrix(&mut self) -> Mat4 {
        if self.dirty_matrix {
            self.matrix =
                Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position);
            self.dirty_matrix = false;
        }
        self.matrix
    }

    /// Whether the cached matrix is stale
    pub fn is_dirty(&self) -> bool {
        self.dirty_matrix
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
