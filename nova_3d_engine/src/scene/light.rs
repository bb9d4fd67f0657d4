/// Light components

use glam::Vec3;

/// Point light; world position comes from the entity's Transform, rendering
/// is gated by the [`Visible`](crate::renderer::Visible) marker
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub color: Vec3,
    pub energy: f32,
}

impl Default for PointLight {
    fn default() -> PointLight {
        PointLight { color: Vec3::ONE, energy: 1.0 }
    }
}
