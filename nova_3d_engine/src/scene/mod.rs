/// Scene module - passive components consumed by the renderer

// Module declarations
pub mod transform;
pub mod camera;
pub mod light;

// Re-export everything
pub use transform::*;
pub use camera::*;
pub use light::*;
