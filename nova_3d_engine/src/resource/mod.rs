/// Resource module - GPU-backed scene resources living in the entity store

// Module declarations
pub mod texture;
pub mod material;
pub mod mesh;
pub mod framebuffer;

// Re-export everything
pub use texture::*;
pub use material::*;
pub use mesh::*;
pub use framebuffer::*;
