/// Renderer module - the per-frame deferred pipeline

// Module declarations
pub mod renderer;
pub mod shaders;

// Re-export everything from renderer.rs
pub use renderer::*;
