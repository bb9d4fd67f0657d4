/*!
# Nova 3D Engine

Core of a small entity-component-driven deferred renderer.

A scene graph of transforms, meshes, materials and lights is turned into a
sequence of GPU draw operations, composited through a geometry buffer
(G-buffer) and a lighting-accumulation pass.

## Architecture

- **world**: single-threaded typed-object registry with generational entity
  keys, reference-counted handles ([`world::EntityRef`]) and a fixed-phase
  frame schedule
- **graphics**: contract-level GPU driver trait plus move-only RAII wrappers
  for buffers, vertex arrays, shader programs and storage buffers; ships a
  headless in-memory driver for tests and tooling
- **resource**: GPU-backed scene resources (Texture, Material, ArrayMesh,
  Framebuffer) living inside the entity store
- **scene**: passive scene components (Transform, Camera, PointLight)
- **renderer**: the per-frame deferred pipeline (G-buffer geometry pass,
  light gather, screen composite)
- **windowing**: small capability interface the renderer consumes; window
  creation and event delivery stay outside the core
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod world;
pub mod graphics;
pub mod windowing;
pub mod resource;
pub mod scene;
pub mod renderer;

// Main nova3d namespace module
pub mod nova3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine logging facade
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: engine_* macros are NOT re-exported here - they are exported
        // at the crate root via #[macro_export]
    }

    // Entity store sub-module
    pub mod world {
        pub use crate::world::*;
    }

    // Graphics driver sub-module
    pub mod graphics {
        pub use crate::graphics::*;
    }

    // Windowing capability interface
    pub mod windowing {
        pub use crate::windowing::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Renderer sub-module
    pub mod render {
        pub use crate::renderer::*;
    }
}

// Re-export math library at crate root
pub use glam;
