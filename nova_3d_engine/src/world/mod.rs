/// World module - the entity/component store substrate
///
/// A single-threaded typed-object registry: generation-tagged entity keys,
/// per-slot reference counts driving GPU resource lifetime, and a fixed-phase
/// frame schedule the renderer installs its pipeline stages into.

// Module declarations
pub mod world;
pub mod entity_ref;
pub mod schedule;

// Re-export everything
pub use world::*;
pub use entity_ref::*;
pub use schedule::*;
