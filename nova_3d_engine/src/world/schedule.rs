/// Frame schedule - fixed phases the renderer pipeline stages install into.
///
/// Phase ordering is the only synchronization in the engine: the light
/// buffers are written in `PreStore` and read in `OnStore`, so reordering
/// phases (or registering stages in the wrong phase) is a correctness bug,
/// not a performance one.

use crate::world::World;

/// Fixed pipeline points, in frame order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Frame setup (context/current target/clears)
    PreUpdate,
    /// User/game logic
    Update,
    /// Derived per-frame state (camera matrices)
    PostUpdate,
    /// Draw recording (geometry pass, light gather)
    PreStore,
    /// Composition and presentation
    OnStore,
}

impl Phase {
    /// All phases, in execution order
    pub const ORDER: [Phase; 5] = [
        Phase::PreUpdate,
        Phase::Update,
        Phase::PostUpdate,
        Phase::PreStore,
        Phase::OnStore,
    ];
}

/// A registered per-frame system
pub(crate) struct System {
    pub phase: Phase,
    pub name: &'static str,
    pub run: Box<dyn FnMut(&World)>,
}

/// Ordered collection of systems.
///
/// Systems are taken out of the store while running so they can borrow it;
/// systems registered during a frame start running the next frame.
pub(crate) struct Schedule {
    systems: Vec<System>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    pub fn push(&mut self, system: System) {
        crate::engine_debug!(
            "nova3d::World",
            "Registered system '{}' in phase {:?}",
            system.name,
            system.phase
        );
        self.systems.push(system);
    }

    pub fn take_systems(&mut self) -> Vec<System> {
        std::mem::take(&mut self.systems)
    }

    pub fn restore_systems(&mut self, mut ran: Vec<System>) {
        // Anything registered while the frame ran goes after the existing
        // systems, preserving registration order overall.
        let added = std::mem::take(&mut self.systems);
        ran.extend(added);
        self.systems = ran;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
