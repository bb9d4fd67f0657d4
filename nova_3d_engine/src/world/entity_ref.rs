/// EntityRef - owning, reference-counted handle to a store-managed object.
///
/// GPU-backed resources (meshes, materials, textures, framebuffers) live as
/// components on entities; an `EntityRef` keeps its entity alive. Cloning a
/// handle increments the count, dropping decrements it, and the backing
/// entity (with everything its components own) is destroyed when the count
/// reaches zero. Destruction cascades: a destroyed component may itself hold
/// handles, whose drops decrement further counts. Decrement-then-maybe-
/// destroy is one uninterrupted step on the single rendering thread, so
/// nested ownership graphs cannot double-free.
///
/// Liveness can always be observed through [`EntityRef::is_alive`] without
/// touching the count; every other accessor on a dead handle is a programmer
/// error and asserts fatally.

use std::cell::{Ref, RefMut};

use crate::engine_assert;
use crate::world::{Entity, World};

/// Owning handle to an entity in the store.
///
/// Never null: use `Option<EntityRef>` where a vacant handle is meaningful.
pub struct EntityRef {
    world: World,
    entity: Entity,
}

impl EntityRef {
    /// Allocate a new backing entity and take ownership of it.
    ///
    /// The entity starts at reference count 0 and the returned handle brings
    /// it to 1.
    pub fn create(world: &World) -> EntityRef {
        let entity = world.spawn();
        world.increment_ref(entity);
        EntityRef {
            world: world.clone(),
            entity,
        }
    }

    /// The underlying entity key (weak observation, no count change)
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Whether the backing entity still exists.
    ///
    /// Always safe to call, even on a handle whose entity was despawned
    /// out from under it.
    pub fn is_alive(&self) -> bool {
        self.world.is_alive(self.entity)
    }

    /// Current reference count (test/diagnostic aid)
    pub fn reference_count(&self) -> u64 {
        self.world.reference_count(self.entity).unwrap_or(0)
    }

    // ===== COMPONENT ACCESS =====

    /// Borrow a component immutably.
    ///
    /// Returns `None` if the entity does not carry the component.
    pub fn get<T: 'static>(&self) -> Option<Ref<'_, T>> {
        self.assert_alive("get");
        self.world.get::<T>(self.entity)
    }

    /// Borrow a component mutably
    pub fn get_mut<T: 'static>(&self) -> Option<RefMut<'_, T>> {
        self.assert_alive("get_mut");
        self.world.get_mut::<T>(self.entity)
    }

    /// Add a default-constructed component (builder-style)
    pub fn add<T: Default + 'static>(&self) -> &Self {
        self.assert_alive("add");
        self.world.add::<T>(self.entity);
        self
    }

    /// Set a component value (builder-style)
    pub fn set<T: 'static>(&self, value: T) -> &Self {
        self.assert_alive("set");
        self.world.set(self.entity, value);
        self
    }

    /// Whether the entity carries a component of type T
    pub fn has<T: 'static>(&self) -> bool {
        self.assert_alive("has");
        self.world.has::<T>(self.entity)
    }

    fn assert_alive(&self, accessor: &str) {
        engine_assert!(
            self.is_alive(),
            "nova3d::EntityRef",
            "`{}` called on a dead handle ({:?})",
            accessor,
            self.entity
        );
    }
}

impl Clone for EntityRef {
    fn clone(&self) -> Self {
        // No-op on a dead entity; the clone observes the same dead handle
        self.world.increment_ref(self.entity);
        EntityRef {
            world: self.world.clone(),
            entity: self.entity,
        }
    }
}

impl Drop for EntityRef {
    fn drop(&mut self) {
        // Decrement-then-maybe-destroy is a single step: nothing else runs
        // between the count reaching zero and the despawn below.
        if let Some(0) = self.world.decrement_ref(self.entity) {
            self.world.destroy_zero_count(self.entity);
        }
    }
}

impl std::fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRef")
            .field("entity", &self.entity)
            .field("alive", &self.is_alive())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "entity_ref_tests.rs"]
mod tests;
