/// World - single-threaded entity/component store.
///
/// Entities are slots in a generational arena ([`slotmap::SlotMap`]), so a
/// stale [`Entity`] key can never observe a recycled slot. Reference counts
/// live in a side table separate from the component store, which lets
/// [`EntityRef`](super::EntityRef) handles be cloned and dropped while
/// component borrows are outstanding; a count reaching zero while the store
/// is borrowed defers the despawn to the next store operation.
///
/// `World` itself is a cheap clone handle over the shared store; all mutation
/// happens on the single rendering thread, so no locking is involved.

use std::any::{Any, TypeId};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{SecondaryMap, SlotMap};

use crate::engine_assert;
use crate::world::schedule::{Phase, Schedule, System};

slotmap::new_key_type! {
    /// Generation-tagged entity key. Copyable, cheap, never dangles:
    /// lookups on a despawned entity simply return `None`.
    pub struct Entity;
}

/// One entity slot: the component type-map
struct Slot {
    components: FxHashMap<TypeId, Box<dyn Any>>,
}

struct WorldInner {
    slots: SlotMap<Entity, Slot>,
    schedule: Schedule,
}

/// Shared handle to the entity store.
///
/// Cloning is cheap (reference-counted pointer); all clones observe the same
/// store. The store is single-threaded by design.
#[derive(Clone)]
pub struct World {
    inner: Rc<RefCell<WorldInner>>,
    // Kept outside `inner` so handle refcount traffic never conflicts with
    // component borrows.
    counts: Rc<RefCell<SecondaryMap<Entity, u64>>>,
    garbage: Rc<RefCell<Vec<Entity>>>,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(WorldInner {
                slots: SlotMap::with_key(),
                schedule: Schedule::new(),
            })),
            counts: Rc::new(RefCell::new(SecondaryMap::new())),
            garbage: Rc::new(RefCell::new(Vec::new())),
        }
    }

    // ===== ENTITY LIFECYCLE =====

    /// Allocate a new entity with no components and a reference count of 0.
    ///
    /// Ownership semantics come from [`EntityRef`](super::EntityRef); a bare
    /// spawned entity lives until explicitly despawned.
    pub fn spawn(&self) -> Entity {
        self.flush_garbage();
        let entity = self
            .inner
            .borrow_mut()
            .slots
            .insert(Slot { components: FxHashMap::default() });
        self.counts.borrow_mut().insert(entity, 0);
        entity
    }

    /// Destroy an entity and all components it owns.
    ///
    /// Components are moved out of the store before being dropped, so
    /// component destructors holding [`EntityRef`](super::EntityRef) handles
    /// to other entities can decrement (and cascade-destroy) safely.
    pub fn despawn(&self, entity: Entity) {
        self.despawn_one(entity);
        self.flush_garbage();
    }

    fn despawn_one(&self, entity: Entity) {
        self.counts.borrow_mut().remove(entity);
        let components = {
            let mut inner = self.inner.borrow_mut();
            inner.slots.remove(entity).map(|slot| slot.components)
        };
        // Cascading handle drops re-enter the store here, after the borrow
        // above has been released.
        drop(components);
    }

    /// Despawn entities whose last handle dropped while the store was
    /// borrowed
    fn flush_garbage(&self) {
        loop {
            let entity = self.garbage.borrow_mut().pop();
            match entity {
                Some(entity) => self.despawn_one(entity),
                None => break,
            }
        }
    }

    /// Whether the entity still exists
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.inner.borrow().slots.contains_key(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    // ===== COMPONENT ACCESS =====

    /// Set (insert or replace) a component on a live entity.
    ///
    /// Setting a component on a dead entity is a programmer error.
    pub fn set<T: 'static>(&self, entity: Entity, value: T) {
        engine_assert!(
            self.is_alive(entity),
            "nova3d::World",
            "Cannot set component on dead entity {:?}",
            entity
        );
        let replaced = {
            let mut inner = self.inner.borrow_mut();
            let slot = inner
                .slots
                .get_mut(entity)
                .expect("entity checked alive above");
            slot.components.insert(TypeId::of::<T>(), Box::new(value))
        };
        // Replaced component may cascade-drop handles; borrow released first.
        drop(replaced);
        self.flush_garbage();
    }

    /// Add a default-constructed component
    pub fn add<T: Default + 'static>(&self, entity: Entity) {
        self.set(entity, T::default());
    }

    /// Whether the entity carries a component of type T
    pub fn has<T: 'static>(&self, entity: Entity) -> bool {
        self.inner
            .borrow()
            .slots
            .get(entity)
            .map(|slot| slot.components.contains_key(&TypeId::of::<T>()))
            .unwrap_or(false)
    }

    /// Borrow a component immutably.
    ///
    /// Multiple shared component borrows may be held at once; a shared borrow
    /// cannot overlap with any mutable borrow of the store.
    pub fn get<T: 'static>(&self, entity: Entity) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.inner.borrow(), |inner| {
            inner
                .slots
                .get(entity)
                .and_then(|slot| slot.components.get(&TypeId::of::<T>()))
                .and_then(|boxed| boxed.downcast_ref::<T>())
        })
        .ok()
    }

    /// Borrow a component mutably (exclusive access to the store while held)
    pub fn get_mut<T: 'static>(&self, entity: Entity) -> Option<RefMut<'_, T>> {
        RefMut::filter_map(self.inner.borrow_mut(), |inner| {
            inner
                .slots
                .get_mut(entity)
                .and_then(|slot| slot.components.get_mut(&TypeId::of::<T>()))
                .and_then(|boxed| boxed.downcast_mut::<T>())
        })
        .ok()
    }

    // ===== QUERIES =====

    /// Collect every live entity carrying a component of type T.
    ///
    /// Returns a snapshot so callers can freely borrow components while
    /// iterating. Insertion order is not specified.
    pub fn entities_with<T: 'static>(&self) -> Vec<Entity> {
        let key = TypeId::of::<T>();
        self.inner
            .borrow()
            .slots
            .iter()
            .filter(|(_, slot)| slot.components.contains_key(&key))
            .map(|(entity, _)| entity)
            .collect()
    }

    // ===== SCHEDULE =====

    /// Register a system to run every frame in the given phase.
    ///
    /// Within one phase, systems run in registration order; pipeline-stage
    /// ordering is enforced purely by phase + registration order.
    pub fn add_system<F>(&self, phase: Phase, name: &'static str, run: F)
    where
        F: FnMut(&World) + 'static,
    {
        self.inner.borrow_mut().schedule.push(System {
            phase,
            name,
            run: Box::new(run),
        });
    }

    /// Run one frame: every registered system, in phase order.
    pub fn progress(&self) {
        self.flush_garbage();
        // Systems are moved out of the store so they can freely borrow it.
        let mut systems = self.inner.borrow_mut().schedule.take_systems();
        for phase in Phase::ORDER {
            for system in systems.iter_mut().filter(|s| s.phase == phase) {
                (system.run)(self);
            }
        }
        self.inner.borrow_mut().schedule.restore_systems(systems);
        self.flush_garbage();
    }

    // ===== REFERENCE COUNTING (used by EntityRef) =====

    /// Current reference count of an entity, if alive
    pub fn reference_count(&self, entity: Entity) -> Option<u64> {
        self.counts.borrow().get(entity).copied()
    }

    /// Increment the reference count of a live entity.
    ///
    /// Safe while component borrows are outstanding: counts live outside the
    /// component store.
    pub(crate) fn increment_ref(&self, entity: Entity) {
        if let Some(count) = self.counts.borrow_mut().get_mut(entity) {
            *count += 1;
        }
    }

    /// Decrement the reference count, returning the new count.
    ///
    /// Returns `None` if the entity is already dead.
    pub(crate) fn decrement_ref(&self, entity: Entity) -> Option<u64> {
        let mut counts = self.counts.borrow_mut();
        let count = counts.get_mut(entity)?;
        debug_assert!(*count > 0, "reference count underflow");
        *count -= 1;
        Some(*count)
    }

    /// Destroy an entity whose count reached zero.
    ///
    /// Immediate when the store is free; deferred to the next store
    /// operation when a component borrow is outstanding (the drop that got
    /// us here may run inside such a borrow).
    pub(crate) fn destroy_zero_count(&self, entity: Entity) {
        let store_free = self.inner.try_borrow_mut().is_ok();
        if store_free {
            self.despawn_one(entity);
        } else {
            self.garbage.borrow_mut().push(entity);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "world_tests.rs"]
mod tests;
